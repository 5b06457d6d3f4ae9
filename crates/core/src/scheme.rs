use crate::image::ImageRecord;
use crate::tokens::SchemeToken;
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf, MAIN_SEPARATOR};
use thiserror::Error;

/// A named path template such as `{yyyy}/{MM}` applied to a target directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryScheme {
    pub format_string: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemePart {
    Literal(String),
    Token(SchemeToken),
}

/// A format string split into directory segments, each already tokenized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedScheme {
    segments: Vec<Vec<SchemePart>>,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SchemeError {
    #[error("unterminated token in segment '{0}'")]
    UnterminatedToken(String),
    #[error("unknown token '{{{0}}}'")]
    UnknownToken(String),
    #[error("segment '{0}' would leave the target directory")]
    TraversalSegment(String),
}

impl DirectoryScheme {
    pub fn new(
        format_string: impl Into<String>,
        name: impl Into<String>,
        description: Option<String>,
    ) -> Self {
        Self {
            format_string: format_string.into(),
            name: name.into(),
            description: description.filter(|d| !d.trim().is_empty()),
        }
    }

    pub fn parse(&self) -> Result<ParsedScheme, SchemeError> {
        let mut segments = Vec::new();
        for segment in split_segments(&self.format_string) {
            if segment == "." || segment == ".." {
                return Err(SchemeError::TraversalSegment(segment.to_string()));
            }
            segments.push(parse_segment(segment, true)?);
        }
        Ok(ParsedScheme { segments })
    }

    pub fn validate(&self) -> Result<(), SchemeError> {
        self.parse().map(|_| ())
    }

    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }

    /// Expands every segment of the format string against the image's timestamp.
    ///
    /// A non-empty `base_path` is prepended verbatim as the first segment. Bracket
    /// groups that do not name a known token are kept as literal text, so callers
    /// should [`validate`](Self::validate) first.
    pub fn render_segments(&self, image: &ImageRecord, base_path: &str) -> Vec<String> {
        let mut out = Vec::new();
        if !base_path.is_empty() {
            out.push(base_path.to_string());
        }
        for segment in split_segments(&self.format_string) {
            match parse_segment(segment, false) {
                Ok(parts) => out.push(render_parts(&parts, &image.created)),
                Err(_) => out.push(segment.to_string()),
            }
        }
        out
    }
}

impl ParsedScheme {
    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    pub fn render(&self, date: &DateTime<Local>) -> Vec<String> {
        self.segments
            .iter()
            .map(|parts| render_parts(parts, date))
            .collect()
    }
}

/// Where `image` lands inside `root`: the rendered scheme directories (if any)
/// followed by the unchanged file name.
pub fn destination_path(root: &Path, scheme: Option<&ParsedScheme>, image: &ImageRecord) -> PathBuf {
    let mut destination = root.to_path_buf();
    if let Some(scheme) = scheme {
        for segment in scheme.render(&image.created) {
            destination.push(segment);
        }
    }
    destination.push(image.file_name());
    destination
}

fn split_segments(format: &str) -> impl Iterator<Item = &str> {
    format
        .split(|c: char| c == '/' || c == MAIN_SEPARATOR)
        .filter(|segment| !segment.is_empty())
}

fn parse_segment(segment: &str, strict: bool) -> Result<Vec<SchemePart>, SchemeError> {
    let mut parts = Vec::new();
    let mut literal = String::new();
    let mut rest = segment;

    while let Some(open) = rest.find('{') {
        literal.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let Some(close) = after.find('}') else {
            if strict {
                return Err(SchemeError::UnterminatedToken(segment.to_string()));
            }
            literal.push_str(&rest[open..]);
            rest = "";
            break;
        };

        let name = &after[..close];
        match SchemeToken::from_name(name) {
            Some(token) => {
                if !literal.is_empty() {
                    parts.push(SchemePart::Literal(std::mem::take(&mut literal)));
                }
                parts.push(SchemePart::Token(token));
            }
            None if strict => return Err(SchemeError::UnknownToken(name.to_string())),
            None => literal.push_str(&rest[open..open + close + 2]),
        }
        rest = &after[close + 1..];
    }

    literal.push_str(rest);
    if !literal.is_empty() {
        parts.push(SchemePart::Literal(literal));
    }

    Ok(parts)
}

fn render_parts(parts: &[SchemePart], date: &DateTime<Local>) -> String {
    let mut output = String::new();
    for part in parts {
        match part {
            SchemePart::Literal(s) => output.push_str(s),
            SchemePart::Token(token) => output.push_str(&token.render(date)),
        }
    }
    output
}
