use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DirectoryType {
    Source,
    Target,
}

impl fmt::Display for DirectoryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DirectoryType::Source => f.write_str("source"),
            DirectoryType::Target => f.write_str("target"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DirectoryKind {
    Source { recursive: bool },
    Target { scheme: Option<String> },
}

/// A registered source or target directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "StoredDirectory", into = "StoredDirectory")]
pub struct DirectoryRecord {
    pub path: PathBuf,
    pub alias: Option<String>,
    pub kind: DirectoryKind,
}

impl DirectoryRecord {
    pub fn source(path: impl Into<PathBuf>, alias: Option<String>, recursive: bool) -> Self {
        Self {
            path: path.into(),
            alias: normalize_alias(alias),
            kind: DirectoryKind::Source { recursive },
        }
    }

    pub fn target(path: impl Into<PathBuf>, alias: Option<String>, scheme: Option<String>) -> Self {
        Self {
            path: path.into(),
            alias: normalize_alias(alias),
            kind: DirectoryKind::Target { scheme },
        }
    }

    pub fn directory_type(&self) -> DirectoryType {
        match self.kind {
            DirectoryKind::Source { .. } => DirectoryType::Source,
            DirectoryKind::Target { .. } => DirectoryType::Target,
        }
    }

    /// Targets are never scanned below the top level.
    pub fn is_recursive(&self) -> bool {
        matches!(self.kind, DirectoryKind::Source { recursive: true })
    }

    pub fn scheme_name(&self) -> Option<&str> {
        match &self.kind {
            DirectoryKind::Target { scheme } => scheme.as_deref(),
            DirectoryKind::Source { .. } => None,
        }
    }

    /// The alias when one is set, otherwise the path.
    pub fn identifier(&self) -> Cow<'_, str> {
        match &self.alias {
            Some(alias) => Cow::Borrowed(alias.as_str()),
            None => self.path.to_string_lossy(),
        }
    }

    pub fn is_identifiable_by(&self, identifier: &str) -> bool {
        self.identifier() == identifier
    }
}

fn normalize_alias(alias: Option<String>) -> Option<String> {
    alias.filter(|a| !a.is_empty())
}

// On-disk shape: one flat table per directory with the kind as a discriminant.
// Fields that do not apply to the kind are dropped on load.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredDirectory {
    kind: DirectoryType,
    path: PathBuf,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    alias: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    recursive: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    scheme: Option<String>,
}

impl From<StoredDirectory> for DirectoryRecord {
    fn from(stored: StoredDirectory) -> Self {
        match stored.kind {
            DirectoryType::Source => DirectoryRecord::source(
                stored.path,
                stored.alias,
                stored.recursive.unwrap_or(false),
            ),
            DirectoryType::Target => {
                DirectoryRecord::target(stored.path, stored.alias, stored.scheme)
            }
        }
    }
}

impl From<DirectoryRecord> for StoredDirectory {
    fn from(record: DirectoryRecord) -> Self {
        let (kind, recursive, scheme) = match record.kind {
            DirectoryKind::Source { recursive } => (DirectoryType::Source, Some(recursive), None),
            DirectoryKind::Target { scheme } => (DirectoryType::Target, None, scheme),
        };
        Self {
            kind,
            path: record.path,
            alias: record.alias,
            recursive,
            scheme,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{DirectoryRecord, DirectoryType};

    #[test]
    fn identifier_prefers_alias() {
        let aliased = DirectoryRecord::target("/mnt/backup", Some("big-disk".to_string()), None);
        assert_eq!(aliased.identifier(), "big-disk");
        assert!(aliased.is_identifiable_by("big-disk"));
        assert!(!aliased.is_identifiable_by("/mnt/backup"));

        let bare = DirectoryRecord::source("/home/me/Pictures", None, false);
        assert_eq!(bare.identifier(), "/home/me/Pictures");
        assert!(bare.is_identifiable_by("/home/me/Pictures"));
    }

    #[test]
    fn lookups_are_exact_and_case_sensitive() {
        let record = DirectoryRecord::source("/cards/sd", Some("Camera".to_string()), true);
        assert!(!record.is_identifiable_by("camera"));
        assert!(!record.is_identifiable_by("Camera "));
        assert!(!record.is_identifiable_by("Cam"));
    }

    #[test]
    fn empty_alias_falls_back_to_path() {
        let record = DirectoryRecord::source("/cards/sd", Some(String::new()), false);
        assert_eq!(record.alias, None);
        assert_eq!(record.identifier(), "/cards/sd");
    }

    #[test]
    fn kind_specific_fields() {
        let source = DirectoryRecord::source("/in", None, true);
        assert_eq!(source.directory_type(), DirectoryType::Source);
        assert!(source.is_recursive());
        assert_eq!(source.scheme_name(), None);

        let target = DirectoryRecord::target("/out", None, Some("by-month".to_string()));
        assert_eq!(target.directory_type(), DirectoryType::Target);
        assert!(!target.is_recursive());
        assert_eq!(target.scheme_name(), Some("by-month"));
    }

    #[test]
    fn stored_form_drops_fields_that_do_not_apply() {
        let raw = "kind = \"target\"\npath = \"/out\"\nrecursive = true\n";
        let record: DirectoryRecord = toml::from_str(raw).expect("deserialize");
        assert_eq!(record, DirectoryRecord::target("/out", None, None));
        assert!(!record.is_recursive());

        let raw = "kind = \"source\"\npath = \"/in\"\nscheme = \"by-month\"\n";
        let record: DirectoryRecord = toml::from_str(raw).expect("deserialize");
        assert_eq!(record.scheme_name(), None);
    }
}
