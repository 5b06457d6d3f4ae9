use crate::exif_reader::read_capture_time;
use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimestampSource {
    #[default]
    FileCreated,
    ExifThenFile,
}

/// One file found while enumerating a directory.
///
/// Identity for reconciliation is the file name only; see [`crate::compare`].
/// `name` and `extension` are lossy UTF-8 views for display. The exact name,
/// including bytes that are not valid UTF-8, is always taken from `path`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRecord {
    pub name: String,
    pub extension: String,
    pub created: DateTime<Local>,
    pub path: PathBuf,
}

impl ImageRecord {
    pub fn new(path: impl Into<PathBuf>, created: DateTime<Local>) -> Self {
        let path = path.into();
        let name = path
            .file_stem()
            .map(|v| v.to_string_lossy().to_string())
            .unwrap_or_default();
        let extension = path
            .extension()
            .map(|v| format!(".{}", v.to_string_lossy()))
            .unwrap_or_default();

        Self {
            name,
            extension,
            created,
            path,
        }
    }

    pub fn from_path(path: &Path, timestamps: TimestampSource) -> Result<Self> {
        let created = match timestamps {
            TimestampSource::FileCreated => filesystem_time(path)?,
            TimestampSource::ExifThenFile => match read_capture_time(path).ok().flatten() {
                Some(date) => date,
                None => filesystem_time(path)?,
            },
        };
        Ok(Self::new(path, created))
    }

    /// Exact on-disk name, `name + extension` without lossy conversion.
    pub fn file_name(&self) -> &OsStr {
        self.path.file_name().unwrap_or_default()
    }

    pub fn display_name(&self) -> String {
        self.file_name().to_string_lossy().into_owned()
    }
}

fn filesystem_time(path: &Path) -> Result<DateTime<Local>> {
    let meta = fs::metadata(path)
        .with_context(|| format!("could not read file metadata: {}", path.display()))?;
    // Not every filesystem records a birth time.
    let time = meta
        .created()
        .or_else(|_| meta.modified())
        .with_context(|| format!("no timestamp available for {}", path.display()))?;
    Ok(DateTime::from(time))
}
