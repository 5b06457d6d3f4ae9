use crate::directory::DirectoryRecord;
use crate::image::{ImageRecord, TimestampSource};
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

/// Snapshot of every regular file in the directory. Sources marked recursive are
/// walked in full; everything else is read one level deep.
pub fn list_images(record: &DirectoryRecord, timestamps: TimestampSource) -> Result<Vec<ImageRecord>> {
    let root = &record.path;
    if !root.is_dir() {
        anyhow::bail!("directory does not exist: {}", root.display());
    }

    let files = if record.is_recursive() {
        collect_recursive(root)?
    } else {
        collect_top_level(root)?
    };

    let mut images = Vec::with_capacity(files.len());
    for path in files {
        images.push(ImageRecord::from_path(&path, timestamps)?);
    }

    debug!(
        directory = %root.display(),
        recursive = record.is_recursive(),
        count = images.len(),
        "enumerated directory"
    );
    Ok(images)
}

fn collect_recursive(root: &Path) -> Result<Vec<PathBuf>> {
    let mut out = Vec::new();
    for entry in WalkDir::new(root).min_depth(1).sort_by_file_name() {
        let entry = entry.with_context(|| format!("could not walk directory: {}", root.display()))?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        out.push(path.to_path_buf());
    }
    Ok(out)
}

fn collect_top_level(root: &Path) -> Result<Vec<PathBuf>> {
    let mut out = Vec::new();
    for entry in fs::read_dir(root)
        .with_context(|| format!("could not read directory: {}", root.display()))?
    {
        let entry = entry.with_context(|| format!("could not read entry in {}", root.display()))?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        out.push(path);
    }
    out.sort();
    Ok(out)
}
