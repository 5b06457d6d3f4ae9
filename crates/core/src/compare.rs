use crate::image::ImageRecord;
use std::cmp::Ordering;

/// Ordinal order over `name + extension`. Path, size and timestamps are ignored,
/// so two records are equal exactly when their file names are byte-for-byte equal.
pub fn compare_by_file_name(a: &ImageRecord, b: &ImageRecord) -> Ordering {
    a.file_name()
        .as_encoded_bytes()
        .cmp(b.file_name().as_encoded_bytes())
}
