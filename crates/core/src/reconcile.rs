use crate::compare::compare_by_file_name;
use crate::image::ImageRecord;
use serde::Serialize;
use tracing::debug;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Reconciliation {
    pub pending: Vec<ImageRecord>,
    pub already_present: Vec<ImageRecord>,
}

/// Splits `source` into images the target lacks (`pending`) and images whose
/// file name the target already holds (`already_present`).
///
/// Matching is by `name + extension` only. A same-named file in the target is
/// always treated as the same image, whatever its content.
pub fn reconcile(mut source: Vec<ImageRecord>, mut target: Vec<ImageRecord>) -> Reconciliation {
    if source.is_empty() {
        return Reconciliation::default();
    }

    source.sort_unstable_by(compare_by_file_name);
    target.sort_unstable_by(compare_by_file_name);

    let (already_present, pending): (Vec<_>, Vec<_>) = source
        .into_iter()
        .partition(|image| contains_file_name(&target, image));

    debug!(
        pending = pending.len(),
        already_present = already_present.len(),
        target = target.len(),
        "reconciled source against target"
    );

    Reconciliation {
        pending,
        already_present,
    }
}

/// `sorted` must be ordered by [`compare_by_file_name`].
pub fn contains_file_name(sorted: &[ImageRecord], image: &ImageRecord) -> bool {
    sorted
        .binary_search_by(|candidate| compare_by_file_name(candidate, image))
        .is_ok()
}
