use crate::directory::{DirectoryRecord, DirectoryType};
use crate::image::{ImageRecord, TimestampSource};
use crate::mover::{execute_planned, MoveMode, MoveReport, PlannedMove};
use crate::reconcile::reconcile;
use crate::scan::list_images;
use crate::scheme::{destination_path, SchemeError};
use crate::store::CatalogStore;
use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum OrganizerError {
    #[error("no registered directory matches '{0}'")]
    UnknownDirectory(String),
    #[error("'{identifier}' is a {actual} directory, expected a {expected} directory")]
    WrongKind {
        identifier: String,
        expected: DirectoryType,
        actual: DirectoryType,
    },
    #[error("no scheme matches '{0}'")]
    UnknownScheme(String),
    #[error("scheme '{name}' is invalid: {source}")]
    InvalidScheme {
        name: String,
        #[source]
        source: SchemeError,
    },
    #[error("could not enumerate {}: {message}", path.display())]
    Enumerate { path: PathBuf, message: String },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MoveOptions {
    pub timestamp_source: TimestampSource,
    pub mode: MoveMode,
}

#[derive(Debug, Clone, Serialize)]
pub struct MovePlan {
    pub source: DirectoryRecord,
    pub target: DirectoryRecord,
    pub pending: Vec<PlannedMove>,
    pub already_present: Vec<ImageRecord>,
}

/// Outcome of a move run, returned instead of an error so that partial
/// progress is always visible to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MoveResult {
    pub successful: bool,
    pub message: String,
    pub moved_count: usize,
    pub unmoved_images: Vec<ImageRecord>,
}

impl MoveResult {
    fn failure(message: String) -> Self {
        Self {
            successful: false,
            message,
            moved_count: 0,
            unmoved_images: Vec::new(),
        }
    }

    fn from_report(report: MoveReport, mode: MoveMode) -> Self {
        let message = match (report.first_failure_message(), mode) {
            (None, _) => String::new(),
            (Some(first), MoveMode::FailFast) => first.to_string(),
            (Some(first), MoveMode::ContinueOnError) => format!(
                "{} image(s) could not be moved; first failure: {first}",
                report.failures.len()
            ),
        };
        Self {
            successful: report.is_success(),
            message,
            moved_count: report.moved_count(),
            unmoved_images: report.unmoved,
        }
    }
}

/// Resolves both directories, reconciles their contents and renders a
/// destination for every pending image. Nothing on disk is changed.
pub fn plan_move<S: CatalogStore + ?Sized>(
    store: &S,
    source_id: &str,
    target_id: &str,
    options: &MoveOptions,
) -> Result<MovePlan, OrganizerError> {
    let source = resolve_directory(store, source_id, DirectoryType::Source)?;
    let target = resolve_directory(store, target_id, DirectoryType::Target)?;

    let scheme = match target.scheme_name() {
        Some(name) => {
            let scheme = store
                .lookup_scheme(name)
                .ok_or_else(|| OrganizerError::UnknownScheme(name.to_string()))?;
            let parsed = scheme
                .parse()
                .map_err(|source| OrganizerError::InvalidScheme {
                    name: scheme.name.clone(),
                    source,
                })?;
            Some(parsed)
        }
        None => None,
    };

    let source_images = enumerate(&source, options.timestamp_source)?;
    if source_images.is_empty() {
        debug!(source = %source.identifier(), "source is empty, nothing to reconcile");
        return Ok(MovePlan {
            source,
            target,
            pending: Vec::new(),
            already_present: Vec::new(),
        });
    }
    let target_images = enumerate(&target, options.timestamp_source)?;

    let reconciliation = reconcile(source_images, target_images);
    let pending = reconciliation
        .pending
        .into_iter()
        .map(|image| PlannedMove {
            destination: destination_path(&target.path, scheme.as_ref(), &image),
            image,
        })
        .collect();

    Ok(MovePlan {
        source,
        target,
        pending,
        already_present: reconciliation.already_present,
    })
}

pub fn apply_plan(plan: MovePlan, mode: MoveMode) -> MoveResult {
    let total = plan.pending.len();
    let report = execute_planned(plan.pending, mode);
    info!(
        source = %plan.source.identifier(),
        target = %plan.target.identifier(),
        moved = report.moved_count(),
        skipped = plan.already_present.len(),
        total,
        "move finished"
    );
    MoveResult::from_report(report, mode)
}

/// Moves every image of `source_id` that `target_id` lacks.
pub fn move_images<S: CatalogStore + ?Sized>(
    store: &S,
    source_id: &str,
    target_id: &str,
    options: &MoveOptions,
) -> MoveResult {
    match plan_move(store, source_id, target_id, options) {
        Ok(plan) => apply_plan(plan, options.mode),
        Err(err) => MoveResult::failure(err.to_string()),
    }
}

fn resolve_directory<S: CatalogStore + ?Sized>(
    store: &S,
    identifier: &str,
    expected: DirectoryType,
) -> Result<DirectoryRecord, OrganizerError> {
    let record = store
        .lookup_directory(identifier)
        .ok_or_else(|| OrganizerError::UnknownDirectory(identifier.to_string()))?;
    let actual = record.directory_type();
    if actual != expected {
        return Err(OrganizerError::WrongKind {
            identifier: identifier.to_string(),
            expected,
            actual,
        });
    }
    Ok(record.clone())
}

fn enumerate(
    record: &DirectoryRecord,
    timestamps: TimestampSource,
) -> Result<Vec<ImageRecord>, OrganizerError> {
    list_images(record, timestamps).map_err(|err| OrganizerError::Enumerate {
        path: record.path.clone(),
        message: format!("{err:#}"),
    })
}
