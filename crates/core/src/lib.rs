mod compare;
mod config;
mod directory;
mod exif_reader;
mod image;
mod mover;
mod organizer;
mod reconcile;
mod scan;
mod scheme;
mod store;
mod tokens;

pub use compare::compare_by_file_name;
pub use config::{
    app_paths, load_config, load_config_from, save_config, save_config_to, AppConfig, AppPaths,
};
pub use directory::{DirectoryKind, DirectoryRecord, DirectoryType};
pub use image::{ImageRecord, TimestampSource};
pub use mover::{
    execute, execute_planned, relocate, MoveError, MoveFailure, MoveMode, MoveReport, MovedImage,
    PlannedMove,
};
pub use organizer::{
    apply_plan, move_images, plan_move, MoveOptions, MovePlan, MoveResult, OrganizerError,
};
pub use reconcile::{contains_file_name, reconcile, Reconciliation};
pub use scan::list_images;
pub use scheme::{destination_path, DirectoryScheme, ParsedScheme, SchemeError, SchemePart};
pub use store::{Catalog, CatalogStore, CATALOG_VERSION};
pub use tokens::SchemeToken;
