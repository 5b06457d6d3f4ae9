use crate::directory::DirectoryRecord;
use crate::image::ImageRecord;
use crate::scheme::{destination_path, ParsedScheme};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoveMode {
    /// Stop at the first failure; nothing after it is attempted.
    #[default]
    FailFast,
    ContinueOnError,
}

#[derive(Debug, Error)]
pub enum MoveError {
    #[error("destination already exists: {}", .0.display())]
    DestinationExists(PathBuf),
    #[error("could not create directory {}: {source}", path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("could not move {} to {}: {source}", from.display(), to.display())]
    Relocate {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: io::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlannedMove {
    pub image: ImageRecord,
    pub destination: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MovedImage {
    pub from: PathBuf,
    pub to: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MoveFailure {
    pub image: ImageRecord,
    pub destination: PathBuf,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MoveReport {
    pub moved: Vec<MovedImage>,
    pub failures: Vec<MoveFailure>,
    /// Images left where they were: in fail-fast mode the failing image and
    /// everything after it, otherwise only the failed ones.
    pub unmoved: Vec<ImageRecord>,
}

impl MoveReport {
    pub fn moved_count(&self) -> usize {
        self.moved.len()
    }

    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn first_failure_message(&self) -> Option<&str> {
        self.failures.first().map(|f| f.message.as_str())
    }
}

/// Moves each pending image into `target`, placing it under the rendered scheme
/// directories when a scheme is given.
pub fn execute(
    target: &DirectoryRecord,
    scheme: Option<&ParsedScheme>,
    pending: Vec<ImageRecord>,
    mode: MoveMode,
) -> MoveReport {
    let moves = pending
        .into_iter()
        .map(|image| PlannedMove {
            destination: destination_path(&target.path, scheme, &image),
            image,
        })
        .collect();
    execute_planned(moves, mode)
}

pub fn execute_planned(moves: Vec<PlannedMove>, mode: MoveMode) -> MoveReport {
    let mut report = MoveReport::default();
    let mut remaining = moves.into_iter();

    while let Some(planned) = remaining.next() {
        match relocate(&planned.image.path, &planned.destination) {
            Ok(()) => {
                info!(
                    from = %planned.image.path.display(),
                    to = %planned.destination.display(),
                    "moved image"
                );
                report.moved.push(MovedImage {
                    from: planned.image.path,
                    to: planned.destination,
                });
            }
            Err(err) => {
                let message = format!("failed to move {}: {err}", planned.image.display_name());
                warn!(
                    image = %planned.image.path.display(),
                    destination = %planned.destination.display(),
                    error = %err,
                    "move failed"
                );
                report.unmoved.push(planned.image.clone());
                report.failures.push(MoveFailure {
                    image: planned.image,
                    destination: planned.destination,
                    message,
                });
                if mode == MoveMode::FailFast {
                    report.unmoved.extend(remaining.map(|rest| rest.image));
                    break;
                }
            }
        }
    }

    report
}

/// Moves one file, creating missing parent directories. Never overwrites.
pub fn relocate(from: &Path, to: &Path) -> Result<(), MoveError> {
    if fs::symlink_metadata(to).is_ok() {
        return Err(MoveError::DestinationExists(to.to_path_buf()));
    }

    if let Some(parent) = to.parent() {
        fs::create_dir_all(parent).map_err(|source| MoveError::CreateDir {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    match fs::rename(from, to) {
        Ok(()) => Ok(()),
        Err(err) if err.kind() == io::ErrorKind::CrossesDevices => copy_then_remove(from, to),
        Err(source) => Err(MoveError::Relocate {
            from: from.to_path_buf(),
            to: to.to_path_buf(),
            source,
        }),
    }
}

fn copy_then_remove(from: &Path, to: &Path) -> Result<(), MoveError> {
    let relocate_err = |source| MoveError::Relocate {
        from: from.to_path_buf(),
        to: to.to_path_buf(),
        source,
    };

    fs::copy(from, to).map_err(relocate_err)?;
    if let Err(source) = fs::remove_file(from) {
        // Leave the source as the only copy.
        discard_copy(to);
        return Err(relocate_err(source));
    }
    Ok(())
}

fn discard_copy(path: &Path) -> bool {
    match fs::remove_file(path) {
        Ok(()) => true,
        Err(err) => {
            warn!(
                path = %path.display(),
                error = %err,
                "could not remove copied file, a duplicate is left behind"
            );
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheme::DirectoryScheme;
    use chrono::{DateTime, Local, TimeZone};
    use tempfile::tempdir;

    fn at(year: i32, month: u32, day: u32) -> DateTime<Local> {
        Local
            .with_ymd_and_hms(year, month, day, 12, 0, 0)
            .single()
            .expect("unambiguous local time")
    }

    fn write_image(dir: &Path, name: &str, date: DateTime<Local>) -> ImageRecord {
        fs::create_dir_all(dir).expect("create dir");
        let path = dir.join(name);
        fs::write(&path, name.as_bytes()).expect("write image");
        ImageRecord::new(path, date)
    }

    #[test]
    fn flat_target_keeps_file_name() {
        let temp = tempdir().expect("tempdir");
        let source = temp.path().join("source");
        let target = DirectoryRecord::target(temp.path().join("target"), None, None);
        let image = write_image(&source, "A.jpg", at(2021, 7, 4));

        let report = execute(&target, None, vec![image], MoveMode::FailFast);
        assert!(report.is_success());
        assert_eq!(report.moved_count(), 1);
        assert!(target.path.join("A.jpg").exists());
        assert!(!source.join("A.jpg").exists());
    }

    #[test]
    fn scheme_places_image_under_rendered_directories() {
        let temp = tempdir().expect("tempdir");
        let source = temp.path().join("source");
        let target = DirectoryRecord::target(temp.path().join("target"), None, None);
        let image = write_image(&source, "IMG_0042.jpg", at(2021, 7, 4));
        let scheme = DirectoryScheme::new("{yyyy}/{MM}", "year-month", None)
            .parse()
            .expect("valid scheme");

        let report = execute(&target, Some(&scheme), vec![image], MoveMode::FailFast);
        assert!(report.is_success());
        let landed = target.path.join("2021").join("07").join("IMG_0042.jpg");
        assert!(landed.exists());
        assert_eq!(fs::read(&landed).expect("read"), b"IMG_0042.jpg");
        assert_eq!(report.moved[0].to, landed);
    }

    #[test]
    fn fail_fast_stops_at_first_failure_and_keeps_earlier_moves() {
        let temp = tempdir().expect("tempdir");
        let source = temp.path().join("source");
        let target = DirectoryRecord::target(temp.path().join("target"), None, None);
        fs::create_dir_all(&target.path).expect("create target");
        // A plain file where the 2021 directory has to go.
        fs::write(target.path.join("2021"), b"blocker").expect("write blocker");

        let first = write_image(&source, "a.jpg", at(2020, 1, 1));
        let second = write_image(&source, "b.jpg", at(2021, 1, 1));
        let third = write_image(&source, "c.jpg", at(2022, 1, 1));
        let scheme = DirectoryScheme::new("{yyyy}", "year", None)
            .parse()
            .expect("valid scheme");

        let report = execute(
            &target,
            Some(&scheme),
            vec![first, second, third],
            MoveMode::FailFast,
        );

        assert!(!report.is_success());
        assert_eq!(report.moved_count(), 1);
        assert!(target.path.join("2020").join("a.jpg").exists());
        let unmoved: Vec<String> = report.unmoved.iter().map(ImageRecord::display_name).collect();
        assert_eq!(unmoved, vec!["b.jpg", "c.jpg"]);
        assert!(source.join("b.jpg").exists());
        assert!(source.join("c.jpg").exists());
        assert!(!target.path.join("2022").exists());
        let message = report.first_failure_message().expect("failure message");
        assert!(message.contains("b.jpg"), "{message}");
    }

    #[test]
    fn continue_on_error_attempts_every_image() {
        let temp = tempdir().expect("tempdir");
        let source = temp.path().join("source");
        let target = DirectoryRecord::target(temp.path().join("target"), None, None);
        fs::create_dir_all(&target.path).expect("create target");
        fs::write(target.path.join("2021"), b"blocker").expect("write blocker");

        let images = vec![
            write_image(&source, "a.jpg", at(2020, 1, 1)),
            write_image(&source, "b.jpg", at(2021, 1, 1)),
            write_image(&source, "c.jpg", at(2022, 1, 1)),
        ];
        let scheme = DirectoryScheme::new("{yyyy}", "year", None)
            .parse()
            .expect("valid scheme");

        let report = execute(&target, Some(&scheme), images, MoveMode::ContinueOnError);
        assert_eq!(report.moved_count(), 2);
        assert_eq!(report.failures.len(), 1);
        let unmoved: Vec<String> = report.unmoved.iter().map(ImageRecord::display_name).collect();
        assert_eq!(unmoved, vec!["b.jpg"]);
        assert!(target.path.join("2022").join("c.jpg").exists());
    }

    #[test]
    fn never_overwrites_an_existing_destination() {
        let temp = tempdir().expect("tempdir");
        let from = temp.path().join("new.jpg");
        let to = temp.path().join("out").join("new.jpg");
        fs::write(&from, b"new").expect("write source");
        fs::create_dir_all(to.parent().expect("parent")).expect("create out");
        fs::write(&to, b"old").expect("write existing");

        let err = relocate(&from, &to).expect_err("must refuse");
        assert!(matches!(err, MoveError::DestinationExists(_)));
        assert_eq!(fs::read(&to).expect("read"), b"old");
        assert!(from.exists());
    }

    #[test]
    fn missing_source_reports_relocate_error() {
        let temp = tempdir().expect("tempdir");
        let err = relocate(&temp.path().join("gone.jpg"), &temp.path().join("out/gone.jpg"))
            .expect_err("must fail");
        assert!(matches!(err, MoveError::Relocate { .. }));
    }

    #[test]
    fn discarding_a_copy_reports_whether_it_was_removed() {
        let temp = tempdir().expect("tempdir");
        let copy = temp.path().join("copy.jpg");
        fs::write(&copy, b"copy").expect("write copy");
        assert!(discard_copy(&copy));
        assert!(!copy.exists());

        let stuck = temp.path().join("stuck.jpg");
        fs::create_dir_all(&stuck).expect("create dir");
        assert!(!discard_copy(&stuck));
        assert!(stuck.exists());
    }

    #[test]
    fn empty_batch_is_a_success() {
        let report = execute_planned(Vec::new(), MoveMode::FailFast);
        assert!(report.is_success());
        assert_eq!(report.moved_count(), 0);
        assert!(report.unmoved.is_empty());
    }
}
