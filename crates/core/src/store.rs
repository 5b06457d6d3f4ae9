use crate::directory::{DirectoryKind, DirectoryRecord, DirectoryType};
use crate::scheme::DirectoryScheme;
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::debug;

pub const CATALOG_VERSION: u32 = 1;

/// Read access to registered directories and schemes.
pub trait CatalogStore {
    fn lookup_directory(&self, identifier: &str) -> Option<&DirectoryRecord>;
    fn lookup_scheme(&self, identifier: &str) -> Option<&DirectoryScheme>;
}

/// Every registered directory and scheme, persisted as one TOML document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    pub version: u32,
    #[serde(default)]
    pub directories: Vec<DirectoryRecord>,
    #[serde(default)]
    pub schemes: Vec<DirectoryScheme>,
}

impl Default for Catalog {
    fn default() -> Self {
        Self {
            version: CATALOG_VERSION,
            directories: Vec::new(),
            schemes: Vec::new(),
        }
    }
}

impl CatalogStore for Catalog {
    fn lookup_directory(&self, identifier: &str) -> Option<&DirectoryRecord> {
        self.directories
            .iter()
            .find(|d| d.is_identifiable_by(identifier))
    }

    fn lookup_scheme(&self, identifier: &str) -> Option<&DirectoryScheme> {
        self.schemes
            .iter()
            .find(|s| s.name == identifier || s.format_string == identifier)
    }
}

impl Catalog {
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "no catalog yet, starting empty");
            return Ok(Self::default());
        }

        let raw = fs::read_to_string(path)
            .with_context(|| format!("could not read catalog: {}", path.display()))?;
        let catalog = toml::from_str::<Catalog>(&raw)
            .with_context(|| format!("could not parse catalog: {}", path.display()))?;
        if catalog.version != CATALOG_VERSION {
            bail!(
                "unsupported catalog version {} in {} (expected {})",
                catalog.version,
                path.display(),
                CATALOG_VERSION
            );
        }
        Ok(catalog)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("could not create catalog directory: {}", parent.display())
            })?;
        }
        let body = toml::to_string_pretty(self).context("could not serialize catalog")?;
        fs::write(path, body)
            .with_context(|| format!("could not write catalog: {}", path.display()))?;
        Ok(())
    }

    pub fn directories(&self, filter: Option<DirectoryType>) -> impl Iterator<Item = &DirectoryRecord> {
        self.directories
            .iter()
            .filter(move |d| filter.map_or(true, |kind| d.directory_type() == kind))
    }

    /// Registers `record`. A target's scheme may be given by name or format
    /// string and is stored by name.
    pub fn add_directory(&mut self, mut record: DirectoryRecord) -> Result<()> {
        let identifier = record.identifier().into_owned();
        if self.lookup_directory(&identifier).is_some() {
            bail!("a directory is already registered as '{identifier}'");
        }
        if let DirectoryKind::Target {
            scheme: Some(scheme),
        } = &mut record.kind
        {
            let Some(found) = self.lookup_scheme(scheme) else {
                bail!("no scheme named '{scheme}'");
            };
            *scheme = found.name.clone();
        }
        self.directories.push(record);
        Ok(())
    }

    pub fn remove_directory(&mut self, identifier: &str) -> Result<DirectoryRecord> {
        let Some(index) = self
            .directories
            .iter()
            .position(|d| d.is_identifiable_by(identifier))
        else {
            bail!("no directory registered as '{identifier}'");
        };
        Ok(self.directories.remove(index))
    }

    pub fn schemes(&self) -> &[DirectoryScheme] {
        &self.schemes
    }

    pub fn add_scheme(&mut self, scheme: DirectoryScheme) -> Result<()> {
        scheme
            .validate()
            .with_context(|| format!("invalid format string '{}'", scheme.format_string))?;
        if self.lookup_scheme(&scheme.name).is_some()
            || self.lookup_scheme(&scheme.format_string).is_some()
        {
            bail!("already have a scheme with the same format or name");
        }
        self.schemes.push(scheme);
        Ok(())
    }

    pub fn remove_scheme(&mut self, identifier: &str) -> Result<DirectoryScheme> {
        let Some(index) = self
            .schemes
            .iter()
            .position(|s| s.name == identifier || s.format_string == identifier)
        else {
            bail!("no scheme '{identifier}'");
        };
        let scheme = &self.schemes[index];
        // Hand-edited catalogs may still reference a scheme by format string.
        if let Some(user) = self.directories.iter().find(|d| {
            d.scheme_name()
                .is_some_and(|s| s == scheme.name || s == scheme.format_string)
        }) {
            bail!(
                "scheme '{}' is used by target '{}'",
                scheme.name,
                user.identifier()
            );
        }
        Ok(self.schemes.remove(index))
    }
}

#[cfg(test)]
mod tests {
    use super::{Catalog, CatalogStore, CATALOG_VERSION};
    use crate::directory::{DirectoryRecord, DirectoryType};
    use crate::scheme::DirectoryScheme;
    use std::fs;
    use tempfile::tempdir;

    fn sample() -> Catalog {
        let mut catalog = Catalog::default();
        catalog
            .add_scheme(DirectoryScheme::new(
                "{yyyy}/{MM}",
                "year-month",
                Some("Nests images by month, by year".to_string()),
            ))
            .expect("add scheme");
        catalog
            .add_directory(DirectoryRecord::source("/cards/sd", None, true))
            .expect("add source");
        catalog
            .add_directory(DirectoryRecord::target(
                "/photos",
                Some("library".to_string()),
                Some("year-month".to_string()),
            ))
            .expect("add target");
        catalog
    }

    #[test]
    fn save_and_load_preserve_records() {
        let temp = tempdir().expect("tempdir");
        let path = temp.path().join("nested").join("catalog.toml");
        let catalog = sample();
        catalog.save(&path).expect("save");

        let body = fs::read_to_string(&path).expect("read");
        assert!(body.contains("version = 1"));

        let loaded = Catalog::load(&path).expect("load");
        assert_eq!(loaded, catalog);
    }

    #[test]
    fn missing_file_loads_empty_catalog() {
        let temp = tempdir().expect("tempdir");
        let loaded = Catalog::load(&temp.path().join("catalog.toml")).expect("load");
        assert_eq!(loaded.version, CATALOG_VERSION);
        assert!(loaded.directories.is_empty());
        assert!(loaded.schemes.is_empty());
    }

    #[test]
    fn rejects_unknown_version() {
        let temp = tempdir().expect("tempdir");
        let path = temp.path().join("catalog.toml");
        fs::write(&path, "version = 99\n").expect("write");
        let err = Catalog::load(&path).expect_err("must fail");
        assert!(err.to_string().contains("unsupported catalog version 99"));
    }

    #[test]
    fn lookup_matches_alias_or_bare_path() {
        let catalog = sample();
        assert!(catalog.lookup_directory("library").is_some());
        assert!(catalog.lookup_directory("/photos").is_none());
        assert!(catalog.lookup_directory("/cards/sd").is_some());
        assert!(catalog.lookup_directory("Library").is_none());
    }

    #[test]
    fn lookup_scheme_by_name_or_format() {
        let catalog = sample();
        assert!(catalog.lookup_scheme("year-month").is_some());
        assert!(catalog.lookup_scheme("{yyyy}/{MM}").is_some());
        assert!(catalog.lookup_scheme("by-day").is_none());
    }

    #[test]
    fn duplicate_identifiers_are_rejected() {
        let mut catalog = sample();
        let err = catalog
            .add_directory(DirectoryRecord::source("/elsewhere", Some("library".to_string()), false))
            .expect_err("duplicate alias");
        assert!(err.to_string().contains("already registered"));
    }

    #[test]
    fn target_must_reference_known_scheme() {
        let mut catalog = sample();
        let err = catalog
            .add_directory(DirectoryRecord::target("/nas", None, Some("nope".to_string())))
            .expect_err("unknown scheme");
        assert!(err.to_string().contains("no scheme named 'nope'"));
    }

    #[test]
    fn invalid_and_duplicate_schemes_are_rejected() {
        let mut catalog = sample();
        assert!(catalog
            .add_scheme(DirectoryScheme::new("{bogus}", "broken", None))
            .is_err());
        assert!(catalog
            .add_scheme(DirectoryScheme::new("{yyyy}/{MM}", "other-name", None))
            .is_err());
        assert!(catalog
            .add_scheme(DirectoryScheme::new("{yyyy}", "year-month", None))
            .is_err());
        assert_eq!(catalog.schemes().len(), 1);
    }

    #[test]
    fn scheme_in_use_cannot_be_removed() {
        let mut catalog = sample();
        let err = catalog.remove_scheme("year-month").expect_err("in use");
        assert!(err.to_string().contains("used by target 'library'"));

        catalog.remove_directory("library").expect("remove target");
        let removed = catalog.remove_scheme("year-month").expect("remove scheme");
        assert_eq!(removed.name, "year-month");
    }

    #[test]
    fn target_scheme_given_as_format_is_stored_by_name() {
        let mut catalog = Catalog::default();
        catalog
            .add_scheme(DirectoryScheme::new("{yyyy}/{MM}", "ym", None))
            .expect("add scheme");
        catalog
            .add_directory(DirectoryRecord::target(
                "/photos",
                None,
                Some("{yyyy}/{MM}".to_string()),
            ))
            .expect("add target");

        let target = catalog.lookup_directory("/photos").expect("target");
        assert_eq!(target.scheme_name(), Some("ym"));

        let err = catalog.remove_scheme("ym").expect_err("in use");
        assert!(err.to_string().contains("used by target '/photos'"));
        assert_eq!(catalog.schemes().len(), 1);
    }

    #[test]
    fn scheme_referenced_by_format_in_catalog_file_cannot_be_removed() {
        let raw = r#"
version = 1

[[directories]]
kind = "target"
path = "/photos"
scheme = "{yyyy}/{MM}"

[[schemes]]
format_string = "{yyyy}/{MM}"
name = "ym"
"#;
        let mut catalog: Catalog = toml::from_str(raw).expect("parse catalog");
        assert!(catalog.remove_scheme("ym").is_err());
        assert!(catalog.remove_scheme("{yyyy}/{MM}").is_err());
        assert_eq!(catalog.schemes().len(), 1);
    }

    #[test]
    fn remove_unknown_directory_fails() {
        let mut catalog = sample();
        assert!(catalog.remove_directory("nowhere").is_err());
        assert_eq!(catalog.directories.len(), 2);
    }

    #[test]
    fn directories_filter_by_kind() {
        let catalog = sample();
        assert_eq!(catalog.directories(None).count(), 2);
        let targets: Vec<_> = catalog.directories(Some(DirectoryType::Target)).collect();
        assert_eq!(targets.len(), 1);
        assert_eq!(targets[0].identifier(), "library");
    }
}
