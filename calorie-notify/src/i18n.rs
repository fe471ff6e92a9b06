//! Message catalog for localized strings.
//!
//! A catalog maps source strings (msgids) to translations. Lookups never fail:
//! an msgid without a translation is returned as-is.

use std::collections::HashMap;
use std::path::Path;

use thiserror::Error;
use tracing::{info, warn};

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalog {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to parse catalog {path}: {source}")]
    Parse {
        path: String,
        source: serde_json::Error,
    },
}

/// Translations keyed by msgid.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    entries: HashMap<String, String>,
}

impl Catalog {
    /// Catalog that returns every msgid unchanged.
    pub fn identity() -> Self {
        Self::default()
    }

    pub fn from_entries<K, V>(entries: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            entries: entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Load a flat JSON object of `msgid → translation`.
    pub fn from_json_file(path: &Path) -> Result<Self, CatalogError> {
        let raw = std::fs::read_to_string(path).map_err(|source| CatalogError::Read {
            path: path.display().to_string(),
            source,
        })?;

        let entries: HashMap<String, String> =
            serde_json::from_str(&raw).map_err(|source| CatalogError::Parse {
                path: path.display().to_string(),
                source,
            })?;

        info!(path = %path.display(), entries = entries.len(), "catalog_loaded");

        Ok(Self { entries })
    }

    /// Load the catalog at `path`, or the identity catalog when there is none
    /// or it cannot be loaded.
    pub fn load_or_identity(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            return Self::identity();
        };

        match Self::from_json_file(path) {
            Ok(catalog) => catalog,
            Err(e) => {
                warn!(error = %e, "catalog_load_failed");
                Self::identity()
            }
        }
    }

    /// Translate `msgid`.
    pub fn tr<'a>(&'a self, msgid: &'a str) -> &'a str {
        match self.entries.get(msgid) {
            Some(translated) if !translated.is_empty() => translated.as_str(),
            _ => msgid,
        }
    }

    /// Translate a `%s` template and substitute `arg` into it.
    pub fn fmt(&self, template: &str, arg: &str) -> String {
        self.tr(template).replacen("%s", arg, 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_returns_msgid() {
        let catalog = Catalog::identity();
        assert_eq!(catalog.tr("Male"), "Male");
    }

    #[test]
    fn test_translation_lookup() {
        let catalog = Catalog::from_entries([("Male", "Männlich")]);
        assert_eq!(catalog.tr("Male"), "Männlich");
        assert_eq!(catalog.tr("Female"), "Female");
    }

    #[test]
    fn test_empty_translation_falls_back() {
        let catalog = Catalog::from_entries([("Male", "")]);
        assert_eq!(catalog.tr("Male"), "Male");
    }

    #[test]
    fn test_fmt_substitutes_once() {
        let catalog = Catalog::from_entries([("Age: %s", "Alter: %s")]);
        assert_eq!(catalog.fmt("Age: %s", "30"), "Alter: 30");
        assert_eq!(catalog.fmt("It is %s", "%s kcal"), "It is %s kcal");
    }

    #[test]
    fn test_load_or_identity_missing_file() {
        let catalog = Catalog::load_or_identity(Some(Path::new("/nonexistent/catalog.json")));
        assert_eq!(catalog.tr("Goal: %s"), "Goal: %s");
    }

    #[test]
    fn test_from_json_file() {
        let file = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(file.path(), r#"{"kg": "кг"}"#).unwrap();

        let catalog = Catalog::from_json_file(file.path()).unwrap();

        assert_eq!(catalog.tr("kg"), "кг");
    }

    #[test]
    fn test_from_json_file_parse_error() {
        let file = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(file.path(), "[1, 2]").unwrap();

        let err = Catalog::from_json_file(file.path()).unwrap_err();

        assert!(matches!(err, CatalogError::Parse { .. }));
    }
}
