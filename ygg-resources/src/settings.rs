//! Run settings from an optional TOML file and the command line

use crate::acquire::{DEFAULT_DOCUMENT, DEFAULT_REPOSITORY};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Settings as read from a TOML file; every key is optional
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SettingsFile {
    /// Resource filter (recorded, not applied to the tree)
    pub filter: Option<String>,

    /// JSON export path; empty or absent means standard output
    pub export_json: Option<PathBuf>,

    /// Repository to clone the services document from
    pub repository: Option<String>,

    /// Document path inside the repository
    pub document: Option<String>,

    /// Local copy of the document to read instead of cloning
    pub input: Option<PathBuf>,
}

impl SettingsFile {
    /// Load settings from a TOML file
    ///
    /// # Parameters
    /// * `path` - Path to the settings file
    ///
    /// # Returns
    /// * `Ok(SettingsFile)` - Successfully loaded settings
    /// * `Err(SettingsError)` - Error reading or parsing the file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| SettingsError::ReadError {
            path: path.to_path_buf(),
            source,
        })?;

        toml::from_str(&content).map_err(|source| SettingsError::ParseError {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Overlay values from `other`, which take precedence when present
    pub fn merge(self, other: SettingsFile) -> SettingsFile {
        SettingsFile {
            filter: other.filter.or(self.filter),
            export_json: other.export_json.or(self.export_json),
            repository: other.repository.or(self.repository),
            document: other.document.or(self.document),
            input: other.input.or(self.input),
        }
    }
}

/// Resolved, immutable settings for one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub filter: String,
    pub export_json: Option<PathBuf>,
    pub repository: String,
    pub document: String,
    pub input: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        SettingsFile::default().into()
    }
}

impl From<SettingsFile> for Settings {
    fn from(file: SettingsFile) -> Self {
        Self {
            filter: file.filter.unwrap_or_default(),
            export_json: file.export_json.filter(|p| !p.as_os_str().is_empty()),
            repository: file
                .repository
                .unwrap_or_else(|| DEFAULT_REPOSITORY.to_string()),
            document: file.document.unwrap_or_else(|| DEFAULT_DOCUMENT.to_string()),
            input: file.input,
        }
    }
}

/// Errors that can occur when loading settings
#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("Failed to read settings file {path}: {source}", path = .path.display())]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse settings file {path}: {source}", path = .path.display())]
    ParseError {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_point_at_yggdrasil_site() {
        let settings = Settings::default();

        assert_eq!(settings.filter, "");
        assert_eq!(settings.export_json, None);
        assert_eq!(settings.repository, DEFAULT_REPOSITORY);
        assert_eq!(settings.document, "services.md");
        assert_eq!(settings.input, None);
    }

    #[test]
    fn test_load_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ygg-resources.toml");
        fs::write(
            &path,
            r#"
filter = "tor"
export_json = "out/resources.json"
"#,
        )
        .unwrap();

        let file = SettingsFile::load(&path).unwrap();

        assert_eq!(file.filter.as_deref(), Some("tor"));
        assert_eq!(file.export_json, Some(PathBuf::from("out/resources.json")));
        assert_eq!(file.repository, None);
    }

    #[test]
    fn test_unknown_key_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ygg-resources.toml");
        fs::write(&path, "filtr = \"typo\"\n").unwrap();

        let err = SettingsFile::load(&path).unwrap_err();

        assert!(matches!(err, SettingsError::ParseError { .. }));
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let err = SettingsFile::load("/nonexistent/ygg-resources.toml").unwrap_err();

        assert!(matches!(err, SettingsError::ReadError { .. }));
    }

    #[test]
    fn test_command_line_overrides_file() {
        let from_file = SettingsFile {
            filter: Some("file".to_string()),
            repository: Some("https://example.org/mirror.git".to_string()),
            ..SettingsFile::default()
        };
        let from_cli = SettingsFile {
            filter: Some("cli".to_string()),
            ..SettingsFile::default()
        };

        let settings: Settings = from_file.merge(from_cli).into();

        assert_eq!(settings.filter, "cli");
        assert_eq!(settings.repository, "https://example.org/mirror.git");
    }

    #[test]
    fn test_empty_export_path_means_stdout() {
        let settings: Settings = SettingsFile {
            export_json: Some(PathBuf::new()),
            ..SettingsFile::default()
        }
        .into();

        assert_eq!(settings.export_json, None);
    }
}
