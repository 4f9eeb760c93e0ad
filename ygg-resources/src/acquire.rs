//! Retrieval of the services document
//!
//! The document normally lives in the Yggdrasil website repository and is
//! fetched with a shallow `git clone` into a temporary staging directory.
//! A local file can be used instead for offline runs.

use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;
use thiserror::Error;

/// Repository holding the services document
pub const DEFAULT_REPOSITORY: &str = "https://github.com/yggdrasil-network/yggdrasil-network.github.io";

/// File name of the services document inside the repository
pub const DEFAULT_DOCUMENT: &str = "services.md";

/// Errors that can occur while retrieving the document
#[derive(Error, Debug)]
pub enum AcquireError {
    #[error("Failed to create staging directory: {0}")]
    StagingError(#[source] std::io::Error),

    #[error("Failed to run git: {0}")]
    GitSpawnError(#[source] std::io::Error),

    #[error("git clone of {repository} failed with {status}: {stderr}")]
    CloneFailed {
        repository: String,
        status: std::process::ExitStatus,
        stderr: String,
    },

    #[error("IO error reading {path}: {source}", path = .path.display())]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Somewhere the services document can be read from
pub trait DocumentSource {
    /// Human-readable origin used in logs
    fn describe(&self) -> String;

    /// Retrieve the document as an ordered sequence of lines
    fn fetch_lines(&self) -> Result<Vec<String>, AcquireError>;
}

/// Shallow clone of a git repository, read and then discarded
#[derive(Debug, Clone)]
pub struct GitSource {
    /// Clone URL
    pub repository: String,
    /// Path of the document relative to the repository root
    pub document: String,
}

impl Default for GitSource {
    fn default() -> Self {
        Self {
            repository: DEFAULT_REPOSITORY.to_string(),
            document: DEFAULT_DOCUMENT.to_string(),
        }
    }
}

impl GitSource {
    pub fn new(repository: impl Into<String>, document: impl Into<String>) -> Self {
        Self {
            repository: repository.into(),
            document: document.into(),
        }
    }

    /// Run `git clone --quiet --depth 1` into `target`
    fn clone_into(&self, target: &Path) -> Result<(), AcquireError> {
        log::info!("Cloning {}", self.repository);
        let output = Command::new("git")
            .args(["clone", "--quiet", "--depth", "1"])
            .arg(&self.repository)
            .arg(target)
            .output()
            .map_err(AcquireError::GitSpawnError)?;

        if !output.status.success() {
            return Err(AcquireError::CloneFailed {
                repository: self.repository.clone(),
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(())
    }
}

impl DocumentSource for GitSource {
    fn describe(&self) -> String {
        format!("{} ({})", self.repository, self.document)
    }

    fn fetch_lines(&self) -> Result<Vec<String>, AcquireError> {
        // Dropping the staging directory removes the clone, also on error
        let staging = tempfile::Builder::new()
            .prefix("ygg-resources-")
            .tempdir()
            .map_err(AcquireError::StagingError)?;
        let checkout = staging.path().join("repository");

        self.clone_into(&checkout)?;
        log::debug!("Cloned into {}", checkout.display());

        let lines = read_lines(&checkout.join(&self.document))?;
        close_staging(staging);
        Ok(lines)
    }
}

/// A document already present on the local filesystem
#[derive(Debug, Clone)]
pub struct FileSource {
    pub path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl DocumentSource for FileSource {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    fn fetch_lines(&self) -> Result<Vec<String>, AcquireError> {
        read_lines(&self.path)
    }
}

/// Fetch the document, degrading to no lines when retrieval fails
///
/// Retrieval is best effort: the failure is logged and the caller carries on
/// with an empty document, which parses to an empty tree.
pub fn acquire_or_empty(source: &dyn DocumentSource) -> Vec<String> {
    match source.fetch_lines() {
        Ok(lines) => {
            log::info!("Read {} lines from {}", lines.len(), source.describe());
            lines
        }
        Err(e) => {
            log::error!("Could not retrieve {}: {}", source.describe(), e);
            Vec::new()
        }
    }
}

/// Read a UTF-8 file and split it into lines without terminators
fn read_lines(path: &Path) -> Result<Vec<String>, AcquireError> {
    let content = std::fs::read_to_string(path).map_err(|source| AcquireError::ReadError {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(content.lines().map(str::to_string).collect())
}

/// Remove the staging directory, logging rather than failing on cleanup errors
fn close_staging(staging: TempDir) {
    let path = staging.path().to_path_buf();
    if let Err(e) = staging.close() {
        log::warn!("Failed to remove staging directory {}: {}", path.display(), e);
    }
}
