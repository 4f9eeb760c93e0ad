//! JSON output of the resource tree

use crate::catalog::ResourceTree;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Marker printed before the JSON document on standard output
pub const JSON_BEGIN: &str = "==== JSON BEGIN ====";

/// Marker printed after the JSON document on standard output
pub const JSON_END: &str = "==== JSON END ====";

/// Errors that can occur while writing the result
#[derive(Error, Debug)]
pub enum PresentError {
    #[error("Failed to serialize resource tree: {0}")]
    SerializeError(#[from] serde_json::Error),

    #[error("IO error writing {path}: {source}", path = .path.display())]
    FileError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error writing to standard output: {0}")]
    StdoutError(#[source] std::io::Error),
}

/// Where the rendered tree goes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    /// Framed by [`JSON_BEGIN`] / [`JSON_END`] on standard output
    Stdout,
    /// Written to a file, replacing any existing content
    File(PathBuf),
}

impl Destination {
    /// Pick the destination from an export path; empty means standard output
    pub fn from_export_path(export_json: Option<&Path>) -> Self {
        match export_json {
            Some(path) if !path.as_os_str().is_empty() => Self::File(path.to_path_buf()),
            _ => Self::Stdout,
        }
    }
}

/// Render the tree as JSON indented by four spaces
pub fn render_json(tree: &ResourceTree) -> Result<String, PresentError> {
    let mut buffer = Vec::new();
    let mut serializer =
        serde_json::Serializer::with_formatter(&mut buffer, PrettyFormatter::with_indent(b"    "));
    tree.serialize(&mut serializer)?;
    // serde_json only ever emits valid UTF-8
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}

/// Write the framed JSON document to any writer
pub fn write_framed<W: Write>(out: &mut W, json: &str) -> std::io::Result<()> {
    writeln!(out, "{}", JSON_BEGIN)?;
    writeln!(out, "{}", json)?;
    writeln!(out, "{}", JSON_END)?;
    out.flush()
}

/// Serialize the tree and write it to the destination
pub fn present(tree: &ResourceTree, destination: &Destination) -> Result<(), PresentError> {
    let json = render_json(tree)?;

    match destination {
        Destination::Stdout => {
            let stdout = std::io::stdout();
            let mut handle = stdout.lock();
            write_framed(&mut handle, &json).map_err(PresentError::StdoutError)?;
        }
        Destination::File(path) => {
            std::fs::write(path, format!("{}\n", json)).map_err(|source| {
                PresentError::FileError {
                    path: path.clone(),
                    source,
                }
            })?;
            log::info!("Wrote resource tree to {}", path.display());
        }
    }

    Ok(())
}
