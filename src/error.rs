//! # Error Handling
//!
//! This module defines the centralized error type for the `sf-aggregate`
//! library. It uses the `thiserror` library to create an `Error` enum that
//! covers every anticipated failure mode of the aggregation engine.
//!
//! ## Propagation Policy
//!
//! Not every variant is fatal. The callers decide based on the variant:
//!
//! - `Parse` and `NotFound` abort the operation on the current file. While
//!   splitting, the failure is logged and the batch continues with the next
//!   file.
//! - `UnsupportedMetadata` is always fatal: the plural label type in a delta
//!   manifest cannot be honored, and the run must stop before writing anything.
//! - `MissingField` marks a component without a `fullName`. Splitters log it
//!   and skip the component.
//! - `UnsafeName` marks a component whose `fullName` cannot be used as a
//!   file name (it holds a path separator or is `.`/`..`). Splitters log it
//!   and skip the component instead of writing outside the output directory.
//! - `WildcardNotAllowed` marks a manifest entry that asks for "all members".
//!   The manifest filter logs it as a warning and skips the entry.

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Main error type for sf-aggregate operations
#[derive(Error, Debug)]
pub enum Error {
    /// The content of a file is not well-formed XML.
    #[error("XML parsing error in {}: {message}", path.display())]
    Parse { path: PathBuf, message: String },

    /// An input path does not exist.
    #[error("File not found: {}", path.display())]
    NotFound { path: PathBuf },

    /// The manifest names a metadata type that cannot be deployed as a delta.
    #[error(
        "Unsupported metadata type '{type_name}' in manifest{}",
        hint.as_ref().map(|h| format!("\n  hint: {}", h)).unwrap_or_default()
    )]
    UnsupportedMetadata {
        type_name: String,
        /// Optional hint for how to fix the manifest
        hint: Option<String>,
    },

    /// A component lacks a required field.
    #[error("Skipping {tag} element without {field}")]
    MissingField { tag: String, field: String },

    /// A component's `fullName` is not usable as a single file name.
    #[error("Skipping {tag} element whose fullName '{name}' is not a plain file name")]
    UnsafeName { tag: String, name: String },

    /// A manifest entry uses a wildcard member where explicit names are required.
    #[error("Wildcard members are not supported for {type_name} in a delta manifest")]
    WildcardNotAllowed { type_name: String },

    /// Creating a directory or writing a file failed.
    #[error("Filesystem operation error: {message}")]
    Filesystem { message: String },

    /// An I/O error, wrapped from `std::io::Error`.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Build the error for a failed parse of `path`.
    pub fn parse(path: &Path, message: impl ToString) -> Self {
        Error::Parse {
            path: path.to_path_buf(),
            message: message.to_string(),
        }
    }

    /// Build a `Filesystem` error for a failed write of `path`.
    pub fn write_failed(path: &Path, source: std::io::Error) -> Self {
        Error::Filesystem {
            message: format!("Failed to write file '{}': {}", path.display(), source),
        }
    }

    /// Returns true when this error must stop the whole run.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Error::UnsupportedMetadata { .. })
    }
}

/// A convenient type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
