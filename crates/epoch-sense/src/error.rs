//! Error types for Epoch Sense operations.
//!
//! Errors are split the same way the reparse pass treats them:
//!
//! - **`Error`**: failures that stop an operation outright (workspace cannot be
//!   scanned, configuration is malformed)
//! - **`FileError`**: a single source file could not be read; collected during a
//!   reparse and reported, while the walk carries on with the remaining files
//!
//! Syntax problems are neither. They become positioned
//! [`Diagnostic`](crate::Diagnostic)s on the symbol table snapshot.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for Epoch Sense operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type.
#[derive(Debug, Error)]
pub enum Error {
    /// File system operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid configuration file or arguments
    #[error("configuration error: {0}")]
    Config(String),

    /// Workspace root is missing or not a directory
    #[error("workspace error: {0}")]
    Workspace(String),

    /// JSON serialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A source file that could not be read during a reparse.
///
/// These never abort the tree walk; they are collected on the reparse stats
/// and on the snapshot built by that reparse.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct FileError {
    /// Canonical path of the file that failed
    pub path: PathBuf,
    /// Category of the failure
    pub kind: FileErrorKind,
    /// Human-readable error message
    pub message: String,
}

impl std::fmt::Display for FileError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: {} ({})",
            self.path.display(),
            self.message,
            self.kind
        )
    }
}

impl std::error::Error for FileError {}

/// Categorization of per-file failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FileErrorKind {
    /// Could not read the file from disk
    IoError,

    /// File content is not valid UTF-8
    EncodingError,
}

impl std::fmt::Display for FileErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::IoError => write!(f, "I/O error"),
            Self::EncodingError => write!(f, "encoding error"),
        }
    }
}

impl FileError {
    /// Create a new file error.
    #[must_use]
    pub fn new(path: PathBuf, kind: FileErrorKind, message: impl Into<String>) -> Self {
        Self {
            path,
            kind,
            message: message.into(),
        }
    }

    /// Classify an I/O failure from reading a source file.
    ///
    /// `InvalidData` is what `read_to_string` reports for non-UTF-8 content.
    #[must_use]
    pub fn from_io(path: PathBuf, error: &std::io::Error) -> Self {
        if error.kind() == std::io::ErrorKind::InvalidData {
            Self::new(path, FileErrorKind::EncodingError, "file is not valid UTF-8")
        } else {
            Self::new(path, FileErrorKind::IoError, error.to_string())
        }
    }
}
