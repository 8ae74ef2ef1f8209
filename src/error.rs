//! Error types for schema loading.
//!
//! The library entry points (`compile`, `merge`, `validate`, `from_standard`,
//! `to_standard`) are total functions and never fail; validation findings are
//! reported as data. Errors exist only at the I/O boundary.

use std::path::PathBuf;
use thiserror::Error;

/// Errors while loading a schema from a file or string.
#[derive(Debug, Error)]
pub enum LoadError {
    // IO errors (exit code 3)
    #[error("file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("cannot read {path}: {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // Parse/shape errors (exit code 2)
    #[error("invalid JSON: {source}")]
    InvalidJson {
        #[source]
        source: serde_json::Error,
    },

    #[error("expected a schema object at {context}, got {actual}")]
    NotAnObject {
        context: String,
        actual: &'static str,
    },
}

impl LoadError {
    /// Returns the exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            LoadError::FileNotFound { .. } | LoadError::ReadError { .. } => 3,
            _ => 2,
        }
    }
}
