//! Schema loading from files and strings.
//!
//! The library itself is I/O-free; these helpers exist for the CLI and for
//! callers that keep schemas on disk.

use std::path::Path;

use serde_json::Value;

use crate::error::LoadError;
use crate::types::json_type_name;

/// Load a schema from a file path.
///
/// # Errors
///
/// Returns `LoadError::FileNotFound` if the file doesn't exist,
/// or `LoadError::InvalidJson` if the file isn't valid JSON.
pub fn load_schema(path: &Path) -> Result<Value, LoadError> {
    if !path.exists() {
        return Err(LoadError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    let content = std::fs::read_to_string(path).map_err(|source| LoadError::ReadError {
        path: path.to_path_buf(),
        source,
    })?;

    serde_json::from_str(&content).map_err(|source| LoadError::InvalidJson { source })
}

/// Load a schema from a JSON string.
///
/// # Errors
///
/// Returns `LoadError::InvalidJson` if the string isn't valid JSON.
pub fn load_schema_str(content: &str) -> Result<Value, LoadError> {
    serde_json::from_str(content).map_err(|source| LoadError::InvalidJson { source })
}

/// Fail-fast guard: require a JSON object where a schema node is expected.
///
/// Programming-error faults surface here, synchronously, before any
/// traversal starts.
pub fn expect_object<'a>(
    value: &'a Value,
    context: &str,
) -> Result<&'a serde_json::Map<String, Value>, LoadError> {
    value.as_object().ok_or_else(|| LoadError::NotAnObject {
        context: context.to_string(),
        actual: json_type_name(value),
    })
}
