//! Error helpers for shopgrade-store
//!
//! Wraps shopgrade-core ExError with filesystem-specific constructors

use shopgrade_core::errors::{ExError, ExErrorKind, UpgradeError};

/// Result type alias using ExError
pub type Result<T> = std::result::Result<T, ExError>;

/// Create an IO error for `path`
pub fn io_error(operation: &str, path: &str, err: std::io::Error) -> ExError {
    ExError::new(ExErrorKind::Io)
        .with_op(operation)
        .with_entity_id(path)
        .with_message(format!("{}: {}", path, err))
}

/// Create a not-found error for a file that must exist
pub fn not_found(operation: &str, path: &str) -> ExError {
    ExError::new(ExErrorKind::NotFound)
        .with_op(operation)
        .with_entity_id(path)
        .with_message(format!("{} not found", path))
}

/// Create an error for a manifest that exists but does not parse
pub fn malformed_manifest(operation: &str, path: &str, err: &serde_json::Error) -> ExError {
    ExError::from(UpgradeError::MalformedManifest {
        path: path.to_string(),
        reason: err.to_string(),
    })
    .with_op(operation)
}

/// Create a serialization error
pub fn serialization_error(operation: &str, err: &serde_json::Error) -> ExError {
    ExError::new(ExErrorKind::Serialization)
        .with_op(operation)
        .with_message(err.to_string())
}
