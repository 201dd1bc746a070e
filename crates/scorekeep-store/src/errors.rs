//! Error handling for scorekeep-store
//!
//! Wraps the scorekeep-core `ExError` with store-specific helpers

use scorekeep_core::errors::{ExError, ExErrorKind};

/// Result type alias using ExError
pub type Result<T> = std::result::Result<T, ExError>;

/// Create a schema maintenance error
pub fn schema_error(step: &str, reason: &str) -> ExError {
    ExError::new(ExErrorKind::Persistence)
        .with_op("ensure_schema")
        .with_message(format!("Schema step '{}' failed: {}", step, reason))
}

/// Create a schema checksum mismatch error
pub fn checksum_mismatch(version: i64, expected: &str, actual: &str) -> ExError {
    ExError::new(ExErrorKind::ConstraintViolation)
        .with_op("schema_checksum")
        .with_message(format!(
            "Checksum mismatch for schema version {}: expected {}, got {}",
            version, expected, actual
        ))
}

/// Create a database error from rusqlite::Error
///
/// Failures to open the file surface as `Io`; everything else the engine
/// reports is `Persistence`.
pub fn from_rusqlite(err: rusqlite::Error) -> ExError {
    let kind = match &err {
        rusqlite::Error::SqliteFailure(e, _) if e.code == rusqlite::ErrorCode::CannotOpen => {
            ExErrorKind::Io
        }
        _ => ExErrorKind::Persistence,
    };
    ExError::new(kind)
        .with_op("sqlite")
        .with_message(err.to_string())
}

/// Create an IO error
pub fn io_error(operation: &str, err: std::io::Error) -> ExError {
    ExError::new(ExErrorKind::Io)
        .with_op(operation.to_string())
        .with_message(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_rusqlite_is_persistence() {
        let err = from_rusqlite(rusqlite::Error::QueryReturnedNoRows);
        assert_eq!(err.kind(), ExErrorKind::Persistence);
        assert_eq!(err.op(), Some("sqlite"));
    }

    #[test]
    fn test_checksum_mismatch_is_constraint_violation() {
        let err = checksum_mismatch(1, "aa", "bb");
        assert_eq!(err.kind(), ExErrorKind::ConstraintViolation);
        assert!(err.message().contains("expected aa"));
    }
}
