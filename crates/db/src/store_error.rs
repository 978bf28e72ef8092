//! Bridge from `sqlx::Error` to the shared store error classification.

use laurels_core::store_error::{classify, StoreErrorKind};

/// Classify a sqlx error. Structured SQLSTATE codes are preferred; the
/// message is only consulted when the driver provides no code.
pub fn classify_sqlx(err: &sqlx::Error) -> StoreErrorKind {
    match err {
        sqlx::Error::RowNotFound => StoreErrorKind::NoRows,
        sqlx::Error::Database(db_err) => classify(
            db_err.code().as_deref(),
            db_err.constraint(),
            db_err.message(),
        ),
        sqlx::Error::PoolTimedOut
        | sqlx::Error::PoolClosed
        | sqlx::Error::Io(_)
        | sqlx::Error::Tls(_)
        | sqlx::Error::WorkerCrashed => StoreErrorKind::Transient,
        other => classify(None, None, &other.to_string()),
    }
}

/// `true` if the error is a unique violation on the named constraint.
pub fn is_unique_violation(err: &sqlx::Error, constraint: &str) -> bool {
    matches!(
        classify_sqlx(err),
        StoreErrorKind::UniqueViolation { constraint: Some(c) } if c == constraint
    )
}
