use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use laurels_core::error::CoreError;
use laurels_core::store_error::StoreErrorKind;
use laurels_db::store_error::classify_sqlx;
use serde_json::json;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and adds HTTP-specific variants.
/// Every variant renders as `{ "error": <message>, "code": <CODE> }`.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

pub type AppResult<T> = Result<T, AppError>;

const INTERNAL_MESSAGE: &str = "An internal error occurred";

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Core(core) => classify_core_error(core),
            AppError::Database(err) => classify_sqlx_error(err),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    INTERNAL_MESSAGE.to_string(),
                )
            }
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}

fn classify_core_error(core: &CoreError) -> (StatusCode, &'static str, String) {
    match core {
        CoreError::NotFound { entity, id } => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            format!("{entity} with id {id} not found"),
        ),
        CoreError::NotFoundKey { entity, key } => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            format!("{entity} '{key}' not found"),
        ),
        CoreError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
        CoreError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone()),
        CoreError::AlreadyVoted { .. } => {
            (StatusCode::CONFLICT, "ALREADY_VOTED", core.to_string())
        }
        CoreError::VoteLocked { .. } => (StatusCode::FORBIDDEN, "VOTE_LOCKED", core.to_string()),
        CoreError::CategoryInUse { .. } => {
            (StatusCode::CONFLICT, "CATEGORY_IN_USE", core.to_string())
        }
        CoreError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone()),
        CoreError::Forbidden(msg) => (StatusCode::FORBIDDEN, "FORBIDDEN", msg.clone()),
        CoreError::Transient(msg) => {
            tracing::warn!(error = %msg, "Transient failure");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                "TRANSIENT",
                "The service is temporarily unavailable, please retry".to_string(),
            )
        }
        CoreError::SchemaDrift(msg) => {
            tracing::error!(error = %msg, "Schema drift");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "SCHEMA_DRIFT",
                "The database schema is incomplete; an administrator can run a schema repair"
                    .to_string(),
            )
        }
        CoreError::Internal(msg) => {
            tracing::error!(error = %msg, "Internal core error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                INTERNAL_MESSAGE.to_string(),
            )
        }
    }
}

/// Map a sqlx error through the shared store error classification.
fn classify_sqlx_error(err: &sqlx::Error) -> (StatusCode, &'static str, String) {
    match classify_sqlx(err) {
        StoreErrorKind::NoRows => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            "Resource not found".to_string(),
        ),
        StoreErrorKind::UniqueViolation { constraint } => (
            StatusCode::CONFLICT,
            "CONFLICT",
            format!(
                "Duplicate value violates unique constraint: {}",
                constraint.as_deref().unwrap_or("unknown")
            ),
        ),
        StoreErrorKind::ForeignKeyViolation { constraint } => (
            StatusCode::CONFLICT,
            "CONFLICT",
            format!(
                "Operation conflicts with related records: {}",
                constraint.as_deref().unwrap_or("unknown")
            ),
        ),
        StoreErrorKind::CheckViolation { constraint } => (
            StatusCode::BAD_REQUEST,
            "VALIDATION_ERROR",
            format!(
                "Value rejected by constraint: {}",
                constraint.as_deref().unwrap_or("unknown")
            ),
        ),
        StoreErrorKind::Transient => {
            tracing::warn!(error = %err, "Transient database error");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                "TRANSIENT",
                "The service is temporarily unavailable, please retry".to_string(),
            )
        }
        kind if kind.is_schema_drift() => {
            tracing::error!(error = %err, "Database schema drift");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "SCHEMA_DRIFT",
                "The database schema is incomplete; an administrator can run a schema repair"
                    .to_string(),
            )
        }
        _ => {
            tracing::error!(error = %err, "Database error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                INTERNAL_MESSAGE.to_string(),
            )
        }
    }
}
