use crate::types::DbId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    /// Like [`CoreError::NotFound`] for entities addressed by a string key.
    #[error("Entity not found: {entity} '{key}'")]
    NotFoundKey { entity: &'static str, key: String },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    /// A second vote by the same user for the same nominee.
    #[error("You have already voted for this nominee")]
    AlreadyVoted { nominee_id: DbId },

    /// The removal window for a vote has elapsed.
    #[error("This vote can no longer be removed")]
    VoteLocked { nominee_id: DbId },

    /// A category cannot be deleted while nominees still reference it by name.
    #[error("Category '{category}' has {nominee_count} nominee(s) and cannot be deleted")]
    CategoryInUse {
        category: String,
        nominee_count: i64,
    },

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Timeouts and connectivity failures; safe to retry.
    #[error("Temporarily unavailable: {0}")]
    Transient(String),

    /// A table or column the service relies on is missing.
    #[error("Schema drift detected: {0}")]
    SchemaDrift(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
