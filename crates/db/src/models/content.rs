//! Page content and site configuration models.

use laurels_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `content` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Content {
    pub id: DbId,
    pub section: String,
    pub document: serde_json::Value,
    pub updated_by: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Request body for `PUT /api/v1/content/{section}`.
#[derive(Debug, Clone, Deserialize)]
pub struct UpsertContent {
    pub document: serde_json::Value,
}
