//! Site configuration key/value model.

use laurels_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Whether votes may currently be cast. Missing means open.
pub const VOTING_OPEN_KEY: &str = "voting_open";

/// A row from the `site_config` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct SiteConfigEntry {
    pub id: DbId,
    pub key: String,
    pub value: serde_json::Value,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Request body for `PUT /api/v1/admin/config/{key}`.
#[derive(Debug, Clone, Deserialize)]
pub struct UpsertConfigValue {
    pub value: serde_json::Value,
}
