//! Nominee model and DTOs.

use laurels_core::form::{clearable, Clearable, FieldKind, FieldSpec, FormEntity};
use laurels_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `nominees` table.
///
/// `votes_count` is maintained by the `trg_votes_count` trigger and is never
/// written by application code.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Nominee {
    pub id: DbId,
    pub name: String,
    pub category: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub gallery: Vec<String>,
    pub tags: Vec<String>,
    pub votes_count: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateNominee {
    pub name: String,
    pub category: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    #[serde(default)]
    pub gallery: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateNominee {
    pub name: Option<String>,
    pub category: Option<String>,
    #[serde(default, deserialize_with = "clearable")]
    pub description: Clearable<String>,
    #[serde(default, deserialize_with = "clearable")]
    pub image_url: Clearable<String>,
    pub gallery: Option<Vec<String>>,
    pub tags: Option<Vec<String>>,
}

impl FormEntity for CreateNominee {
    const ENTITY: &'static str = "Nominee";
    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::new("name", FieldKind::Text).required().max_length(200),
        FieldSpec::new("category", FieldKind::Text).required().max_length(120),
        FieldSpec::new("description", FieldKind::LongText).max_length(8000),
        FieldSpec::new("image_url", FieldKind::Url).max_length(2048),
        FieldSpec::new("gallery", FieldKind::StringList),
        FieldSpec::new("tags", FieldKind::StringList),
    ];
    type Update = UpdateNominee;
}

/// Result of a nominee write that names a category.
#[derive(Debug, Clone)]
pub enum NomineeWriteOutcome {
    Saved(Nominee),
    /// No category with this name exists, including one deleted concurrently.
    UnknownCategory(String),
}

/// Sort order for nominee listings.
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum NomineeSort {
    #[default]
    Name,
    Votes,
    Newest,
}

/// Query parameters for `GET /api/v1/nominees`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NomineeListParams {
    pub category: Option<String>,
    pub tag: Option<String>,
    #[serde(default)]
    pub sort: NomineeSort,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}
