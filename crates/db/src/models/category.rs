//! Award category model and DTOs.

use laurels_core::form::{clearable, Clearable, FieldKind, FieldSpec, FormEntity, SlugRule};
use laurels_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `categories` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Category {
    pub id: DbId,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A category with the number of nominees filed under its name.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CategoryWithCount {
    pub id: DbId,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub nominee_count: i64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateCategory {
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateCategory {
    pub name: Option<String>,
    pub slug: Option<String>,
    #[serde(default, deserialize_with = "clearable")]
    pub description: Clearable<String>,
}

impl FormEntity for CreateCategory {
    const ENTITY: &'static str = "Category";
    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::new("name", FieldKind::Text).required().max_length(120),
        FieldSpec::new("slug", FieldKind::Slug).required().max_length(120),
        FieldSpec::new("description", FieldKind::LongText).max_length(4000),
    ];
    const SLUG: Option<SlugRule> = Some(SlugRule {
        target: "slug",
        source: "name",
    });
    type Update = UpdateCategory;
}

/// Result of attempting to delete a category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryDeleteOutcome {
    Deleted,
    NotFound,
    /// Nominees still reference the category by name.
    InUse { name: String, nominee_count: i64 },
}
