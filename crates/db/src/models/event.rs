//! Event model and DTOs.

use laurels_core::form::{clearable, Clearable, FieldKind, FieldSpec, FormEntity};
use laurels_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `events` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Event {
    pub id: DbId,
    pub title: String,
    pub description: Option<String>,
    pub event_date: Timestamp,
    pub location: Option<String>,
    pub image_url: Option<String>,
    pub capacity: Option<i32>,
    pub is_featured: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateEvent {
    pub title: String,
    pub description: Option<String>,
    pub event_date: Timestamp,
    pub location: Option<String>,
    pub image_url: Option<String>,
    pub capacity: Option<i32>,
    #[serde(default)]
    pub is_featured: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateEvent {
    pub title: Option<String>,
    #[serde(default, deserialize_with = "clearable")]
    pub description: Clearable<String>,
    pub event_date: Option<Timestamp>,
    #[serde(default, deserialize_with = "clearable")]
    pub location: Clearable<String>,
    #[serde(default, deserialize_with = "clearable")]
    pub image_url: Clearable<String>,
    #[serde(default, deserialize_with = "clearable")]
    pub capacity: Clearable<i32>,
    pub is_featured: Option<bool>,
}

impl FormEntity for CreateEvent {
    const ENTITY: &'static str = "Event";
    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::new("title", FieldKind::Text).required().max_length(200),
        FieldSpec::new("description", FieldKind::LongText).max_length(8000),
        FieldSpec::new("event_date", FieldKind::DateTime).required(),
        FieldSpec::new("location", FieldKind::Text).max_length(300),
        FieldSpec::new("image_url", FieldKind::Url).max_length(2048),
        FieldSpec::new("capacity", FieldKind::Integer).min_value(0),
        FieldSpec::new("is_featured", FieldKind::Boolean),
    ];
    type Update = UpdateEvent;
}

/// Query parameters for `GET /api/v1/events`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EventListParams {
    #[serde(default)]
    pub featured: bool,
    #[serde(default)]
    pub upcoming: bool,
    pub limit: Option<i64>,
}
