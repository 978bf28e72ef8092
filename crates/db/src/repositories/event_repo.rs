//! Repository for the `events` table.

use sqlx::PgPool;
use laurels_core::types::DbId;

use crate::models::event::{CreateEvent, Event, EventListParams, UpdateEvent};
use crate::repositories::clamp_limit;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, title, description, event_date, location, image_url, capacity, \
                       is_featured, created_at, updated_at";

/// Provides CRUD operations for events.
pub struct EventRepo;

impl EventRepo {
    pub async fn create(pool: &PgPool, input: &CreateEvent) -> Result<Event, sqlx::Error> {
        let query = format!(
            "INSERT INTO events (title, description, event_date, location, image_url, capacity, is_featured)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Event>(&query)
            .bind(&input.title)
            .bind(&input.description)
            .bind(input.event_date)
            .bind(&input.location)
            .bind(&input.image_url)
            .bind(input.capacity)
            .bind(input.is_featured)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Event>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM events WHERE id = $1");
        sqlx::query_as::<_, Event>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List events. Upcoming listings run soonest first, otherwise newest
    /// event date first.
    pub async fn list(pool: &PgPool, params: &EventListParams) -> Result<Vec<Event>, sqlx::Error> {
        let order = if params.upcoming {
            "event_date ASC"
        } else {
            "event_date DESC"
        };
        let query = format!(
            "SELECT {COLUMNS} FROM events
             WHERE ($1 = false OR is_featured = true)
               AND ($2 = false OR event_date >= NOW())
             ORDER BY {order}, id ASC
             LIMIT $3"
        );
        sqlx::query_as::<_, Event>(&query)
            .bind(params.featured)
            .bind(params.upcoming)
            .bind(clamp_limit(params.limit, 100))
            .fetch_all(pool)
            .await
    }

    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateEvent,
    ) -> Result<Option<Event>, sqlx::Error> {
        let query = format!(
            "UPDATE events SET
                title = COALESCE($2, title),
                description = CASE WHEN $3 THEN $4 ELSE description END,
                event_date = COALESCE($5, event_date),
                location = CASE WHEN $6 THEN $7 ELSE location END,
                image_url = CASE WHEN $8 THEN $9 ELSE image_url END,
                capacity = CASE WHEN $10 THEN $11 ELSE capacity END,
                is_featured = COALESCE($12, is_featured)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Event>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(input.description.is_some())
            .bind(input.description.as_ref().and_then(Option::as_ref))
            .bind(input.event_date)
            .bind(input.location.is_some())
            .bind(input.location.as_ref().and_then(Option::as_ref))
            .bind(input.image_url.is_some())
            .bind(input.image_url.as_ref().and_then(Option::as_ref))
            .bind(input.capacity.is_some())
            .bind(input.capacity.flatten())
            .bind(input.is_featured)
            .fetch_optional(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM events WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
