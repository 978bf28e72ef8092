//! Repository for the `activity_log` table.

use sqlx::PgPool;

use crate::models::activity::{ActivityEntry, NewActivity};
use crate::repositories::clamp_limit;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, event_type, entity_type, entity_id, actor_user_id, payload, created_at";

pub struct ActivityRepo;

impl ActivityRepo {
    pub async fn insert(pool: &PgPool, entry: &NewActivity<'_>) -> Result<ActivityEntry, sqlx::Error> {
        let query = format!(
            "INSERT INTO activity_log (event_type, entity_type, entity_id, actor_user_id, payload)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ActivityEntry>(&query)
            .bind(entry.event_type)
            .bind(entry.entity_type)
            .bind(entry.entity_id)
            .bind(entry.actor_user_id)
            .bind(entry.payload)
            .fetch_one(pool)
            .await
    }

    /// Most recent entries first.
    pub async fn list_recent(
        pool: &PgPool,
        limit: Option<i64>,
    ) -> Result<Vec<ActivityEntry>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM activity_log ORDER BY created_at DESC, id DESC LIMIT $1");
        sqlx::query_as::<_, ActivityEntry>(&query)
            .bind(clamp_limit(limit, 20))
            .fetch_all(pool)
            .await
    }
}
