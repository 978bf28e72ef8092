//! Repository for the `site_config` table.

use sqlx::PgPool;

use crate::models::site_config::{SiteConfigEntry, VOTING_OPEN_KEY};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, key, value, created_at, updated_at";

pub struct SiteConfigRepo;

impl SiteConfigRepo {
    pub async fn list(pool: &PgPool) -> Result<Vec<SiteConfigEntry>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM site_config ORDER BY key ASC");
        sqlx::query_as::<_, SiteConfigEntry>(&query).fetch_all(pool).await
    }

    pub async fn get(pool: &PgPool, key: &str) -> Result<Option<SiteConfigEntry>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM site_config WHERE key = $1");
        sqlx::query_as::<_, SiteConfigEntry>(&query)
            .bind(key)
            .fetch_optional(pool)
            .await
    }

    pub async fn upsert(
        pool: &PgPool,
        key: &str,
        value: &serde_json::Value,
    ) -> Result<SiteConfigEntry, sqlx::Error> {
        let query = format!(
            "INSERT INTO site_config (key, value)
             VALUES ($1, $2)
             ON CONFLICT (key) DO UPDATE SET value = EXCLUDED.value
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, SiteConfigEntry>(&query)
            .bind(key)
            .bind(value)
            .fetch_one(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, key: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM site_config WHERE key = $1")
            .bind(key)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Whether voting is open. A missing key or any value other than JSON
    /// `false` counts as open.
    pub async fn voting_open(pool: &PgPool) -> Result<bool, sqlx::Error> {
        let entry = Self::get(pool, VOTING_OPEN_KEY).await?;
        Ok(!matches!(entry, Some(e) if e.value == serde_json::Value::Bool(false)))
    }
}
