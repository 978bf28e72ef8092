//! Repository for the `content` table.

use sqlx::PgPool;
use laurels_core::types::DbId;

use crate::models::content::Content;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, section, document, updated_by, created_at, updated_at";

pub struct ContentRepo;

impl ContentRepo {
    pub async fn find_by_section(
        pool: &PgPool,
        section: &str,
    ) -> Result<Option<Content>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM content WHERE section = $1");
        sqlx::query_as::<_, Content>(&query)
            .bind(section)
            .fetch_optional(pool)
            .await
    }

    pub async fn list(pool: &PgPool) -> Result<Vec<Content>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM content ORDER BY section ASC");
        sqlx::query_as::<_, Content>(&query).fetch_all(pool).await
    }

    /// Insert or replace the document for `section`.
    pub async fn upsert(
        pool: &PgPool,
        section: &str,
        document: &serde_json::Value,
        updated_by: Option<DbId>,
    ) -> Result<Content, sqlx::Error> {
        let query = format!(
            "INSERT INTO content (section, document, updated_by)
             VALUES ($1, $2, $3)
             ON CONFLICT (section) DO UPDATE
                SET document = EXCLUDED.document,
                    updated_by = EXCLUDED.updated_by
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Content>(&query)
            .bind(section)
            .bind(document)
            .bind(updated_by)
            .fetch_one(pool)
            .await
    }

    /// Delete a section's stored document; readers fall back to the built-in default.
    pub async fn delete(pool: &PgPool, section: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM content WHERE section = $1")
            .bind(section)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
