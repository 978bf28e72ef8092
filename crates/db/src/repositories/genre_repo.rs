//! Repository for the `artistic_genres` table.

use sqlx::PgPool;
use laurels_core::types::DbId;

use crate::models::academy::{ArtisticGenre, CreateGenre, UpdateGenre};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, slug, description, created_at, updated_at";

/// Foreign key from `academy_members.genre_id`; violated when deleting a
/// genre that still has members.
pub const MEMBER_GENRE_FK: &str = "fk_academy_members_genre";

pub struct GenreRepo;

impl GenreRepo {
    pub async fn create(pool: &PgPool, input: &CreateGenre) -> Result<ArtisticGenre, sqlx::Error> {
        let query = format!(
            "INSERT INTO artistic_genres (name, slug, description)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ArtisticGenre>(&query)
            .bind(&input.name)
            .bind(&input.slug)
            .bind(&input.description)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<ArtisticGenre>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM artistic_genres WHERE id = $1");
        sqlx::query_as::<_, ArtisticGenre>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn list(pool: &PgPool) -> Result<Vec<ArtisticGenre>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM artistic_genres ORDER BY name ASC");
        sqlx::query_as::<_, ArtisticGenre>(&query).fetch_all(pool).await
    }

    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateGenre,
    ) -> Result<Option<ArtisticGenre>, sqlx::Error> {
        let query = format!(
            "UPDATE artistic_genres SET
                name = COALESCE($2, name),
                slug = COALESCE($3, slug),
                description = CASE WHEN $4 THEN $5 ELSE description END
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ArtisticGenre>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.slug)
            .bind(input.description.is_some())
            .bind(input.description.as_ref().and_then(Option::as_ref))
            .fetch_optional(pool)
            .await
    }

    /// Delete a genre. Fails with a foreign-key violation on
    /// [`MEMBER_GENRE_FK`] while members still reference it.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM artistic_genres WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
