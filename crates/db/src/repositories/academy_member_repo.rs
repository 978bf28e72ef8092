//! Repository for the `academy_members` table.

use sqlx::types::Json;
use sqlx::PgPool;
use laurels_core::types::DbId;

use crate::models::academy::{
    AcademyMember, AcademyMemberWithGenre, CreateAcademyMember, UpdateAcademyMember,
};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, genre_id, bio, image_url, social_media, achievements, \
                       created_at, updated_at";

pub struct AcademyMemberRepo;

impl AcademyMemberRepo {
    pub async fn create(
        pool: &PgPool,
        input: &CreateAcademyMember,
    ) -> Result<AcademyMember, sqlx::Error> {
        let query = format!(
            "INSERT INTO academy_members (name, genre_id, bio, image_url, social_media, achievements)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, AcademyMember>(&query)
            .bind(&input.name)
            .bind(input.genre_id)
            .bind(&input.bio)
            .bind(&input.image_url)
            .bind(input.social_media.as_ref().map(Json))
            .bind(&input.achievements)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<AcademyMember>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM academy_members WHERE id = $1");
        sqlx::query_as::<_, AcademyMember>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List members with their genre name, optionally restricted to one genre.
    pub async fn list(
        pool: &PgPool,
        genre_id: Option<DbId>,
    ) -> Result<Vec<AcademyMemberWithGenre>, sqlx::Error> {
        sqlx::query_as::<_, AcademyMemberWithGenre>(
            "SELECT m.id, m.name, m.genre_id, g.name AS genre_name, m.bio, m.image_url,
                    m.social_media, m.achievements, m.created_at, m.updated_at
             FROM academy_members m
             JOIN artistic_genres g ON g.id = m.genre_id
             WHERE ($1::bigint IS NULL OR m.genre_id = $1)
             ORDER BY m.name ASC",
        )
        .bind(genre_id)
        .fetch_all(pool)
        .await
    }

    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateAcademyMember,
    ) -> Result<Option<AcademyMember>, sqlx::Error> {
        let query = format!(
            "UPDATE academy_members SET
                name = COALESCE($2, name),
                genre_id = COALESCE($3, genre_id),
                bio = CASE WHEN $4 THEN $5 ELSE bio END,
                image_url = CASE WHEN $6 THEN $7 ELSE image_url END,
                social_media = CASE WHEN $8 THEN $9 ELSE social_media END,
                achievements = CASE WHEN $10 THEN $11 ELSE achievements END
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, AcademyMember>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(input.genre_id)
            .bind(input.bio.is_some())
            .bind(input.bio.as_ref().and_then(Option::as_ref))
            .bind(input.image_url.is_some())
            .bind(input.image_url.as_ref().and_then(Option::as_ref))
            .bind(input.social_media.is_some())
            .bind(input.social_media.as_ref().and_then(Option::as_ref).map(Json))
            .bind(input.achievements.is_some())
            .bind(input.achievements.as_ref().and_then(Option::as_ref))
            .fetch_optional(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM academy_members WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
