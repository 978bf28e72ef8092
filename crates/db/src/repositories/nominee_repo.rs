//! Repository for the `nominees` table.

use sqlx::PgPool;
use laurels_core::types::DbId;

use crate::models::nominee::{
    CreateNominee, Nominee, NomineeListParams, NomineeSort, NomineeWriteOutcome, UpdateNominee,
};
use crate::repositories::{clamp_limit, clamp_offset};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, category, description, image_url, gallery, tags, \
                       votes_count, created_at, updated_at";

/// Provides CRUD operations for nominees. `votes_count` is never written here.
pub struct NomineeRepo;

impl NomineeRepo {
    /// Take a shared lock on the category named `name`. Returns `false` if
    /// it does not exist.
    ///
    /// Held until the caller's transaction ends, so
    /// [`CategoryRepo::delete_if_unused`](super::CategoryRepo::delete_if_unused)
    /// waits for the nominee write and then counts it.
    async fn lock_category(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        name: &str,
    ) -> Result<bool, sqlx::Error> {
        let found: Option<i32> =
            sqlx::query_scalar("SELECT 1 FROM categories WHERE name = $1 FOR SHARE")
                .bind(name)
                .fetch_optional(&mut **tx)
                .await?;
        Ok(found.is_some())
    }

    /// Insert a new nominee into an existing category.
    ///
    /// The category check and the insert share one transaction.
    pub async fn create(
        pool: &PgPool,
        input: &CreateNominee,
    ) -> Result<NomineeWriteOutcome, sqlx::Error> {
        let mut tx = pool.begin().await?;
        if !Self::lock_category(&mut tx, &input.category).await? {
            return Ok(NomineeWriteOutcome::UnknownCategory(input.category.clone()));
        }

        let query = format!(
            "INSERT INTO nominees (name, category, description, image_url, gallery, tags)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        let nominee = sqlx::query_as::<_, Nominee>(&query)
            .bind(&input.name)
            .bind(&input.category)
            .bind(&input.description)
            .bind(&input.image_url)
            .bind(&input.gallery)
            .bind(&input.tags)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(NomineeWriteOutcome::Saved(nominee))
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Nominee>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM nominees WHERE id = $1");
        sqlx::query_as::<_, Nominee>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Whether a nominee with the given id exists.
    pub async fn exists(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM nominees WHERE id = $1)")
            .bind(id)
            .fetch_one(pool)
            .await
    }

    /// List nominees, optionally filtered by category name and tag.
    pub async fn list(
        pool: &PgPool,
        params: &NomineeListParams,
    ) -> Result<Vec<Nominee>, sqlx::Error> {
        let order = match params.sort {
            NomineeSort::Name => "name ASC, id ASC",
            NomineeSort::Votes => "votes_count DESC, name ASC",
            NomineeSort::Newest => "created_at DESC, id DESC",
        };
        let query = format!(
            "SELECT {COLUMNS} FROM nominees
             WHERE ($1::text IS NULL OR category = $1)
               AND ($2::text IS NULL OR $2 = ANY(tags))
             ORDER BY {order}
             LIMIT $3 OFFSET $4"
        );
        sqlx::query_as::<_, Nominee>(&query)
            .bind(&params.category)
            .bind(&params.tag)
            .bind(clamp_limit(params.limit, 100))
            .bind(clamp_offset(params.offset))
            .fetch_all(pool)
            .await
    }

    /// Update a nominee. Only fields present in `input` are applied; a cleared
    /// optional field is set to `NULL`.
    ///
    /// A new category is checked and locked in the same transaction as the
    /// update, as in [`create`](Self::create). Returns `None` if no row with
    /// the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateNominee,
    ) -> Result<Option<NomineeWriteOutcome>, sqlx::Error> {
        let mut tx = pool.begin().await?;
        if let Some(category) = &input.category {
            if !Self::lock_category(&mut tx, category).await? {
                return Ok(Some(NomineeWriteOutcome::UnknownCategory(category.clone())));
            }
        }

        let query = format!(
            "UPDATE nominees SET
                name = COALESCE($2, name),
                category = COALESCE($3, category),
                description = CASE WHEN $4 THEN $5 ELSE description END,
                image_url = CASE WHEN $6 THEN $7 ELSE image_url END,
                gallery = COALESCE($8, gallery),
                tags = COALESCE($9, tags)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        let updated = sqlx::query_as::<_, Nominee>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.category)
            .bind(input.description.is_some())
            .bind(input.description.as_ref().and_then(Option::as_ref))
            .bind(input.image_url.is_some())
            .bind(input.image_url.as_ref().and_then(Option::as_ref))
            .bind(&input.gallery)
            .bind(&input.tags)
            .fetch_optional(&mut *tx)
            .await?;

        let Some(nominee) = updated else {
            return Ok(None);
        };
        tx.commit().await?;
        Ok(Some(NomineeWriteOutcome::Saved(nominee)))
    }

    /// Delete a nominee and, by cascade, its votes. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM nominees WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
