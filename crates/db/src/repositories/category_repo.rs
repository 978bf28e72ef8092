//! Repository for the `categories` table.

use sqlx::PgPool;
use laurels_core::types::DbId;

use crate::models::category::{
    Category, CategoryDeleteOutcome, CategoryWithCount, CreateCategory, UpdateCategory,
};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, slug, description, created_at, updated_at";

/// Provides CRUD operations for award categories.
pub struct CategoryRepo;

impl CategoryRepo {
    /// Insert a new category, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateCategory) -> Result<Category, sqlx::Error> {
        let query = format!(
            "INSERT INTO categories (name, slug, description)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Category>(&query)
            .bind(&input.name)
            .bind(&input.slug)
            .bind(&input.description)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Category>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM categories WHERE id = $1");
        sqlx::query_as::<_, Category>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_by_slug(pool: &PgPool, slug: &str) -> Result<Option<Category>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM categories WHERE slug = $1");
        sqlx::query_as::<_, Category>(&query)
            .bind(slug)
            .fetch_optional(pool)
            .await
    }

    /// List all categories alphabetically with the number of nominees filed
    /// under each name.
    pub async fn list_with_counts(pool: &PgPool) -> Result<Vec<CategoryWithCount>, sqlx::Error> {
        sqlx::query_as::<_, CategoryWithCount>(
            "SELECT c.id, c.name, c.slug, c.description,
                    COUNT(n.id) AS nominee_count,
                    c.created_at, c.updated_at
             FROM categories c
             LEFT JOIN nominees n ON n.category = c.name
             GROUP BY c.id
             ORDER BY c.name ASC",
        )
        .fetch_all(pool)
        .await
    }

    /// Update a category. Only non-`None` fields in `input` are applied.
    ///
    /// Renaming a category moves its nominees to the new name in the same
    /// transaction, since nominees reference categories by name.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateCategory,
    ) -> Result<Option<Category>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let old_name: Option<String> =
            sqlx::query_scalar("SELECT name FROM categories WHERE id = $1 FOR UPDATE")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;
        let Some(old_name) = old_name else {
            return Ok(None);
        };

        let query = format!(
            "UPDATE categories SET
                name = COALESCE($2, name),
                slug = COALESCE($3, slug),
                description = CASE WHEN $4 THEN $5 ELSE description END
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        let updated = sqlx::query_as::<_, Category>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.slug)
            .bind(input.description.is_some())
            .bind(input.description.as_ref().and_then(Option::as_ref))
            .fetch_one(&mut *tx)
            .await?;

        if updated.name != old_name {
            let moved = sqlx::query("UPDATE nominees SET category = $2 WHERE category = $1")
                .bind(&old_name)
                .bind(&updated.name)
                .execute(&mut *tx)
                .await?;
            tracing::debug!(
                category_id = id,
                from = %old_name,
                to = %updated.name,
                nominees = moved.rows_affected(),
                "Renamed category"
            );
        }

        tx.commit().await?;
        Ok(Some(updated))
    }

    /// Delete a category if no nominee references it by name.
    ///
    /// The category row is locked and the nominee count taken inside the same
    /// transaction as the delete.
    pub async fn delete_if_unused(
        pool: &PgPool,
        id: DbId,
    ) -> Result<CategoryDeleteOutcome, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let name: Option<String> =
            sqlx::query_scalar("SELECT name FROM categories WHERE id = $1 FOR UPDATE")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;
        let Some(name) = name else {
            return Ok(CategoryDeleteOutcome::NotFound);
        };

        let nominee_count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM nominees WHERE category = $1")
                .bind(&name)
                .fetch_one(&mut *tx)
                .await?;
        if nominee_count > 0 {
            return Ok(CategoryDeleteOutcome::InUse {
                name,
                nominee_count,
            });
        }

        sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(CategoryDeleteOutcome::Deleted)
    }
}
