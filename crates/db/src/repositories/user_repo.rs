//! Repository for the `user_profiles` table.

use sqlx::PgPool;
use laurels_core::roles::{RoleLookup, ROLE_ADMIN};
use laurels_core::types::{DbId, Timestamp};

use crate::models::user::{CreateUserProfile, UserProfile};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, email, display_name, password_hash, role, is_active, \
                       failed_login_count, locked_until, last_login_at, created_at, updated_at";

/// Unique constraint on `user_profiles.email`.
pub const UNIQUE_EMAIL_CONSTRAINT: &str = "uq_user_profiles_email";

/// Provides CRUD operations for user profiles.
pub struct UserRepo;

impl UserRepo {
    /// Insert a new profile, returning the created row.
    pub async fn create(
        pool: &PgPool,
        input: &CreateUserProfile,
    ) -> Result<UserProfile, sqlx::Error> {
        let query = format!(
            "INSERT INTO user_profiles (email, display_name, password_hash, role)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, UserProfile>(&query)
            .bind(&input.email)
            .bind(&input.display_name)
            .bind(&input.password_hash)
            .bind(&input.role)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<UserProfile>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM user_profiles WHERE id = $1");
        sqlx::query_as::<_, UserProfile>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a profile by email, compared case-insensitively.
    pub async fn find_by_email(
        pool: &PgPool,
        email: &str,
    ) -> Result<Option<UserProfile>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM user_profiles WHERE lower(email) = lower($1)");
        sqlx::query_as::<_, UserProfile>(&query)
            .bind(email)
            .fetch_optional(pool)
            .await
    }

    /// Fetch just the role and active flag, for per-request authorization.
    pub async fn find_role(pool: &PgPool, id: DbId) -> Result<Option<RoleLookup>, sqlx::Error> {
        let row: Option<(String, bool)> =
            sqlx::query_as("SELECT role, is_active FROM user_profiles WHERE id = $1")
                .bind(id)
                .fetch_optional(pool)
                .await?;
        Ok(row.map(|(role, is_active)| RoleLookup { role, is_active }))
    }

    /// List all profiles, newest first.
    pub async fn list(pool: &PgPool) -> Result<Vec<UserProfile>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM user_profiles ORDER BY created_at DESC");
        sqlx::query_as::<_, UserProfile>(&query).fetch_all(pool).await
    }

    /// Set a profile's role. Returns `None` if no row with the given `id` exists.
    pub async fn set_role(
        pool: &PgPool,
        id: DbId,
        role: &str,
    ) -> Result<Option<UserProfile>, sqlx::Error> {
        let query = format!("UPDATE user_profiles SET role = $2 WHERE id = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, UserProfile>(&query)
            .bind(id)
            .bind(role)
            .fetch_optional(pool)
            .await
    }

    pub async fn count_admins(pool: &PgPool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM user_profiles WHERE role = $1 AND is_active = true")
            .bind(ROLE_ADMIN)
            .fetch_one(pool)
            .await
    }

    /// Increment the failed login counter by 1, returning the new count.
    pub async fn increment_failed_login(pool: &PgPool, id: DbId) -> Result<i32, sqlx::Error> {
        sqlx::query_scalar(
            "UPDATE user_profiles SET failed_login_count = failed_login_count + 1
             WHERE id = $1
             RETURNING failed_login_count",
        )
        .bind(id)
        .fetch_one(pool)
        .await
    }

    /// Lock a profile until the specified timestamp.
    pub async fn lock_account(
        pool: &PgPool,
        id: DbId,
        until: Timestamp,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE user_profiles SET locked_until = $2 WHERE id = $1")
            .bind(id)
            .bind(until)
            .execute(pool)
            .await?;
        Ok(())
    }

    /// Reset the lockout state and stamp `last_login_at`.
    pub async fn record_successful_login(pool: &PgPool, id: DbId) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE user_profiles SET
                failed_login_count = 0,
                locked_until = NULL,
                last_login_at = NOW()
             WHERE id = $1",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(())
    }
}
