//! Repository for the `votes` table.
//!
//! The `trg_votes_count` trigger keeps `nominees.votes_count` in step with
//! every insert and delete issued here.

use sqlx::PgPool;
use laurels_core::types::DbId;
use laurels_core::voting::VOTE_WINDOW_SECS;

use crate::models::vote::{
    CastOutcome, RemoveOutcome, Vote, VoteExportFilter, VoteExportRow, VoteWithNominee,
};
use crate::store_error::is_unique_violation;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, user_id, nominee_id, created_at";

/// Unique constraint on `(user_id, nominee_id)`.
pub const UNIQUE_VOTE_CONSTRAINT: &str = "uq_votes_user_nominee";

/// Provides vote casting, removal and reporting.
pub struct VoteRepo;

impl VoteRepo {
    pub async fn find(
        pool: &PgPool,
        user_id: DbId,
        nominee_id: DbId,
    ) -> Result<Option<Vote>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM votes WHERE user_id = $1 AND nominee_id = $2");
        sqlx::query_as::<_, Vote>(&query)
            .bind(user_id)
            .bind(nominee_id)
            .fetch_optional(pool)
            .await
    }

    /// Cast a vote for `nominee_id`.
    ///
    /// Looks for an existing vote first. A unique violation on
    /// [`UNIQUE_VOTE_CONSTRAINT`] (two concurrent casts) is reported as
    /// [`CastOutcome::AlreadyVoted`] rather than an error.
    pub async fn cast(
        pool: &PgPool,
        user_id: DbId,
        nominee_id: DbId,
    ) -> Result<CastOutcome, sqlx::Error> {
        if let Some(existing) = Self::find(pool, user_id, nominee_id).await? {
            return Ok(CastOutcome::AlreadyVoted {
                existing: Some(existing),
            });
        }

        let query = format!(
            "INSERT INTO votes (user_id, nominee_id)
             VALUES ($1, $2)
             RETURNING {COLUMNS}"
        );
        match sqlx::query_as::<_, Vote>(&query)
            .bind(user_id)
            .bind(nominee_id)
            .fetch_one(pool)
            .await
        {
            Ok(vote) => Ok(CastOutcome::Cast(vote)),
            Err(e) if is_unique_violation(&e, UNIQUE_VOTE_CONSTRAINT) => {
                tracing::debug!(user_id, nominee_id, "Concurrent duplicate vote rejected by constraint");
                Ok(CastOutcome::AlreadyVoted { existing: None })
            }
            Err(e) => Err(e),
        }
    }

    /// Delete the caller's vote for `nominee_id` if it is still inside the
    /// removal window.
    ///
    /// The window is measured against the database clock in the DELETE
    /// predicate itself. When nothing is deleted the vote is looked up again
    /// to tell a locked vote from a missing one.
    pub async fn remove_within_window(
        pool: &PgPool,
        user_id: DbId,
        nominee_id: DbId,
    ) -> Result<RemoveOutcome, sqlx::Error> {
        let query = format!(
            "DELETE FROM votes
             WHERE user_id = $1 AND nominee_id = $2
               AND created_at > NOW() - make_interval(secs => $3)
             RETURNING {COLUMNS}"
        );
        let removed = sqlx::query_as::<_, Vote>(&query)
            .bind(user_id)
            .bind(nominee_id)
            .bind(VOTE_WINDOW_SECS as f64)
            .fetch_optional(pool)
            .await?;

        if let Some(vote) = removed {
            return Ok(RemoveOutcome::Removed(vote));
        }
        Ok(match Self::find(pool, user_id, nominee_id).await? {
            Some(vote) => RemoveOutcome::Locked(vote),
            None => RemoveOutcome::NotFound,
        })
    }

    /// All votes of a user with their nominee, newest first.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<VoteWithNominee>, sqlx::Error> {
        sqlx::query_as::<_, VoteWithNominee>(
            "SELECT v.id, v.nominee_id, n.name AS nominee_name, n.category, v.created_at
             FROM votes v
             JOIN nominees n ON n.id = v.nominee_id
             WHERE v.user_id = $1
             ORDER BY v.created_at DESC",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await
    }

    pub async fn count_for_nominee(pool: &PgPool, nominee_id: DbId) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM votes WHERE nominee_id = $1")
            .bind(nominee_id)
            .fetch_one(pool)
            .await
    }

    /// Rows for the vote export, oldest first.
    pub async fn export(
        pool: &PgPool,
        filter: &VoteExportFilter,
    ) -> Result<Vec<VoteExportRow>, sqlx::Error> {
        sqlx::query_as::<_, VoteExportRow>(
            "SELECT v.id AS vote_id, v.user_id, n.name AS nominee_name, n.category, v.created_at
             FROM votes v
             JOIN nominees n ON n.id = v.nominee_id
             WHERE ($1::text IS NULL OR n.category = $1)
               AND ($2::timestamptz IS NULL OR v.created_at >= $2)
               AND ($3::timestamptz IS NULL OR v.created_at < $3)
             ORDER BY v.created_at ASC, v.id ASC",
        )
        .bind(&filter.category)
        .bind(filter.from)
        .bind(filter.to)
        .fetch_all(pool)
        .await
    }

    /// Recompute every nominee's `votes_count` from the vote rows.
    ///
    /// Returns the number of nominees whose counter was wrong.
    pub async fn recount_all(pool: &PgPool) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE nominees n SET votes_count = c.actual
             FROM (
                SELECT n2.id, COUNT(v.id)::int AS actual
                FROM nominees n2
                LEFT JOIN votes v ON v.nominee_id = n2.id
                GROUP BY n2.id
             ) c
             WHERE c.id = n.id AND n.votes_count <> c.actual",
        )
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }
}
