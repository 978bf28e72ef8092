//! Aggregate queries for the admin dashboard.

use sqlx::PgPool;

use crate::models::dashboard::{CategoryVotes, TopNominee, Totals};
use crate::repositories::clamp_limit;

pub struct DashboardRepo;

impl DashboardRepo {
    pub async fn totals(pool: &PgPool) -> Result<Totals, sqlx::Error> {
        sqlx::query_as::<_, Totals>(
            "SELECT
                (SELECT COUNT(*) FROM nominees)        AS nominees,
                (SELECT COUNT(*) FROM categories)      AS categories,
                (SELECT COUNT(*) FROM votes)           AS votes,
                (SELECT COUNT(*) FROM user_profiles)   AS users,
                (SELECT COUNT(*) FROM events)          AS events,
                (SELECT COUNT(*) FROM academy_members) AS academy_members",
        )
        .fetch_one(pool)
        .await
    }

    pub async fn top_nominees(
        pool: &PgPool,
        limit: Option<i64>,
    ) -> Result<Vec<TopNominee>, sqlx::Error> {
        sqlx::query_as::<_, TopNominee>(
            "SELECT id, name, category, votes_count
             FROM nominees
             ORDER BY votes_count DESC, name ASC
             LIMIT $1",
        )
        .bind(clamp_limit(limit, 10))
        .fetch_all(pool)
        .await
    }

    /// Vote totals grouped by nominee category, busiest first.
    pub async fn votes_by_category(pool: &PgPool) -> Result<Vec<CategoryVotes>, sqlx::Error> {
        sqlx::query_as::<_, CategoryVotes>(
            "SELECT category,
                    COUNT(*) AS nominees,
                    COALESCE(SUM(votes_count), 0)::bigint AS votes
             FROM nominees
             GROUP BY category
             ORDER BY votes DESC, category ASC",
        )
        .fetch_all(pool)
        .await
    }
}
