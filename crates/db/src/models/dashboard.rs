//! Aggregate statistics for the admin dashboard.

use laurels_core::types::DbId;
use serde::Serialize;
use sqlx::FromRow;

/// Row counts across the main tables.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Totals {
    pub nominees: i64,
    pub categories: i64,
    pub votes: i64,
    pub users: i64,
    pub events: i64,
    pub academy_members: i64,
}

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct TopNominee {
    pub id: DbId,
    pub name: String,
    pub category: String,
    pub votes_count: i32,
}

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CategoryVotes {
    pub category: String,
    pub nominees: i64,
    pub votes: i64,
}
