//! Vote model, outcomes and export rows.

use laurels_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `votes` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Vote {
    pub id: DbId,
    pub user_id: DbId,
    pub nominee_id: DbId,
    pub created_at: Timestamp,
}

/// A user's vote joined with the nominee it was cast for.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct VoteWithNominee {
    pub id: DbId,
    pub nominee_id: DbId,
    pub nominee_name: String,
    pub category: String,
    pub created_at: Timestamp,
}

/// Result of casting a vote.
#[derive(Debug, Clone)]
pub enum CastOutcome {
    Cast(Vote),
    /// The (user, nominee) pair already has a vote. `existing` is `None` when
    /// the duplicate was detected by the unique constraint under a race.
    AlreadyVoted { existing: Option<Vote> },
}

/// Result of removing a vote inside the removal window.
#[derive(Debug, Clone)]
pub enum RemoveOutcome {
    Removed(Vote),
    /// The vote exists but is older than the removal window.
    Locked(Vote),
    NotFound,
}

/// One row of the vote export.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct VoteExportRow {
    pub vote_id: DbId,
    pub user_id: DbId,
    pub nominee_name: String,
    pub category: String,
    pub created_at: Timestamp,
}

/// Query parameters for the vote export.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VoteExportFilter {
    pub category: Option<String>,
    pub from: Option<Timestamp>,
    pub to: Option<Timestamp>,
}
