//! Handlers for casting, withdrawing and inspecting votes.
//!
//! Casting and withdrawal require an active account. Casting is also gated
//! by the `voting_open` site setting. Withdrawal is only
//! possible inside the removal window; the repository's DELETE measures the
//! window on the database clock. [`VoteState`] is reporting only.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use laurels_core::error::CoreError;
use laurels_core::types::{DbId, Timestamp};
use laurels_core::voting::VoteState;
use laurels_db::models::vote::{CastOutcome, RemoveOutcome};
use laurels_db::repositories::{NomineeRepo, SiteConfigRepo, VoteRepo};
use laurels_events::{ActivityEvent, EventKind};
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireActive;
use crate::response::DataResponse;
use crate::state::AppState;

/// Lifecycle state of the caller's vote for one nominee.
#[derive(Debug, Serialize)]
pub struct VoteStatus {
    pub nominee_id: DbId,
    #[serde(flatten)]
    pub state: VoteState,
}

/// One of the caller's votes with its current state.
#[derive(Debug, Serialize)]
pub struct MyVote {
    pub vote_id: DbId,
    pub nominee_id: DbId,
    pub nominee_name: String,
    pub category: String,
    pub created_at: Timestamp,
    #[serde(flatten)]
    pub state: VoteState,
}

/// POST /api/v1/nominees/{id}/vote
pub async fn cast(
    State(state): State<AppState>,
    RequireActive(user): RequireActive,
    Path(nominee_id): Path<DbId>,
) -> AppResult<(StatusCode, Json<DataResponse<VoteStatus>>)> {
    if !SiteConfigRepo::voting_open(&state.pool).await? {
        return Err(AppError::Core(CoreError::Forbidden(
            "Voting is currently closed".into(),
        )));
    }

    if !NomineeRepo::exists(&state.pool, nominee_id).await? {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Nominee",
            id: nominee_id,
        }));
    }

    let vote = match VoteRepo::cast(&state.pool, user.user_id, nominee_id).await? {
        CastOutcome::Cast(vote) => vote,
        CastOutcome::AlreadyVoted { .. } => {
            return Err(AppError::Core(CoreError::AlreadyVoted { nominee_id }));
        }
    };

    tracing::info!(user_id = user.user_id, nominee_id, "Vote cast");
    state.event_bus.publish(
        ActivityEvent::new(EventKind::VoteCast)
            .on("nominee", nominee_id)
            .by(user.user_id),
    );

    let status = VoteStatus {
        nominee_id,
        state: VoteState::at(Some(vote.created_at), Utc::now()),
    };
    Ok((StatusCode::CREATED, Json(DataResponse { data: status })))
}

/// DELETE /api/v1/nominees/{id}/vote
///
/// 204 inside the window, 403 `VOTE_LOCKED` after it, 404 without a vote.
pub async fn remove(
    State(state): State<AppState>,
    RequireActive(user): RequireActive,
    Path(nominee_id): Path<DbId>,
) -> AppResult<StatusCode> {
    match VoteRepo::remove_within_window(&state.pool, user.user_id, nominee_id).await? {
        RemoveOutcome::Removed(vote) => {
            tracing::info!(user_id = user.user_id, nominee_id, vote_id = vote.id, "Vote removed");
            state.event_bus.publish(
                ActivityEvent::new(EventKind::VoteRemoved)
                    .on("nominee", nominee_id)
                    .by(user.user_id),
            );
            Ok(StatusCode::NO_CONTENT)
        }
        RemoveOutcome::Locked(vote) => {
            tracing::info!(user_id = user.user_id, nominee_id, voted_at = %vote.created_at, "Vote removal refused, window elapsed");
            Err(AppError::Core(CoreError::VoteLocked { nominee_id }))
        }
        RemoveOutcome::NotFound => Err(AppError::Core(CoreError::NotFound {
            entity: "Vote",
            id: nominee_id,
        })),
    }
}

/// GET /api/v1/nominees/{id}/vote
pub async fn status(
    State(state): State<AppState>,
    user: AuthUser,
    Path(nominee_id): Path<DbId>,
) -> AppResult<Json<DataResponse<VoteStatus>>> {
    let vote = VoteRepo::find(&state.pool, user.user_id, nominee_id).await?;
    let status = VoteStatus {
        nominee_id,
        state: VoteState::at(vote.map(|v| v.created_at), Utc::now()),
    };
    Ok(Json(DataResponse { data: status }))
}

/// GET /api/v1/votes/mine
pub async fn mine(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<DataResponse<Vec<MyVote>>>> {
    let now = Utc::now();
    let votes = VoteRepo::list_for_user(&state.pool, user.user_id)
        .await?
        .into_iter()
        .map(|v| MyVote {
            vote_id: v.id,
            nominee_id: v.nominee_id,
            nominee_name: v.nominee_name,
            category: v.category,
            created_at: v.created_at,
            state: VoteState::at(Some(v.created_at), now),
        })
        .collect();
    Ok(Json(DataResponse { data: votes }))
}
