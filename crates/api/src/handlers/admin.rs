//! Admin-only handlers: user roles, site configuration, activity log and
//! maintenance operations.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use laurels_core::error::CoreError;
use laurels_core::roles::Role;
use laurels_core::types::DbId;
use laurels_db::models::activity::ActivityEntry;
use laurels_db::models::site_config::{SiteConfigEntry, UpsertConfigValue, VOTING_OPEN_KEY};
use laurels_db::models::user::{UpdateRole, UserResponse};
use laurels_db::provision::{provision_schema, ProvisionError, ProvisionReport};
use laurels_db::repositories::{ActivityRepo, SiteConfigRepo, UserRepo, VoteRepo};
use laurels_events::{ActivityEvent, EventKind};
use serde::Serialize;
use serde_json::json;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::query::LimitParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// Result of `POST /api/v1/admin/maintenance/recount-votes`.
#[derive(Debug, Serialize)]
pub struct RecountResponse {
    /// Nominees whose stored counter differed and was corrected.
    pub corrected: u64,
}

fn is_valid_config_key(key: &str) -> bool {
    !key.is_empty()
        && key.len() <= 64
        && key
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

/// GET /api/v1/admin/users
pub async fn list_users(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<UserResponse>>>> {
    let users = UserRepo::list(&state.pool).await?;
    Ok(Json(DataResponse {
        data: users.into_iter().map(UserResponse::from).collect(),
    }))
}

/// PUT /api/v1/admin/users/{id}/role
pub async fn set_role(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateRole>,
) -> AppResult<Json<DataResponse<UserResponse>>> {
    let role = Role::parse(&input.role).ok_or_else(|| {
        AppError::Core(CoreError::Validation(format!(
            "role: '{}' is not a known role",
            input.role
        )))
    })?;
    if id == admin.user_id && role != Role::Admin {
        return Err(AppError::Core(CoreError::Validation(
            "Admins cannot remove their own admin role".into(),
        )));
    }

    let user = UserRepo::set_role(&state.pool, id, role.as_str())
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "User", id }))?;

    tracing::info!(user_id = id, role = role.as_str(), admin_id = admin.user_id, "Role changed");
    state.event_bus.publish(
        ActivityEvent::new(EventKind::UserRoleChanged)
            .on("user", id)
            .by(admin.user_id)
            .with_payload(json!({ "role": role.as_str() })),
    );
    Ok(Json(DataResponse {
        data: UserResponse::from(user),
    }))
}

// ---------------------------------------------------------------------------
// Site configuration
// ---------------------------------------------------------------------------

/// GET /api/v1/config
pub async fn public_config(
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<SiteConfigEntry>>>> {
    let entries = SiteConfigRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: entries }))
}

/// GET /api/v1/admin/config
pub async fn list_config(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<SiteConfigEntry>>>> {
    let entries = SiteConfigRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: entries }))
}

/// PUT /api/v1/admin/config/{key}
pub async fn upsert_config(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(key): Path<String>,
    Json(input): Json<UpsertConfigValue>,
) -> AppResult<Json<DataResponse<SiteConfigEntry>>> {
    if !is_valid_config_key(&key) {
        return Err(AppError::Core(CoreError::Validation(
            "key must contain only lowercase letters, digits and underscores".into(),
        )));
    }
    if key == VOTING_OPEN_KEY && !input.value.is_boolean() {
        return Err(AppError::Core(CoreError::Validation(format!(
            "{VOTING_OPEN_KEY} must be a boolean"
        ))));
    }

    let entry = SiteConfigRepo::upsert(&state.pool, &key, &input.value).await?;

    tracing::info!(key = %key, admin_id = admin.user_id, "Site config updated");
    state.event_bus.publish(
        ActivityEvent::new(EventKind::ConfigUpdated)
            .by(admin.user_id)
            .with_payload(json!({ "key": key, "value": input.value })),
    );
    Ok(Json(DataResponse { data: entry }))
}

/// DELETE /api/v1/admin/config/{key}
pub async fn delete_config(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> AppResult<StatusCode> {
    if !SiteConfigRepo::delete(&state.pool, &key).await? {
        return Err(AppError::Core(CoreError::NotFoundKey {
            entity: "Config",
            key,
        }));
    }

    state.event_bus.publish(
        ActivityEvent::new(EventKind::ConfigUpdated)
            .by(admin.user_id)
            .with_payload(json!({ "key": key, "deleted": true })),
    );
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Activity & maintenance
// ---------------------------------------------------------------------------

/// GET /api/v1/admin/activity?limit=
pub async fn activity(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Query(params): Query<LimitParams>,
) -> AppResult<Json<DataResponse<Vec<ActivityEntry>>>> {
    let entries = ActivityRepo::list_recent(&state.pool, params.limit).await?;
    Ok(Json(DataResponse { data: entries }))
}

/// POST /api/v1/admin/schema/repair
pub async fn repair_schema(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<ProvisionReport>>> {
    let report = provision_schema(&state.pool).await.map_err(|e| match e {
        ProvisionError::Database(db) => AppError::Database(db),
        ProvisionError::Migrate(m) => AppError::InternalError(format!("Migration failed: {m}")),
    })?;

    if !report.is_complete() {
        return Err(AppError::Core(CoreError::SchemaDrift(format!(
            "still missing after repair: {}",
            report.missing.join(", ")
        ))));
    }

    state.event_bus.publish(
        ActivityEvent::new(EventKind::SchemaRepaired)
            .by(admin.user_id)
            .with_payload(json!({
                "repaired": report.repaired,
                "verified_tables": report.verified_tables,
            })),
    );
    Ok(Json(DataResponse { data: report }))
}

/// POST /api/v1/admin/maintenance/recount-votes
pub async fn recount_votes(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<RecountResponse>>> {
    let corrected = VoteRepo::recount_all(&state.pool).await?;
    if corrected > 0 {
        tracing::warn!(corrected, admin_id = admin.user_id, "Vote counters were out of step and have been corrected");
    } else {
        tracing::info!(admin_id = admin.user_id, "Vote counters verified");
    }
    Ok(Json(DataResponse {
        data: RecountResponse { corrected },
    }))
}
