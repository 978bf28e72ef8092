//! Handlers for artistic genres and academy members.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use laurels_core::error::CoreError;
use laurels_core::form::EntityForm;
use laurels_core::store_error::StoreErrorKind;
use laurels_core::types::DbId;
use laurels_db::models::academy::{
    AcademyMember, AcademyMemberWithGenre, ArtisticGenre, CreateAcademyMember, CreateGenre,
    MemberListParams,
};
use laurels_db::repositories::{AcademyMemberRepo, GenreRepo};
use laurels_db::store_error::classify_sqlx;
use laurels_events::{ActivityEvent, EventKind};
use serde_json::{json, Value};

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

fn academy_changed(admin_id: DbId, entity_type: &'static str, id: DbId, action: &str) -> ActivityEvent {
    ActivityEvent::new(EventKind::AcademyChanged)
        .on(entity_type, id)
        .by(admin_id)
        .with_payload(json!({ "action": action }))
}

async fn ensure_genre_exists(state: &AppState, genre_id: DbId) -> AppResult<()> {
    if GenreRepo::find_by_id(&state.pool, genre_id).await?.is_none() {
        return Err(AppError::Core(CoreError::Validation(format!(
            "genre_id: genre {genre_id} does not exist"
        ))));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Genres
// ---------------------------------------------------------------------------

/// GET /api/v1/academy/genres
pub async fn list_genres(
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<ArtisticGenre>>>> {
    let genres = GenreRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: genres }))
}

/// GET /api/v1/academy/genres/{id}
pub async fn get_genre(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<ArtisticGenre>>> {
    let genre = GenreRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Genre",
            id,
        }))?;
    Ok(Json(DataResponse { data: genre }))
}

/// POST /api/v1/academy/genres
pub async fn create_genre(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> AppResult<(StatusCode, Json<DataResponse<ArtisticGenre>>)> {
    let input = EntityForm::<CreateGenre>::create(body)?;
    let genre = GenreRepo::create(&state.pool, &input).await?;

    state
        .event_bus
        .publish(academy_changed(admin.user_id, "genre", genre.id, "created"));
    Ok((StatusCode::CREATED, Json(DataResponse { data: genre })))
}

/// PUT /api/v1/academy/genres/{id}
pub async fn update_genre(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(body): Json<Value>,
) -> AppResult<Json<DataResponse<ArtisticGenre>>> {
    let input = EntityForm::<CreateGenre>::update(body)?;
    let genre = GenreRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Genre",
            id,
        }))?;

    state
        .event_bus
        .publish(academy_changed(admin.user_id, "genre", id, "updated"));
    Ok(Json(DataResponse { data: genre }))
}

/// DELETE /api/v1/academy/genres/{id}
///
/// Refused with 409 while members still belong to the genre.
pub async fn delete_genre(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let deleted = match GenreRepo::delete(&state.pool, id).await {
        Ok(deleted) => deleted,
        Err(e) if matches!(classify_sqlx(&e), StoreErrorKind::ForeignKeyViolation { .. }) => {
            return Err(AppError::Core(CoreError::Conflict(
                "Genre still has academy members".into(),
            )));
        }
        Err(e) => return Err(e.into()),
    };
    if !deleted {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Genre",
            id,
        }));
    }

    state
        .event_bus
        .publish(academy_changed(admin.user_id, "genre", id, "deleted"));
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Members
// ---------------------------------------------------------------------------

/// GET /api/v1/academy/members?genre_id=
pub async fn list_members(
    State(state): State<AppState>,
    Query(params): Query<MemberListParams>,
) -> AppResult<Json<DataResponse<Vec<AcademyMemberWithGenre>>>> {
    let members = AcademyMemberRepo::list(&state.pool, params.genre_id).await?;
    Ok(Json(DataResponse { data: members }))
}

/// GET /api/v1/academy/members/{id}
pub async fn get_member(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<AcademyMember>>> {
    let member = AcademyMemberRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "AcademyMember",
            id,
        }))?;
    Ok(Json(DataResponse { data: member }))
}

/// POST /api/v1/academy/members
pub async fn create_member(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> AppResult<(StatusCode, Json<DataResponse<AcademyMember>>)> {
    let input = EntityForm::<CreateAcademyMember>::create(body)?;
    ensure_genre_exists(&state, input.genre_id).await?;
    let member = AcademyMemberRepo::create(&state.pool, &input).await?;

    state
        .event_bus
        .publish(academy_changed(admin.user_id, "academy_member", member.id, "created"));
    Ok((StatusCode::CREATED, Json(DataResponse { data: member })))
}

/// PUT /api/v1/academy/members/{id}
pub async fn update_member(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(body): Json<Value>,
) -> AppResult<Json<DataResponse<AcademyMember>>> {
    let input = EntityForm::<CreateAcademyMember>::update(body)?;
    if let Some(genre_id) = input.genre_id {
        ensure_genre_exists(&state, genre_id).await?;
    }
    let member = AcademyMemberRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "AcademyMember",
            id,
        }))?;

    state
        .event_bus
        .publish(academy_changed(admin.user_id, "academy_member", id, "updated"));
    Ok(Json(DataResponse { data: member }))
}

/// DELETE /api/v1/academy/members/{id}
pub async fn delete_member(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if !AcademyMemberRepo::delete(&state.pool, id).await? {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "AcademyMember",
            id,
        }));
    }

    state
        .event_bus
        .publish(academy_changed(admin.user_id, "academy_member", id, "deleted"));
    Ok(StatusCode::NO_CONTENT)
}
