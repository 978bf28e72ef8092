//! Handlers for the `/nominees` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use laurels_core::error::CoreError;
use laurels_core::form::EntityForm;
use laurels_core::types::DbId;
use laurels_db::models::nominee::{CreateNominee, Nominee, NomineeListParams, NomineeWriteOutcome};
use laurels_db::repositories::NomineeRepo;
use laurels_events::{ActivityEvent, EventKind};
use serde_json::Value;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

/// Nominees reference their category by name; it has to exist.
fn unknown_category(category: &str) -> AppError {
    AppError::Core(CoreError::Validation(format!(
        "category: '{category}' does not exist"
    )))
}

/// GET /api/v1/nominees?category=&tag=&sort=name|votes|newest&limit=&offset=
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<NomineeListParams>,
) -> AppResult<Json<DataResponse<Vec<Nominee>>>> {
    let nominees = NomineeRepo::list(&state.pool, &params).await?;
    Ok(Json(DataResponse { data: nominees }))
}

/// GET /api/v1/nominees/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Nominee>>> {
    let nominee = NomineeRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Nominee",
            id,
        }))?;
    Ok(Json(DataResponse { data: nominee }))
}

/// POST /api/v1/nominees
pub async fn create(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> AppResult<(StatusCode, Json<DataResponse<Nominee>>)> {
    let input = EntityForm::<CreateNominee>::create(body)?;
    let nominee = match NomineeRepo::create(&state.pool, &input).await? {
        NomineeWriteOutcome::Saved(nominee) => nominee,
        NomineeWriteOutcome::UnknownCategory(category) => return Err(unknown_category(&category)),
    };

    tracing::info!(nominee_id = nominee.id, category = %nominee.category, "Nominee created");
    state.event_bus.publish(
        ActivityEvent::new(EventKind::NomineeCreated)
            .on("nominee", nominee.id)
            .by(admin.user_id),
    );
    Ok((StatusCode::CREATED, Json(DataResponse { data: nominee })))
}

/// PUT /api/v1/nominees/{id}
pub async fn update(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(body): Json<Value>,
) -> AppResult<Json<DataResponse<Nominee>>> {
    let input = EntityForm::<CreateNominee>::update(body)?;
    let outcome = NomineeRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Nominee",
            id,
        }))?;
    let nominee = match outcome {
        NomineeWriteOutcome::Saved(nominee) => nominee,
        NomineeWriteOutcome::UnknownCategory(category) => return Err(unknown_category(&category)),
    };

    state.event_bus.publish(
        ActivityEvent::new(EventKind::NomineeUpdated)
            .on("nominee", id)
            .by(admin.user_id),
    );
    Ok(Json(DataResponse { data: nominee }))
}

/// DELETE /api/v1/nominees/{id}
///
/// The nominee's votes go with it.
pub async fn delete(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if !NomineeRepo::delete(&state.pool, id).await? {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Nominee",
            id,
        }));
    }

    state.event_bus.publish(
        ActivityEvent::new(EventKind::NomineeDeleted)
            .on("nominee", id)
            .by(admin.user_id),
    );
    Ok(StatusCode::NO_CONTENT)
}
