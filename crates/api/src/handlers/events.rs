//! Handlers for the `/events` resource.
//!
//! Public reads go through [`with_schema_repair`] so a freshly restored
//! database missing newer columns heals itself on first access.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use laurels_core::error::CoreError;
use laurels_core::form::EntityForm;
use laurels_core::types::DbId;
use laurels_db::models::event::{CreateEvent, Event, EventListParams};
use laurels_db::provision::with_schema_repair;
use laurels_db::repositories::EventRepo;
use laurels_events::{ActivityEvent, EventKind};
use serde_json::Value;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/events?featured=&upcoming=&limit=
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<EventListParams>,
) -> AppResult<Json<DataResponse<Vec<Event>>>> {
    let pool = &state.pool;
    let events = with_schema_repair(pool, || EventRepo::list(pool, &params)).await?;
    Ok(Json(DataResponse { data: events }))
}

/// GET /api/v1/events/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Event>>> {
    let pool = &state.pool;
    let event = with_schema_repair(pool, || EventRepo::find_by_id(pool, id))
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Event",
            id,
        }))?;
    Ok(Json(DataResponse { data: event }))
}

/// POST /api/v1/events
pub async fn create(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> AppResult<(StatusCode, Json<DataResponse<Event>>)> {
    let input = EntityForm::<CreateEvent>::create(body)?;
    let event = EventRepo::create(&state.pool, &input).await?;

    tracing::info!(event_id = event.id, "Event created");
    state.event_bus.publish(
        ActivityEvent::new(EventKind::EventCreated)
            .on("event", event.id)
            .by(admin.user_id),
    );
    Ok((StatusCode::CREATED, Json(DataResponse { data: event })))
}

/// PUT /api/v1/events/{id}
pub async fn update(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(body): Json<Value>,
) -> AppResult<Json<DataResponse<Event>>> {
    let input = EntityForm::<CreateEvent>::update(body)?;
    let event = EventRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Event",
            id,
        }))?;

    state.event_bus.publish(
        ActivityEvent::new(EventKind::EventUpdated)
            .on("event", id)
            .by(admin.user_id),
    );
    Ok(Json(DataResponse { data: event }))
}

/// DELETE /api/v1/events/{id}
pub async fn delete(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if !EventRepo::delete(&state.pool, id).await? {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Event",
            id,
        }));
    }

    state.event_bus.publish(
        ActivityEvent::new(EventKind::EventDeleted)
            .on("event", id)
            .by(admin.user_id),
    );
    Ok(StatusCode::NO_CONTENT)
}
