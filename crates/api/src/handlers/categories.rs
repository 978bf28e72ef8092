//! Handlers for the `/categories` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use laurels_core::error::CoreError;
use laurels_core::form::EntityForm;
use laurels_core::types::DbId;
use laurels_db::models::category::{
    Category, CategoryDeleteOutcome, CategoryWithCount, CreateCategory,
};
use laurels_db::repositories::CategoryRepo;
use laurels_events::{ActivityEvent, EventKind};
use serde_json::Value;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/categories
pub async fn list(
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<CategoryWithCount>>>> {
    let categories = CategoryRepo::list_with_counts(&state.pool).await?;
    Ok(Json(DataResponse { data: categories }))
}

/// GET /api/v1/categories/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Category>>> {
    let category = CategoryRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Category",
            id,
        }))?;
    Ok(Json(DataResponse { data: category }))
}

/// GET /api/v1/categories/slug/{slug}
pub async fn get_by_slug(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> AppResult<Json<DataResponse<Category>>> {
    let category = CategoryRepo::find_by_slug(&state.pool, &slug)
        .await?
        .ok_or(AppError::Core(CoreError::NotFoundKey {
            entity: "Category",
            key: slug,
        }))?;
    Ok(Json(DataResponse { data: category }))
}

/// POST /api/v1/categories
pub async fn create(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> AppResult<(StatusCode, Json<DataResponse<Category>>)> {
    let input = EntityForm::<CreateCategory>::create(body)?;
    let category = CategoryRepo::create(&state.pool, &input).await?;

    tracing::info!(category_id = category.id, name = %category.name, "Category created");
    state.event_bus.publish(
        ActivityEvent::new(EventKind::CategoryCreated)
            .on("category", category.id)
            .by(admin.user_id),
    );
    Ok((StatusCode::CREATED, Json(DataResponse { data: category })))
}

/// PUT /api/v1/categories/{id}
pub async fn update(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(body): Json<Value>,
) -> AppResult<Json<DataResponse<Category>>> {
    let input = EntityForm::<CreateCategory>::update(body)?;
    let category = CategoryRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Category",
            id,
        }))?;

    state.event_bus.publish(
        ActivityEvent::new(EventKind::CategoryUpdated)
            .on("category", id)
            .by(admin.user_id),
    );
    Ok(Json(DataResponse { data: category }))
}

/// DELETE /api/v1/categories/{id}
///
/// Refused with 409 while any nominee is filed under the category's name.
pub async fn delete(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    match CategoryRepo::delete_if_unused(&state.pool, id).await? {
        CategoryDeleteOutcome::Deleted => {
            tracing::info!(category_id = id, "Category deleted");
            state.event_bus.publish(
                ActivityEvent::new(EventKind::CategoryDeleted)
                    .on("category", id)
                    .by(admin.user_id),
            );
            Ok(StatusCode::NO_CONTENT)
        }
        CategoryDeleteOutcome::NotFound => Err(AppError::Core(CoreError::NotFound {
            entity: "Category",
            id,
        })),
        CategoryDeleteOutcome::InUse {
            name,
            nominee_count,
        } => Err(AppError::Core(CoreError::CategoryInUse {
            category: name,
            nominee_count,
        })),
    }
}
