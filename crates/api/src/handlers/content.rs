//! Handlers for editable page content.
//!
//! Reads are served from the shared [`ContentCache`](laurels_core::content::ContentCache).
//! Every write invalidates the affected section, which also notifies
//! clients connected to the `/content/stream` event stream.

use std::convert::Infallible;
use std::time::Duration;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::Json;
use futures::stream::{Stream, StreamExt};
use laurels_core::content::ContentDocument;
use laurels_core::error::CoreError;
use laurels_core::slug::is_valid_slug;
use laurels_db::models::content::{Content, UpsertContent};
use laurels_db::repositories::ContentRepo;
use laurels_events::{ActivityEvent, EventKind};
use serde::Deserialize;
use serde_json::json;
use tokio_stream::wrappers::BroadcastStream;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

const KEEP_ALIVE_INTERVAL: Duration = Duration::from_secs(15);

/// Body of `POST /api/v1/content/invalidate`. An absent section clears all.
#[derive(Debug, Default, Deserialize)]
pub struct InvalidateRequest {
    pub section: Option<String>,
}

fn check_section(section: &str) -> AppResult<()> {
    if !is_valid_slug(section) {
        return Err(AppError::Core(CoreError::Validation(format!(
            "'{section}' is not a valid content section name"
        ))));
    }
    Ok(())
}

/// GET /api/v1/content/{section}
///
/// Never fails for a well-formed name: missing or unreachable content
/// resolves to the built-in default with `is_fallback: true`.
pub async fn get_section(
    State(state): State<AppState>,
    Path(section): Path<String>,
) -> AppResult<Json<DataResponse<ContentDocument>>> {
    check_section(&section)?;
    let document = state.content.get(&section).await;
    Ok(Json(DataResponse { data: document }))
}

/// GET /api/v1/content
///
/// Stored documents only, straight from the database.
pub async fn list_stored(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<Content>>>> {
    let content = ContentRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: content }))
}

/// PUT /api/v1/content/{section}
pub async fn upsert(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(section): Path<String>,
    Json(input): Json<UpsertContent>,
) -> AppResult<Json<DataResponse<Content>>> {
    check_section(&section)?;
    if !input.document.is_object() {
        return Err(AppError::Core(CoreError::Validation(
            "document must be a JSON object".into(),
        )));
    }

    let content = ContentRepo::upsert(&state.pool, &section, &input.document, Some(admin.user_id))
        .await?;
    state.content.invalidate(Some(&section)).await;

    tracing::info!(section = %section, admin_id = admin.user_id, "Content updated");
    state.event_bus.publish(
        ActivityEvent::new(EventKind::ContentUpdated)
            .on("content", content.id)
            .by(admin.user_id)
            .with_payload(json!({ "section": section })),
    );
    Ok(Json(DataResponse { data: content }))
}

/// DELETE /api/v1/content/{section}
///
/// Readers fall back to the built-in default afterwards.
pub async fn delete(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(section): Path<String>,
) -> AppResult<StatusCode> {
    check_section(&section)?;
    if !ContentRepo::delete(&state.pool, &section).await? {
        return Err(AppError::Core(CoreError::NotFoundKey {
            entity: "Content",
            key: section,
        }));
    }
    state.content.invalidate(Some(&section)).await;

    state.event_bus.publish(
        ActivityEvent::new(EventKind::ContentUpdated)
            .by(admin.user_id)
            .with_payload(json!({ "section": section, "deleted": true })),
    );
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/content/invalidate
pub async fn invalidate(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    body: Option<Json<InvalidateRequest>>,
) -> AppResult<StatusCode> {
    let Json(request) = body.unwrap_or_default();
    if let Some(section) = &request.section {
        check_section(section)?;
    }

    state.content.invalidate(request.section.as_deref()).await;
    tracing::info!(section = ?request.section, admin_id = admin.user_id, "Content cache invalidated");
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/content/stream
///
/// Server-Sent Events: one `invalidated` event per cache invalidation.
/// Clients that fall behind skip the missed events and keep streaming.
pub async fn stream(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let rx = state.content.subscribe();
    tracing::debug!("Content stream client connected");

    let stream = BroadcastStream::new(rx).filter_map(|result| async move {
        match result {
            Ok(invalidation) => match Event::default().event("invalidated").json_data(&invalidation) {
                Ok(event) => Some(Ok(event)),
                Err(e) => {
                    tracing::warn!(error = %e, "Failed to encode content invalidation");
                    None
                }
            },
            Err(e) => {
                tracing::warn!(error = %e, "Content stream lagged");
                None
            }
        }
    });

    Sse::new(stream).keep_alive(
        KeepAlive::new()
            .interval(KEEP_ALIVE_INTERVAL)
            .text("keep-alive"),
    )
}
