//! Route definitions for the `/content` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::content;
use crate::state::AppState;

/// Routes mounted at `/content`.
///
/// ```text
/// GET    /              -> list_stored (admin)
/// GET    /stream        -> stream (SSE)
/// POST   /invalidate    -> invalidate (admin)
/// GET    /{section}     -> get_section
/// PUT    /{section}     -> upsert (admin)
/// DELETE /{section}     -> delete (admin)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(content::list_stored))
        .route("/stream", get(content::stream))
        .route("/invalidate", post(content::invalidate))
        .route(
            "/{section}",
            get(content::get_section)
                .put(content::upsert)
                .delete(content::delete),
        )
}
