//! Route definitions for the `/nominees` resource and its votes.

use axum::routing::get;
use axum::Router;

use crate::handlers::{nominees, votes};
use crate::state::AppState;

/// Routes mounted at `/nominees`.
///
/// ```text
/// GET    /              -> list
/// POST   /              -> create (admin)
/// GET    /{id}          -> get_by_id
/// PUT    /{id}          -> update (admin)
/// DELETE /{id}          -> delete (admin)
/// GET    /{id}/vote     -> votes::status
/// POST   /{id}/vote     -> votes::cast
/// DELETE /{id}/vote     -> votes::remove
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(nominees::list).post(nominees::create))
        .route(
            "/{id}",
            get(nominees::get_by_id)
                .put(nominees::update)
                .delete(nominees::delete),
        )
        .route(
            "/{id}/vote",
            get(votes::status).post(votes::cast).delete(votes::remove),
        )
}
