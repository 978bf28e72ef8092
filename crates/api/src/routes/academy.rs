//! Route definitions for the `/academy` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::academy;
use crate::state::AppState;

/// Routes mounted at `/academy`.
///
/// ```text
/// GET    /genres           -> list_genres
/// POST   /genres           -> create_genre (admin)
/// GET    /genres/{id}      -> get_genre
/// PUT    /genres/{id}      -> update_genre (admin)
/// DELETE /genres/{id}      -> delete_genre (admin, 409 while it has members)
/// GET    /members          -> list_members
/// POST   /members          -> create_member (admin)
/// GET    /members/{id}     -> get_member
/// PUT    /members/{id}     -> update_member (admin)
/// DELETE /members/{id}     -> delete_member (admin)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/genres",
            get(academy::list_genres).post(academy::create_genre),
        )
        .route(
            "/genres/{id}",
            get(academy::get_genre)
                .put(academy::update_genre)
                .delete(academy::delete_genre),
        )
        .route(
            "/members",
            get(academy::list_members).post(academy::create_member),
        )
        .route(
            "/members/{id}",
            get(academy::get_member)
                .put(academy::update_member)
                .delete(academy::delete_member),
        )
}
