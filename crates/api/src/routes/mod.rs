pub mod academy;
pub mod admin;
pub mod auth;
pub mod categories;
pub mod content;
pub mod events;
pub mod health;
pub mod nominees;

use axum::routing::get;
use axum::Router;

use crate::handlers;
use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Reads are public unless noted; every mutation except voting and the
/// auth flow requires the admin role.
///
/// ```text
/// /auth/signup|login|refresh|logout|me             session lifecycle
///
/// /categories                                      list, create
/// /categories/{id}                                 get, update, delete
/// /categories/slug/{slug}                          get by slug
///
/// /nominees                                        list (?category, ?tag, ?sort), create
/// /nominees/{id}                                   get, update, delete
/// /nominees/{id}/vote                              status, cast, remove (auth)
/// /votes/mine                                      caller's votes (auth)
///
/// /events                                          list (?featured, ?upcoming), create
/// /events/{id}                                     get, update, delete
///
/// /academy/genres[/{id}]                           genre CRUD
/// /academy/members[/{id}]                          member CRUD (?genre_id)
///
/// /content                                         stored documents (admin)
/// /content/stream                                  invalidation events (SSE)
/// /content/invalidate                              drop cached sections (admin)
/// /content/{section}                               get (cached), put, delete
///
/// /config                                          public site settings
///
/// /admin/users                                     list profiles
/// /admin/users/{id}/role                           change role
/// /admin/config[/{key}]                            list, upsert, delete settings
/// /admin/stats                                     dashboard
/// /admin/activity                                  recent activity
/// /admin/reports/votes                             CSV export
/// /admin/schema/repair                             provision schema
/// /admin/maintenance/recount-votes                 repair vote counters
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/categories", categories::router())
        .nest("/nominees", nominees::router())
        .route("/votes/mine", get(handlers::votes::mine))
        .nest("/events", events::router())
        .nest("/academy", academy::router())
        .nest("/content", content::router())
        .route("/config", get(handlers::admin::public_config))
        .nest("/admin", admin::router())
}
