//! Route definitions for the `/admin` resource.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::{admin, dashboard, reports};
use crate::state::AppState;

/// Routes mounted at `/admin`. Every handler requires the admin role.
///
/// ```text
/// GET    /users                          -> list_users
/// PUT    /users/{id}/role                -> set_role
/// GET    /config                         -> list_config
/// PUT    /config/{key}                   -> upsert_config
/// DELETE /config/{key}                   -> delete_config
/// GET    /stats                          -> dashboard::stats
/// GET    /activity                       -> activity
/// GET    /reports/votes                  -> reports::export_votes
/// POST   /schema/repair                  -> repair_schema
/// POST   /maintenance/recount-votes      -> recount_votes
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/users", get(admin::list_users))
        .route("/users/{id}/role", put(admin::set_role))
        .route("/config", get(admin::list_config))
        .route(
            "/config/{key}",
            put(admin::upsert_config).delete(admin::delete_config),
        )
        .route("/stats", get(dashboard::stats))
        .route("/activity", get(admin::activity))
        .route("/reports/votes", get(reports::export_votes))
        .route("/schema/repair", post(admin::repair_schema))
        .route("/maintenance/recount-votes", post(admin::recount_votes))
}
