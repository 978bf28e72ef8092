use std::sync::Arc;

use laurels_core::content::ContentCache;
use laurels_events::EventBus;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheap to clone; everything heavy sits behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub pool: laurels_db::DbPool,
    pub config: Arc<ServerConfig>,
    /// Activity events; persisted to `activity_log` by a background task.
    pub event_bus: Arc<EventBus>,
    pub content: Arc<ContentCache>,
}
