//! Periodic purge of expired and revoked refresh-token sessions.

use std::time::Duration;

use laurels_db::repositories::SessionRepo;
use laurels_db::DbPool;
use tokio_util::sync::CancellationToken;

const CLEANUP_INTERVAL: Duration = Duration::from_secs(3600);

/// Run until `cancel` fires. The first pass runs immediately.
pub async fn run(pool: DbPool, cancel: CancellationToken) {
    tracing::info!(interval_secs = CLEANUP_INTERVAL.as_secs(), "Session cleanup job started");
    let mut interval = tokio::time::interval(CLEANUP_INTERVAL);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Session cleanup job stopping");
                break;
            }
            _ = interval.tick() => {
                match SessionRepo::cleanup_expired(&pool).await {
                    Ok(0) => tracing::debug!("Session cleanup: nothing to purge"),
                    Ok(deleted) => tracing::info!(deleted, "Session cleanup: purged stale sessions"),
                    Err(e) => tracing::error!(error = %e, "Session cleanup failed"),
                }
            }
        }
    }
}
