//! Writes every [`ActivityEvent`] on the bus to `activity_log`.

use laurels_db::models::activity::NewActivity;
use laurels_db::repositories::ActivityRepo;
use laurels_db::DbPool;
use tokio::sync::broadcast;

use crate::bus::ActivityEvent;

/// Background service that persists activity events.
pub struct ActivityPersistence;

impl ActivityPersistence {
    /// Run until the bus is dropped. A failed insert is logged and skipped.
    pub async fn run(pool: DbPool, mut receiver: broadcast::Receiver<ActivityEvent>) {
        loop {
            match receiver.recv().await {
                Ok(event) => {
                    if let Err(e) = Self::persist(&pool, &event).await {
                        tracing::error!(
                            error = %e,
                            event_type = event.kind.as_str(),
                            "Failed to persist activity event"
                        );
                    }
                }
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    tracing::warn!(skipped = n, "Activity persistence lagged, events lost");
                }
                Err(broadcast::error::RecvError::Closed) => {
                    tracing::info!("Event bus closed, activity persistence shutting down");
                    break;
                }
            }
        }
    }

    async fn persist(pool: &DbPool, event: &ActivityEvent) -> Result<(), sqlx::Error> {
        ActivityRepo::insert(
            pool,
            &NewActivity {
                event_type: event.kind.as_str(),
                entity_type: event.entity_type.as_deref(),
                entity_id: event.entity_id,
                actor_user_id: event.actor_user_id,
                payload: &event.payload,
            },
        )
        .await?;
        Ok(())
    }
}
