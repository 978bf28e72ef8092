//! In-process event bus backed by a `tokio::sync::broadcast` channel.
//!
//! [`EventBus`] is shared via `Arc<EventBus>` in the API state. Handlers
//! publish after their write has committed; the bus never participates in
//! the write itself.

use chrono::Utc;
use laurels_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

// ---------------------------------------------------------------------------
// EventKind
// ---------------------------------------------------------------------------

/// Every kind of activity the platform records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventKind {
    #[serde(rename = "vote.cast")]
    VoteCast,
    #[serde(rename = "vote.removed")]
    VoteRemoved,
    #[serde(rename = "category.created")]
    CategoryCreated,
    #[serde(rename = "category.updated")]
    CategoryUpdated,
    #[serde(rename = "category.deleted")]
    CategoryDeleted,
    #[serde(rename = "nominee.created")]
    NomineeCreated,
    #[serde(rename = "nominee.updated")]
    NomineeUpdated,
    #[serde(rename = "nominee.deleted")]
    NomineeDeleted,
    #[serde(rename = "event.created")]
    EventCreated,
    #[serde(rename = "event.updated")]
    EventUpdated,
    #[serde(rename = "event.deleted")]
    EventDeleted,
    #[serde(rename = "academy.changed")]
    AcademyChanged,
    #[serde(rename = "content.updated")]
    ContentUpdated,
    #[serde(rename = "config.updated")]
    ConfigUpdated,
    #[serde(rename = "user.signed_up")]
    UserSignedUp,
    #[serde(rename = "user.role_changed")]
    UserRoleChanged,
    #[serde(rename = "schema.repaired")]
    SchemaRepaired,
}

impl EventKind {
    /// Dot-separated name stored in `activity_log.event_type`.
    pub fn as_str(self) -> &'static str {
        match self {
            EventKind::VoteCast => "vote.cast",
            EventKind::VoteRemoved => "vote.removed",
            EventKind::CategoryCreated => "category.created",
            EventKind::CategoryUpdated => "category.updated",
            EventKind::CategoryDeleted => "category.deleted",
            EventKind::NomineeCreated => "nominee.created",
            EventKind::NomineeUpdated => "nominee.updated",
            EventKind::NomineeDeleted => "nominee.deleted",
            EventKind::EventCreated => "event.created",
            EventKind::EventUpdated => "event.updated",
            EventKind::EventDeleted => "event.deleted",
            EventKind::AcademyChanged => "academy.changed",
            EventKind::ContentUpdated => "content.updated",
            EventKind::ConfigUpdated => "config.updated",
            EventKind::UserSignedUp => "user.signed_up",
            EventKind::UserRoleChanged => "user.role_changed",
            EventKind::SchemaRepaired => "schema.repaired",
        }
    }
}

// ---------------------------------------------------------------------------
// ActivityEvent
// ---------------------------------------------------------------------------

/// Something that happened, who did it, and to what.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityEvent {
    pub kind: EventKind,

    /// Entity kind, e.g. `"nominee"`, `"content"`.
    pub entity_type: Option<String>,
    pub entity_id: Option<DbId>,
    pub actor_user_id: Option<DbId>,

    /// Free-form event-specific data.
    pub payload: serde_json::Value,
    pub occurred_at: Timestamp,
}

impl ActivityEvent {
    pub fn new(kind: EventKind) -> Self {
        Self {
            kind,
            entity_type: None,
            entity_id: None,
            actor_user_id: None,
            payload: serde_json::Value::Object(Default::default()),
            occurred_at: Utc::now(),
        }
    }

    pub fn on(mut self, entity_type: impl Into<String>, entity_id: DbId) -> Self {
        self.entity_type = Some(entity_type.into());
        self.entity_id = Some(entity_id);
        self
    }

    pub fn by(mut self, user_id: DbId) -> Self {
        self.actor_user_id = Some(user_id);
        self
    }

    pub fn with_payload(mut self, payload: serde_json::Value) -> Self {
        self.payload = payload;
        self
    }
}

// ---------------------------------------------------------------------------
// EventBus
// ---------------------------------------------------------------------------

const DEFAULT_CAPACITY: usize = 1024;

/// In-process fan-out event bus.
///
/// ```rust
/// use laurels_events::bus::{ActivityEvent, EventBus, EventKind};
///
/// let bus = EventBus::default();
/// let mut rx = bus.subscribe();
///
/// bus.publish(ActivityEvent::new(EventKind::VoteCast).on("nominee", 3).by(1));
/// ```
pub struct EventBus {
    sender: broadcast::Sender<ActivityEvent>,
}

impl EventBus {
    /// When the buffer is full, slow receivers observe `RecvError::Lagged`.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish to all current subscribers. Dropped silently when there are none.
    pub fn publish(&self, event: ActivityEvent) {
        let _ = self.sender.send(event);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ActivityEvent> {
        self.sender.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn subscriber_receives_enriched_event() {
        let bus = EventBus::default();
        let mut rx = bus.subscribe();

        bus.publish(
            ActivityEvent::new(EventKind::VoteCast)
                .on("nominee", 42)
                .by(7)
                .with_payload(serde_json::json!({"category": "Best Album"})),
        );

        let received = rx.recv().await.expect("should receive the event");
        assert_eq!(received.kind, EventKind::VoteCast);
        assert_eq!(received.entity_type.as_deref(), Some("nominee"));
        assert_eq!(received.entity_id, Some(42));
        assert_eq!(received.actor_user_id, Some(7));
        assert_eq!(received.payload["category"], "Best Album");
    }

    #[tokio::test]
    async fn every_subscriber_sees_each_event() {
        let bus = EventBus::default();
        let mut rx1 = bus.subscribe();
        let mut rx2 = bus.subscribe();

        bus.publish(ActivityEvent::new(EventKind::ContentUpdated));

        assert_eq!(rx1.recv().await.unwrap().kind, EventKind::ContentUpdated);
        assert_eq!(rx2.recv().await.unwrap().kind, EventKind::ContentUpdated);
    }

    #[test]
    fn publish_without_subscribers_is_a_no_op() {
        EventBus::default().publish(ActivityEvent::new(EventKind::SchemaRepaired));
    }

    #[test]
    fn kind_name_matches_serde_name() {
        for kind in [
            EventKind::VoteCast,
            EventKind::VoteRemoved,
            EventKind::CategoryDeleted,
            EventKind::ContentUpdated,
            EventKind::UserRoleChanged,
        ] {
            let json = serde_json::to_value(kind).unwrap();
            assert_eq!(json, serde_json::Value::String(kind.as_str().to_string()));
        }
    }
}
