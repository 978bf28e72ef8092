//! Laurels activity events.
//!
//! - [`EventBus`]: in-process publish/subscribe hub backed by
//!   `tokio::sync::broadcast`.
//! - [`ActivityEvent`]: the domain event envelope, tagged with an [`EventKind`].
//! - [`ActivityPersistence`]: background service that writes every event to
//!   the `activity_log` table.

pub mod bus;
pub mod persistence;

pub use bus::{ActivityEvent, EventBus, EventKind};
pub use persistence::ActivityPersistence;
