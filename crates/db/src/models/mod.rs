//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts
//! - A `Deserialize` update DTO (all `Option` fields) for patches
//!
//! Create DTOs of admin-editable entities implement
//! [`FormEntity`](laurels_core::form::FormEntity) so that route handlers can
//! run them through the shared `EntityForm`.

pub mod academy;
pub mod activity;
pub mod category;
pub mod content;
pub mod dashboard;
pub mod event;
pub mod nominee;
pub mod session;
pub mod site_config;
pub mod user;
pub mod vote;
