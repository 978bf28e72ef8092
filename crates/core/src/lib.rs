//! Domain logic for the Laurels awards and voting service.
//!
//! Everything in this crate is free of database access so it can be unit
//! tested in isolation and shared by the repository and HTTP layers.

pub mod content;
pub mod csv;
pub mod error;
pub mod form;
pub mod roles;
pub mod slug;
pub mod store_error;
pub mod types;
pub mod voting;
