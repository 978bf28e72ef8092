pub mod academy;
pub mod admin;
pub mod auth;
pub mod categories;
pub mod content;
pub mod dashboard;
pub mod events;
pub mod nominees;
pub mod reports;
pub mod votes;
