//! Authentication and authorization extractors.
//!
//! - [`auth::AuthUser`] -- the caller identified by a JWT Bearer token.
//! - [`rbac::RequireActive`] -- a signed-in caller whose profile is still active.
//! - [`rbac::RequireAdmin`] -- an active profile whose stored role is `admin`.

pub mod auth;
pub mod rbac;
