//! Background jobs spawned by `main`. Each takes a [`CancellationToken`]
//! and returns once it is cancelled.
//!
//! [`CancellationToken`]: tokio_util::sync::CancellationToken

pub mod session_cleanup;
