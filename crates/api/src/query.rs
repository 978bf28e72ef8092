//! Shared query parameter types for API handlers.

use serde::Deserialize;

/// `?limit=` for endpoints returning a bounded recent list. Clamped in the
/// repository layer.
#[derive(Debug, Default, Deserialize)]
pub struct LimitParams {
    pub limit: Option<i64>,
}
