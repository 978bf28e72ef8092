//! [`ContentSource`] backed by the `content` table.

use async_trait::async_trait;
use laurels_core::content::ContentSource;
use laurels_core::error::CoreError;
use laurels_core::store_error::StoreErrorKind;
use serde_json::Value;

use crate::provision::with_schema_repair;
use crate::repositories::ContentRepo;
use crate::store_error::classify_sqlx;
use crate::DbPool;

pub struct PgContentSource {
    pool: DbPool,
}

impl PgContentSource {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ContentSource for PgContentSource {
    async fn fetch(&self, section: &str) -> Result<Option<Value>, CoreError> {
        let row = with_schema_repair(&self.pool, || ContentRepo::find_by_section(&self.pool, section))
            .await
            .map_err(|e| match classify_sqlx(&e) {
                StoreErrorKind::Transient => CoreError::Transient(e.to_string()),
                kind if kind.is_schema_drift() => CoreError::SchemaDrift(e.to_string()),
                _ => CoreError::Internal(e.to_string()),
            })?;
        Ok(row.map(|c| c.document))
    }
}
