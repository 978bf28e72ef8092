//! Idempotent schema provisioning and drift repair.
//!
//! There is exactly one ladder for bringing the schema into shape:
//!
//! 1. apply pending migrations;
//! 2. verify every required table and column;
//! 3. if anything is missing, re-execute every migration script and verify
//!    again. Each script re-adds its tables' columns with `ADD COLUMN IF NOT
//!    EXISTS` before rebuilding the indexes and constraints on them;
//! 4. if `nominees.votes_count` was among the missing columns, recompute the
//!    counters from the vote rows.
//!
//! [`with_schema_repair`] wraps a store operation so that a schema-drift
//! failure triggers one provisioning pass and one retry.

use std::future::Future;

use serde::Serialize;

use crate::repositories::VoteRepo;
use crate::store_error::classify_sqlx;
use crate::{DbPool, MIGRATOR};

/// Tables and the columns the application reads from each.
pub const REQUIRED_SCHEMA: &[(&str, &[&str])] = &[
    ("user_profiles", &["id", "email", "password_hash", "role", "is_active"]),
    ("user_sessions", &["id", "user_id", "refresh_token_hash", "expires_at"]),
    ("categories", &["id", "name", "slug", "description"]),
    ("nominees", &["id", "name", "category", "description", "image_url", "gallery", "tags", "votes_count"]),
    ("votes", &["id", "user_id", "nominee_id", "created_at"]),
    ("events", &["id", "title", "description", "event_date", "location", "image_url", "capacity", "is_featured"]),
    ("artistic_genres", &["id", "name", "slug", "description"]),
    ("academy_members", &["id", "name", "genre_id", "bio", "image_url", "social_media", "achievements"]),
    ("content", &["id", "section", "document", "updated_by"]),
    ("site_config", &["id", "key", "value"]),
    ("activity_log", &["id", "event_type", "entity_type", "entity_id", "actor_user_id", "payload"]),
];

/// Outcome of a provisioning pass.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProvisionReport {
    /// Whether migration scripts had to be re-executed to repair drift.
    pub repaired: bool,
    pub verified_tables: Vec<String>,
    /// `table` or `table.column` entries still missing after repair.
    pub missing: Vec<String>,
}

impl ProvisionReport {
    pub fn is_complete(&self) -> bool {
        self.missing.is_empty()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ProvisionError {
    #[error("Migration failed: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Run the provisioning ladder. Safe to call at any time and repeatedly.
pub async fn provision_schema(pool: &DbPool) -> Result<ProvisionReport, ProvisionError> {
    MIGRATOR.run(pool).await?;

    let mut report = verify_schema(pool).await?;
    if report.is_complete() {
        return Ok(report);
    }

    tracing::warn!(missing = ?report.missing, "Schema drift detected, re-applying migration scripts");
    let counters_lost = report.missing.iter().any(|m| m == "nominees" || m == "nominees.votes_count");

    for migration in MIGRATOR.iter() {
        if migration.migration_type.is_down_migration() {
            continue;
        }
        sqlx::raw_sql(&migration.sql).execute(pool).await?;
        tracing::debug!(version = migration.version, description = %migration.description, "Re-applied migration");
    }

    report = verify_schema(pool).await?;
    report.repaired = true;

    if report.is_complete() {
        if counters_lost {
            let corrected = VoteRepo::recount_all(pool).await?;
            tracing::info!(corrected, "Recomputed vote counters after repair");
        }
        tracing::info!("Schema repaired");
    } else {
        tracing::error!(missing = ?report.missing, "Schema still incomplete after repair");
    }
    Ok(report)
}

/// Check that every table and column in [`REQUIRED_SCHEMA`] exists.
pub async fn verify_schema(pool: &DbPool) -> Result<ProvisionReport, sqlx::Error> {
    let rows: Vec<(String, String)> = sqlx::query_as(
        "SELECT table_name::text, column_name::text
         FROM information_schema.columns
         WHERE table_schema = current_schema()",
    )
    .fetch_all(pool)
    .await?;

    let mut report = ProvisionReport::default();
    for (table, columns) in REQUIRED_SCHEMA {
        let present: Vec<&str> = rows
            .iter()
            .filter(|(t, _)| t == table)
            .map(|(_, c)| c.as_str())
            .collect();

        if present.is_empty() {
            report.missing.push((*table).to_string());
            continue;
        }

        let mut table_ok = true;
        for column in *columns {
            if !present.contains(column) {
                report.missing.push(format!("{table}.{column}"));
                table_ok = false;
            }
        }
        if table_ok {
            report.verified_tables.push((*table).to_string());
        }
    }
    Ok(report)
}

/// Run `op`; if it fails because a table or column is missing, provision the
/// schema once and retry `op` once.
pub async fn with_schema_repair<T, F, Fut>(pool: &DbPool, mut op: F) -> Result<T, sqlx::Error>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, sqlx::Error>>,
{
    match op().await {
        Err(e) if classify_sqlx(&e).is_schema_drift() => {
            tracing::warn!(error = %e, "Store reported schema drift, provisioning");
            match provision_schema(pool).await {
                Ok(report) if report.is_complete() => op().await,
                Ok(_) => Err(e),
                Err(ProvisionError::Database(db)) => Err(db),
                Err(ProvisionError::Migrate(m)) => {
                    tracing::error!(error = %m, "Provisioning failed during repair");
                    Err(e)
                }
            }
        }
        other => other,
    }
}
