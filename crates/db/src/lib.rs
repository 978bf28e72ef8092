//! Database layer: connection pool, migrations, schema provisioning, models
//! and repositories.

use sqlx::postgres::PgPoolOptions;

pub mod content_source;
pub mod models;
pub mod provision;
pub mod repositories;
pub mod store_error;

pub type DbPool = sqlx::PgPool;

/// Migrations embedded at compile time from `crates/db/migrations`.
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");

/// Create a connection pool from a database URL.
pub async fn create_pool(database_url: &str) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(20)
        .connect(database_url)
        .await
}

/// Round-trip a trivial query to confirm the database is reachable.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}
