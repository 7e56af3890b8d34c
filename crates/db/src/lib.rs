//! Worklog persistence.
//!
//! Row models and zero-sized repositories over `&PgPool`, plus the
//! [`store::WorklogStore`] abstraction the API reads through. Two stores are
//! provided: [`pg::PgWorklogStore`] for PostgreSQL and
//! [`memory::MemoryStore`] for tests and local tooling.

use sqlx::postgres::PgPoolOptions;

pub mod filter_sql;
pub mod memory;
pub mod models;
pub mod pg;
pub mod repositories;
pub mod store;

pub use store::{StoreError, Upserted, WorklogStore};

pub type DbPool = sqlx::PgPool;

/// Create a connection pool from a database URL.
pub async fn create_pool(database_url: &str, max_connections: u32) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await
}

/// Run a trivial query to verify connectivity.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Apply the workspace migrations in `db/migrations`.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("../../db/migrations").run(pool).await
}
