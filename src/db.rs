//! Database connection pool and migration management.
//!
//! This module provides utilities for:
//! - Creating a PostgreSQL connection pool
//! - Applying the bundled reference schema when asked to

use sqlx::{Pool, Postgres};

/// Type alias for PostgreSQL connection pool.
pub type DbPool = Pool<Postgres>;

/// Create a new PostgreSQL connection pool.
///
/// The pool connects lazily: no connection is opened until the first request
/// borrows one, so the server can start while the database is still down.
/// Each request checks a connection out and hands it back when the borrow is
/// dropped, including on early returns and errors.
///
/// # Arguments
///
/// * `database_url` - PostgreSQL connection string
/// * `max_connections` - Upper bound on concurrently open connections
///
/// # Errors
///
/// Returns an error if the connection string cannot be parsed.
pub fn create_pool(database_url: &str, max_connections: u32) -> Result<DbPool, sqlx::Error> {
    sqlx::postgres::PgPoolOptions::new()
        .max_connections(max_connections)
        .connect_lazy(database_url)
}

/// Run database migrations from the `migrations/` directory.
///
/// The ledger tables are normally provisioned outside this service; the
/// bundled migration is a reference schema for local setups and only runs
/// when `RUN_MIGRATIONS=true`. Migrations are tracked in the `_sqlx_migrations`
/// table, so each one runs once.
///
/// # Errors
///
/// Returns an error if the database is unreachable or a migration fails.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    // The macro reads migrations at compile time from ./migrations directory
    sqlx::migrate!("./migrations").run(pool).await
}
