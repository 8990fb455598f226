//! Database connection pool, migrations and the transactional store.
//!
//! This module provides:
//! - Creating and managing a PostgreSQL connection pool
//! - Running database migrations automatically
//! - [`Queries`]: single-statement data operations
//! - [`Store`]: the atomic execution primitive and the transaction scripts built on it

pub mod error;
pub mod queries;
pub mod store;

pub use error::{StoreError, classify};
pub use queries::{PoolQueries, Queries, TxQueries};
pub use store::Store;

use sqlx::{Pool, Postgres};

/// Type alias for PostgreSQL connection pool.
pub type DbPool = Pool<Postgres>;

/// Create a new PostgreSQL connection pool.
///
/// Every concurrently running transaction script holds one connection for
/// its whole duration, so `max_connections` bounds how many scripts make
/// progress at once. Callers beyond that wait for a free connection.
///
/// # Errors
///
/// Returns an error if:
/// - Database connection string is invalid
/// - Cannot connect to PostgreSQL server
/// - Database authentication fails
pub async fn create_pool(database_url: &str, max_connections: u32) -> Result<DbPool, sqlx::Error> {
    sqlx::postgres::PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await
}

/// Run database migrations from the `migrations/` directory.
///
/// Migrations are tracked in the `_sqlx_migrations` table, so each one runs
/// only once. Concurrent callers serialize on a PostgreSQL advisory lock.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    // The macro embeds ./migrations at compile time
    sqlx::migrate!("./migrations").run(pool).await
}
