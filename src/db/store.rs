//! The transactional store.
//!
//! [`Store`] owns the connection pool and runs transaction bodies
//! atomically. The transaction scripts (`transfer_tx`, `create_user_tx`,
//! `verify_email_tx`) live in [`crate::services`] and are all built on
//! [`Store::run_atomic`].
//!
//! # Atomicity Guarantees
//!
//! Each `run_atomic` call opens exactly one PostgreSQL transaction, owned by
//! that call alone. The body either commits as a whole or rolls back as a
//! whole; nothing is retried.

use std::time::Duration;

use futures::future::BoxFuture;

use super::{DbPool, PoolQueries, Queries, StoreError, TxQueries};

/// Connection pool plus the deadline applied to every transaction.
///
/// Cloning is cheap: the pool is reference counted. Construct one at
/// startup, share clones, and call [`Store::close`] at shutdown.
#[derive(Debug, Clone)]
pub struct Store {
    pool: DbPool,
    tx_timeout: Duration,
}

impl Store {
    pub fn new(pool: DbPool, tx_timeout: Duration) -> Self {
        Self { pool, tx_timeout }
    }

    /// Returns the underlying connection pool.
    pub fn pool(&self) -> &DbPool {
        &self.pool
    }

    /// Check a connection out of the pool for single-statement operations.
    pub async fn queries(&self) -> Result<PoolQueries, StoreError> {
        Ok(Queries::new(self.pool.acquire().await?))
    }

    /// Close the pool, waiting for checked-out connections to return.
    pub async fn close(&self) {
        self.pool.close().await;
    }

    /// Run `body` inside one database transaction.
    ///
    /// # Process
    ///
    /// 1. Begin a transaction and cap each statement at the store deadline
    /// 2. Run `body` with a transaction-scoped [`Queries`], also under the deadline
    /// 3. Commit if `body` succeeded, roll back otherwise
    ///
    /// # Errors
    ///
    /// - Whatever `body` returned, after a successful rollback
    /// - `CanceledOperation`: the deadline elapsed (the transaction is rolled back)
    /// - `RollbackFailed`: the rollback itself failed, carrying the original cause
    /// - `CommitFailed`: COMMIT failed and the outcome is unknown
    ///
    /// Dropping the returned future before it completes drops the open
    /// transaction, which sqlx rolls back.
    pub async fn run_atomic<T, F>(&self, body: F) -> Result<T, StoreError>
    where
        T: Send,
        F: for<'c> FnOnce(&'c mut TxQueries) -> BoxFuture<'c, Result<T, StoreError>> + Send,
    {
        let mut tx = self.pool.begin().await?;

        // Lock waits count against the deadline too; PostgreSQL cancels the
        // statement with 57014 once it fires.
        sqlx::query("SELECT set_config('statement_timeout', $1, true)")
            .bind(format!("{}ms", self.tx_timeout.as_millis()))
            .execute(&mut *tx)
            .await?;

        let mut queries = Queries::new(tx);
        let outcome = match tokio::time::timeout(self.tx_timeout, body(&mut queries)).await {
            Ok(outcome) => outcome,
            Err(_) => Err(StoreError::CanceledOperation),
        };
        let tx = queries.into_inner();

        match outcome {
            Ok(value) => {
                tx.commit().await.map_err(|err| {
                    tracing::error!("Commit failed, outcome indeterminate: {}", err);
                    StoreError::CommitFailed(err)
                })?;
                Ok(value)
            }
            Err(cause) => {
                tracing::debug!("Rolling back transaction: {}", cause);
                if let Err(rollback) = tx.rollback().await {
                    tracing::error!("Rollback failed after {}: {}", cause, rollback);
                    return Err(StoreError::RollbackFailed {
                        cause: Box::new(cause),
                        rollback,
                    });
                }
                Err(cause)
            }
        }
    }
}
