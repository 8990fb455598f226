//! User registration script.
//!
//! A user row is only durable if its post-create side effect was accepted:
//! the side effect runs while the insert's transaction is still open, and
//! its failure rolls the insert back.

use std::sync::Arc;

use async_trait::async_trait;

use crate::db::{Store, StoreError};
use crate::models::user::{CreateUserParams, User};

/// Side effect scheduled for a freshly inserted user.
///
/// Implementations should only *accept* the work (enqueue it, hand it to a
/// scheduler) and return. The actual work runs after the transaction, so it
/// may observe the user only once the registration has committed.
#[async_trait]
pub trait AfterCreateUser: Send + Sync {
    /// Returning an error rolls back the user insert.
    async fn after_create(&self, user: &User) -> anyhow::Result<()>;
}

#[async_trait]
impl<T> AfterCreateUser for Arc<T>
where
    T: AfterCreateUser + ?Sized,
{
    async fn after_create(&self, user: &User) -> anyhow::Result<()> {
        (**self).after_create(user).await
    }
}

#[derive(Debug, Clone)]
pub struct CreateUserTxResult {
    pub user: User,
}

impl Store {
    /// Insert a user and run `after_create` inside the same transaction.
    ///
    /// # Errors
    ///
    /// - `DuplicateIdentity`: username or email already taken
    /// - `AfterCreate`: the side effect refused; the insert was rolled back
    /// - Any [`Store::run_atomic`] failure
    pub async fn create_user_tx<A>(
        &self,
        params: CreateUserParams,
        after_create: A,
    ) -> Result<CreateUserTxResult, StoreError>
    where
        A: AfterCreateUser + 'static,
    {
        let result = self
            .run_atomic(move |q| {
                Box::pin(async move {
                    let user = q.create_user(&params).await?;

                    after_create
                        .after_create(&user)
                        .await
                        .map_err(StoreError::AfterCreate)?;

                    Ok(CreateUserTxResult { user })
                })
            })
            .await?;

        tracing::info!(username = %result.user.username, "User registered");

        Ok(result)
    }
}
