use std::ops::DerefMut;

use sqlx::PgConnection;

use super::Queries;
use crate::db::StoreError;
use crate::models::account::{
    Account, AddAccountBalanceParams, CreateAccountParams, ListAccountsParams, UpdateAccountParams,
};

impl<C> Queries<C>
where
    C: DerefMut<Target = PgConnection> + Send,
{
    pub async fn create_account(
        &mut self,
        params: &CreateAccountParams,
    ) -> Result<Account, StoreError> {
        let account = sqlx::query_as::<_, Account>(
            r#"
            INSERT INTO accounts (owner, balance, currency)
            VALUES ($1, $2, $3)
            RETURNING id, owner, balance, currency, created_at
            "#,
        )
        .bind(&params.owner)
        .bind(params.balance)
        .bind(&params.currency)
        .fetch_one(&mut *self.conn)
        .await?;

        Ok(account)
    }

    pub async fn get_account(&mut self, id: i64) -> Result<Account, StoreError> {
        let account = sqlx::query_as::<_, Account>(
            "SELECT id, owner, balance, currency, created_at FROM accounts WHERE id = $1",
        )
        .bind(id)
        .fetch_one(&mut *self.conn)
        .await?;

        Ok(account)
    }

    /// Read an account and hold its row lock until the transaction ends.
    ///
    /// `FOR NO KEY UPDATE` does not conflict with the `KEY SHARE` locks taken
    /// by foreign-key checks on `entries` and `transfers` inserts.
    pub async fn get_account_for_update(&mut self, id: i64) -> Result<Account, StoreError> {
        let account = sqlx::query_as::<_, Account>(
            r#"
            SELECT id, owner, balance, currency, created_at
            FROM accounts
            WHERE id = $1
            FOR NO KEY UPDATE
            "#,
        )
        .bind(id)
        .fetch_one(&mut *self.conn)
        .await?;

        Ok(account)
    }

    pub async fn list_accounts(
        &mut self,
        params: &ListAccountsParams,
    ) -> Result<Vec<Account>, StoreError> {
        let accounts = sqlx::query_as::<_, Account>(
            r#"
            SELECT id, owner, balance, currency, created_at
            FROM accounts
            WHERE owner = $1
            ORDER BY id
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(&params.owner)
        .bind(params.limit)
        .bind(params.offset)
        .fetch_all(&mut *self.conn)
        .await?;

        Ok(accounts)
    }

    pub async fn update_account(
        &mut self,
        params: UpdateAccountParams,
    ) -> Result<Account, StoreError> {
        let account = sqlx::query_as::<_, Account>(
            r#"
            UPDATE accounts
            SET balance = $2
            WHERE id = $1
            RETURNING id, owner, balance, currency, created_at
            "#,
        )
        .bind(params.id)
        .bind(params.balance)
        .fetch_one(&mut *self.conn)
        .await?;

        Ok(account)
    }

    /// Apply a signed delta to the balance in place and return the new row.
    ///
    /// A single `balance = balance + $delta` statement, so concurrent
    /// increments on the same row serialize on its lock and none is lost.
    pub async fn add_account_balance(
        &mut self,
        params: AddAccountBalanceParams,
    ) -> Result<Account, StoreError> {
        let account = sqlx::query_as::<_, Account>(
            r#"
            UPDATE accounts
            SET balance = balance + $2
            WHERE id = $1
            RETURNING id, owner, balance, currency, created_at
            "#,
        )
        .bind(params.id)
        .bind(params.amount)
        .fetch_one(&mut *self.conn)
        .await?;

        Ok(account)
    }

    pub async fn delete_account(&mut self, id: i64) -> Result<(), StoreError> {
        let deleted = sqlx::query("DELETE FROM accounts WHERE id = $1")
            .bind(id)
            .execute(&mut *self.conn)
            .await?
            .rows_affected();

        if deleted == 0 {
            return Err(StoreError::NotFound);
        }

        Ok(())
    }
}
