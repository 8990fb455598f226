use std::ops::DerefMut;

use sqlx::PgConnection;

use super::Queries;
use crate::db::StoreError;
use crate::models::entry::{CreateEntryParams, Entry, ListEntriesParams};

impl<C> Queries<C>
where
    C: DerefMut<Target = PgConnection> + Send,
{
    pub async fn create_entry(&mut self, params: CreateEntryParams) -> Result<Entry, StoreError> {
        let entry = sqlx::query_as::<_, Entry>(
            r#"
            INSERT INTO entries (account_id, amount)
            VALUES ($1, $2)
            RETURNING id, account_id, amount, created_at
            "#,
        )
        .bind(params.account_id)
        .bind(params.amount)
        .fetch_one(&mut *self.conn)
        .await?;

        Ok(entry)
    }

    pub async fn get_entry(&mut self, id: i64) -> Result<Entry, StoreError> {
        let entry = sqlx::query_as::<_, Entry>(
            "SELECT id, account_id, amount, created_at FROM entries WHERE id = $1",
        )
        .bind(id)
        .fetch_one(&mut *self.conn)
        .await?;

        Ok(entry)
    }

    pub async fn list_entries(
        &mut self,
        params: ListEntriesParams,
    ) -> Result<Vec<Entry>, StoreError> {
        let entries = sqlx::query_as::<_, Entry>(
            r#"
            SELECT id, account_id, amount, created_at
            FROM entries
            WHERE account_id = $1
            ORDER BY id
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(params.account_id)
        .bind(params.limit)
        .bind(params.offset)
        .fetch_all(&mut *self.conn)
        .await?;

        Ok(entries)
    }

    /// Net of all ledger lines recorded against an account.
    ///
    /// `balance - sum_entries` is the account's opening balance, for any
    /// account whose balance was only moved by transfers.
    pub async fn sum_entries(&mut self, account_id: i64) -> Result<i64, StoreError> {
        let sum: i64 = sqlx::query_scalar(
            "SELECT COALESCE(SUM(amount), 0)::BIGINT FROM entries WHERE account_id = $1",
        )
        .bind(account_id)
        .fetch_one(&mut *self.conn)
        .await?;

        Ok(sum)
    }
}
