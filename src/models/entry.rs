//! Ledger entry model.
//!
//! Entries are append-only: every transfer writes exactly two of them, one
//! negative on the source account and one positive on the destination.
//! They are never updated or deleted.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// A signed balance delta recorded against one account.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow, Serialize)]
pub struct Entry {
    pub id: i64,
    pub account_id: i64,

    /// Negative for money leaving the account, positive for money arriving
    pub amount: i64,

    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy)]
pub struct CreateEntryParams {
    pub account_id: i64,
    pub amount: i64,
}

#[derive(Debug, Clone, Copy)]
pub struct ListEntriesParams {
    pub account_id: i64,
    pub limit: i64,
    pub offset: i64,
}
