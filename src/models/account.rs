//! Account data models and API request types.
//!
//! This module defines:
//! - `Account`: Database entity representing an account
//! - Querier parameter structs for the `accounts` table
//! - `CreateAccountRequest` / `ListAccountsQuery`: HTTP request bodies

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Currencies an account may be opened in.
pub const SUPPORTED_CURRENCIES: [&str; 3] = ["USD", "EUR", "CAD"];

/// Returns true if `currency` is one of [`SUPPORTED_CURRENCIES`].
pub fn is_supported_currency(currency: &str) -> bool {
    SUPPORTED_CURRENCIES.contains(&currency)
}

/// Represents an account record from the database.
///
/// # Database Table
///
/// Maps to the `accounts` table. Each account:
/// - Belongs to one user (via `owner`, the user's username)
/// - Holds at most one account per currency for a given owner
/// - Has a balance stored in minor currency units
///
/// # Balance Mutation
///
/// The balance only changes through `add_account_balance`, an in-place
/// `balance = balance + delta` statement issued by the transfer script.
/// The table carries a `balance >= 0` CHECK constraint.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow, Serialize)]
pub struct Account {
    /// Unique, monotonically assigned identifier
    ///
    /// Transfers lock account rows in ascending order of this value.
    pub id: i64,

    /// Username of the owning user
    pub owner: String,

    /// Current balance in minor currency units (cents)
    pub balance: i64,

    /// Currency code (ISO 4217, 3 letters)
    pub currency: String,

    /// Timestamp when account was created
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct CreateAccountParams {
    pub owner: String,
    pub balance: i64,
    pub currency: String,
}

#[derive(Debug, Clone)]
pub struct ListAccountsParams {
    pub owner: String,
    pub limit: i64,
    pub offset: i64,
}

/// Overwrites the stored balance. Administrative use only.
#[derive(Debug, Clone, Copy)]
pub struct UpdateAccountParams {
    pub id: i64,
    pub balance: i64,
}

/// Signed delta applied in place to one account's balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AddAccountBalanceParams {
    pub id: i64,
    pub amount: i64,
}

/// Request body for creating a new account.
///
/// # JSON Example
///
/// ```json
/// {
///   "owner": "alice",
///   "currency": "USD",
///   "initial_balance": 10000
/// }
/// ```
#[derive(Debug, Deserialize)]
pub struct CreateAccountRequest {
    /// Username of the owner, must already exist
    pub owner: String,

    /// Currency code, one of [`SUPPORTED_CURRENCIES`]
    pub currency: String,

    /// Opening balance in minor units (defaults to 0 if not provided)
    #[serde(default)]
    pub initial_balance: i64,
}

/// Query string for listing a user's accounts.
///
/// `GET /api/v1/accounts?owner=alice&page_id=1&page_size=5`
#[derive(Debug, Deserialize)]
pub struct ListAccountsQuery {
    pub owner: String,
    pub page_id: i64,
    pub page_size: i64,
}

impl ListAccountsQuery {
    /// Convert the page-based query into limit/offset parameters.
    ///
    /// Fails when the offset does not fit in an `i64`.
    pub fn into_params(self) -> Result<ListAccountsParams, String> {
        let offset = self
            .page_id
            .checked_sub(1)
            .and_then(|skipped| skipped.checked_mul(self.page_size))
            .ok_or_else(|| format!("page_id {} is out of range", self.page_id))?;

        Ok(ListAccountsParams {
            offset,
            limit: self.page_size,
            owner: self.owner,
        })
    }
}
