//! Transfer data models and API request types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Represents a transfer record from the database.
///
/// # Database Table
///
/// Maps to the `transfers` table. A transfer records the intent to move
/// `amount` from one account to another and is always written together with
/// the two entries that realize it.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow, Serialize)]
pub struct Transfer {
    pub id: i64,
    pub from_account_id: i64,
    pub to_account_id: i64,

    /// Amount moved, in minor currency units
    ///
    /// Must be positive (enforced by CHECK constraint)
    pub amount: i64,

    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy)]
pub struct CreateTransferParams {
    pub from_account_id: i64,
    pub to_account_id: i64,
    pub amount: i64,
}

/// Filter for transfers touching either account.
#[derive(Debug, Clone, Copy)]
pub struct ListTransfersParams {
    pub from_account_id: i64,
    pub to_account_id: i64,
    pub limit: i64,
    pub offset: i64,
}

/// Request to transfer money between accounts.
///
/// # JSON Example
///
/// ```json
/// {
///   "from_account_id": 1,
///   "to_account_id": 2,
///   "amount": 2500,
///   "currency": "USD"
/// }
/// ```
///
/// # Validation
///
/// - Both accounts must exist and hold `currency`
/// - Amount must be positive
/// - Accounts must be different
#[derive(Debug, Deserialize)]
pub struct TransferRequest {
    /// Account to transfer from (will decrease)
    pub from_account_id: i64,

    /// Account to transfer to (will increase)
    pub to_account_id: i64,

    /// Amount to transfer in minor units
    pub amount: i64,

    /// Currency both accounts are expected to hold
    pub currency: String,
}
