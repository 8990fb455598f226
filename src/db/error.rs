//! Storage error taxonomy and the driver error classifier.
//!
//! Every `sqlx::Error` produced by the querier or the store passes through
//! [`classify`], the only place that inspects PostgreSQL SQLSTATE codes.

/// `unique_violation`
const UNIQUE_VIOLATION: &str = "23505";
/// `foreign_key_violation`
const FOREIGN_KEY_VIOLATION: &str = "23503";
/// `check_violation`
const CHECK_VIOLATION: &str = "23514";
/// `query_canceled`, raised when `statement_timeout` fires
const QUERY_CANCELED: &str = "57014";

/// Name of the `accounts` CHECK constraint that keeps balances non-negative.
pub const BALANCE_CHECK_CONSTRAINT: &str = "accounts_balance_non_negative";

/// Errors returned by the querier and the transaction scripts.
///
/// The store never retries. Callers decide whether a failure is worth
/// retrying (for example a serialization failure surfaced as
/// `StorageFailure`).
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A unique constraint rejected the write (username, email, owner+currency).
    #[error("duplicate identity")]
    DuplicateIdentity,

    /// No row matched, or a referenced row does not exist.
    #[error("record not found")]
    NotFound,

    /// Verification secret did not match, or the record was used or expired.
    #[error("invalid secret code")]
    InvalidSecret,

    /// The debit would take the source balance below zero.
    #[error("insufficient funds")]
    InsufficientFunds,

    /// Transfer parameters rejected before any statement ran.
    #[error("invalid transfer: {0}")]
    InvalidTransfer(&'static str),

    /// The post-create side effect refused the new user.
    #[error("after-create hook failed: {0}")]
    AfterCreate(#[source] anyhow::Error),

    /// Unclassified driver or database error.
    #[error("storage failure: {0}")]
    StorageFailure(#[source] sqlx::Error),

    /// COMMIT failed. The writes may or may not have been persisted.
    #[error("commit failed, outcome indeterminate: {0}")]
    CommitFailed(#[source] sqlx::Error),

    /// The transaction deadline elapsed or the statement was canceled.
    #[error("operation canceled")]
    CanceledOperation,

    /// ROLLBACK failed while unwinding `cause`.
    #[error("tx error: {cause}, rollback error: {rollback}")]
    RollbackFailed {
        cause: Box<StoreError>,
        #[source]
        rollback: sqlx::Error,
    },
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        classify(err)
    }
}

/// Map a driver error onto the closed [`StoreError`] taxonomy.
pub fn classify(err: sqlx::Error) -> StoreError {
    match &err {
        sqlx::Error::RowNotFound => return StoreError::NotFound,
        sqlx::Error::Database(db_err) => {
            let code = db_err.code();
            if let Some(kind) = classify_sqlstate(code.as_deref(), db_err.constraint()) {
                return kind;
            }
        }
        _ => {}
    }
    StoreError::StorageFailure(err)
}

/// Classify a SQLSTATE code (and the violated constraint, if any).
///
/// Returns `None` for codes that have no dedicated kind.
fn classify_sqlstate(code: Option<&str>, constraint: Option<&str>) -> Option<StoreError> {
    match code? {
        UNIQUE_VIOLATION => Some(StoreError::DuplicateIdentity),
        FOREIGN_KEY_VIOLATION => Some(StoreError::NotFound),
        CHECK_VIOLATION if constraint == Some(BALANCE_CHECK_CONSTRAINT) => {
            Some(StoreError::InsufficientFunds)
        }
        QUERY_CANCELED => Some(StoreError::CanceledOperation),
        _ => None,
    }
}
