//! Funds transfer script.
//!
//! # Process
//!
//! 1. Record the transfer
//! 2. Record the debit entry on the source account
//! 3. Record the credit entry on the destination account
//! 4. Apply both balance deltas with in-place increments
//!
//! # Lock Ordering
//!
//! Step 4 always updates the account with the smaller ID first, whatever the
//! transfer direction. Every transfer therefore acquires account row locks in
//! the same global order, and two transfers sharing accounts (including
//! A→B racing B→A) can block each other but never wait in a cycle.

use serde::{Deserialize, Serialize};

use crate::db::{Store, StoreError};
use crate::models::account::{Account, AddAccountBalanceParams};
use crate::models::entry::{CreateEntryParams, Entry};
use crate::models::transfer::{CreateTransferParams, Transfer};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct TransferTxParams {
    pub from_account_id: i64,
    pub to_account_id: i64,
    pub amount: i64,
}

impl TransferTxParams {
    /// Reject transfers that could never be valid.
    ///
    /// # Errors
    ///
    /// - `InvalidTransfer`: amount is zero or negative
    /// - `InvalidTransfer`: source and destination are the same account
    pub fn validate(&self) -> Result<(), StoreError> {
        if self.amount <= 0 {
            return Err(StoreError::InvalidTransfer("amount must be positive"));
        }
        if self.from_account_id == self.to_account_id {
            return Err(StoreError::InvalidTransfer(
                "cannot transfer to the same account",
            ));
        }
        Ok(())
    }
}

/// Everything written by one committed transfer.
#[derive(Debug, Clone, Serialize)]
pub struct TransferTxResult {
    pub transfer: Transfer,

    /// Source account after the debit
    pub from_account: Account,

    /// Destination account after the credit
    pub to_account: Account,

    /// Money moving out (negative amount)
    pub from_entry: Entry,

    /// Money moving in (positive amount)
    pub to_entry: Entry,
}

/// The two balance deltas of a transfer, in the order they must be applied.
///
/// Ascending by account ID, independent of direction.
pub fn lock_order(params: &TransferTxParams) -> [AddAccountBalanceParams; 2] {
    let debit = AddAccountBalanceParams {
        id: params.from_account_id,
        amount: -params.amount,
    };
    let credit = AddAccountBalanceParams {
        id: params.to_account_id,
        amount: params.amount,
    };

    if debit.id < credit.id {
        [debit, credit]
    } else {
        [credit, debit]
    }
}

impl Store {
    /// Move `amount` from one account to another.
    ///
    /// # Errors
    ///
    /// - `InvalidTransfer`: rejected by [`TransferTxParams::validate`], nothing was opened
    /// - `NotFound`: either account does not exist
    /// - `InsufficientFunds`: the debit would make the source balance negative
    /// - Any [`Store::run_atomic`] failure
    ///
    /// On any error no transfer, entry or balance change is persisted.
    pub async fn transfer_tx(
        &self,
        params: TransferTxParams,
    ) -> Result<TransferTxResult, StoreError> {
        params.validate()?;

        let result = self
            .run_atomic(move |q| {
                Box::pin(async move {
                    let transfer = q
                        .create_transfer(CreateTransferParams {
                            from_account_id: params.from_account_id,
                            to_account_id: params.to_account_id,
                            amount: params.amount,
                        })
                        .await?;

                    let from_entry = q
                        .create_entry(CreateEntryParams {
                            account_id: params.from_account_id,
                            amount: -params.amount,
                        })
                        .await?;

                    let to_entry = q
                        .create_entry(CreateEntryParams {
                            account_id: params.to_account_id,
                            amount: params.amount,
                        })
                        .await?;

                    let [first, second] = lock_order(&params);
                    let first = q.add_account_balance(first).await?;
                    let second = q.add_account_balance(second).await?;

                    let (from_account, to_account) = if first.id == params.from_account_id {
                        (first, second)
                    } else {
                        (second, first)
                    };

                    Ok(TransferTxResult {
                        transfer,
                        from_account,
                        to_account,
                        from_entry,
                        to_entry,
                    })
                })
            })
            .await?;

        tracing::info!(
            transfer_id = result.transfer.id,
            from_account_id = params.from_account_id,
            to_account_id = params.to_account_id,
            amount = params.amount,
            "Transfer committed"
        );

        Ok(result)
    }
}
