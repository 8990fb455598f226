//! Transfer HTTP handler.

use crate::{
    app::AppState,
    error::AppError,
    models::transfer::TransferRequest,
    services::{TransferTxParams, TransferTxResult},
    validator,
};
use axum::{
    Json,
    extract::State,
    http::StatusCode,
};

/// Transfer money between accounts.
///
/// # Request Body
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
/// - Amount must be positive and the accounts different (400)
/// - Both accounts must exist (404) and hold `currency` (400)
/// - Source must have sufficient balance (422)
///
/// # Atomicity
///
/// The transfer, both entries and both balance updates are written in a
/// single database transaction by [`crate::db::Store::transfer_tx`].
pub async fn create_transfer(
    State(state): State<AppState>,
    Json(request): Json<TransferRequest>,
) -> Result<(StatusCode, Json<TransferTxResult>), AppError> {
    let params = TransferTxParams {
        from_account_id: request.from_account_id,
        to_account_id: request.to_account_id,
        amount: request.amount,
    };
    params.validate()?;
    validator::validate_currency(&request.currency).map_err(AppError::InvalidRequest)?;

    // Currency check happens outside the transfer transaction; currencies
    // never change after an account is opened.
    {
        let mut q = state.store.queries().await?;
        for account_id in [params.from_account_id, params.to_account_id] {
            let account = q.get_account(account_id).await?;
            if account.currency != request.currency {
                return Err(AppError::InvalidRequest(format!(
                    "account [{}] currency mismatch: {} vs {}",
                    account.id, account.currency, request.currency
                )));
            }
        }
    }

    let result = state.store.transfer_tx(params).await?;

    Ok((StatusCode::CREATED, Json(result)))
}
