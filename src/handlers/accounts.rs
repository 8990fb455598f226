//! Account management HTTP handlers.
//!
//! This module implements the account-related API endpoints:
//! - POST /api/v1/accounts - Create new account
//! - GET /api/v1/accounts/{id} - Get account by ID
//! - GET /api/v1/accounts?owner=&page_id=&page_size= - List a user's accounts

use crate::{
    app::AppState,
    error::AppError,
    models::account::{Account, CreateAccountParams, CreateAccountRequest, ListAccountsQuery},
    validator,
};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};

/// Create a new account.
///
/// # Response
///
/// - **Success (201 Created)**: Returns the created account
/// - **Error (400)**: Unsupported currency or negative opening balance
/// - **Error (404)**: Owner does not exist
/// - **Error (409)**: Owner already has an account in this currency
pub async fn create_account(
    State(state): State<AppState>,
    Json(request): Json<CreateAccountRequest>,
) -> Result<(StatusCode, Json<Account>), AppError> {
    validator::validate_currency(&request.currency).map_err(AppError::InvalidRequest)?;
    if request.initial_balance < 0 {
        return Err(AppError::InvalidRequest(
            "initial_balance must not be negative".to_string(),
        ));
    }

    let account = state
        .store
        .queries()
        .await?
        .create_account(&CreateAccountParams {
            owner: request.owner,
            balance: request.initial_balance,
            currency: request.currency,
        })
        .await?;

    tracing::info!(account_id = account.id, owner = %account.owner, "Account created");

    Ok((StatusCode::CREATED, Json(account)))
}

/// Get a specific account by ID.
///
/// Returns 404 if the account doesn't exist.
pub async fn get_account(
    State(state): State<AppState>,
    Path(account_id): Path<i64>,
) -> Result<Json<Account>, AppError> {
    let account = state
        .store
        .queries()
        .await?
        .get_account(account_id)
        .await?;

    Ok(Json(account))
}

/// List one page of a user's accounts, ordered by ID.
pub async fn list_accounts(
    State(state): State<AppState>,
    Query(query): Query<ListAccountsQuery>,
) -> Result<Json<Vec<Account>>, AppError> {
    validator::validate_page(query.page_id, query.page_size).map_err(AppError::InvalidRequest)?;
    let params = query.into_params().map_err(AppError::InvalidRequest)?;

    let accounts = state
        .store
        .queries()
        .await?
        .list_accounts(&params)
        .await?;

    Ok(Json(accounts))
}
