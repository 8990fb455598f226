//! Registration and email verification HTTP handlers.
//!
//! - POST /api/v1/users - Register a user and schedule the verification mail
//! - GET /api/v1/verify_email?email_id=&secret_code= - Confirm an email address

use crate::{
    app::AppState,
    error::AppError,
    models::{
        user::{CreateUserParams, CreateUserRequest, UserResponse},
        verify_email::{VerifyEmailQuery, VerifyEmailResponse},
    },
    password,
    services::VerifyEmailTxParams,
    validator,
};
use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
};

/// Register a new user.
///
/// The user row and the enqueueing of the verification task share one
/// transaction: if the task queue refuses the task, no user is created.
///
/// # Response
///
/// - **Success (201 Created)**: Returns the user (without password digest)
/// - **Error (400)**: A field failed validation
/// - **Error (409)**: Username or email already taken
/// - **Error (503)**: Verification task could not be scheduled
pub async fn create_user(
    State(state): State<AppState>,
    Json(request): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<UserResponse>), AppError> {
    validator::validate_username(&request.username)
        .and_then(|_| validator::validate_password(&request.password))
        .and_then(|_| validator::validate_full_name(&request.full_name))
        .and_then(|_| validator::validate_email(&request.email))
        .map_err(AppError::InvalidRequest)?;

    // Argon2 is CPU-bound; keep it off the async workers
    let plain = request.password;
    let hashed_password = tokio::task::spawn_blocking(move || password::hash_password(&plain))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    let params = CreateUserParams {
        hashed_password,
        username: request.username,
        full_name: request.full_name,
        email: request.email,
    };

    let result = state
        .store
        .create_user_tx(params, state.distributor.clone())
        .await?;

    Ok((StatusCode::CREATED, Json(result.user.into())))
}

/// Confirm an email address with the code from the verification link.
pub async fn verify_email(
    State(state): State<AppState>,
    Query(query): Query<VerifyEmailQuery>,
) -> Result<Json<VerifyEmailResponse>, AppError> {
    validator::validate_email_id(query.email_id)
        .and_then(|_| validator::validate_secret_code(&query.secret_code))
        .map_err(AppError::InvalidRequest)?;

    let result = state
        .store
        .verify_email_tx(VerifyEmailTxParams {
            email_id: query.email_id,
            secret_code: query.secret_code,
        })
        .await?;

    Ok(Json(VerifyEmailResponse {
        is_verified: result.user.is_email_verified,
    }))
}
