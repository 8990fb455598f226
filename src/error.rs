//! HTTP error type and response mapping.
//!
//! This module defines the errors returned by the HTTP handlers and how they
//! are converted into HTTP responses with appropriate status codes and JSON bodies.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::db::StoreError;
use crate::password::HashError;

/// Error returned by HTTP handlers.
///
/// Storage errors pass through unchanged; mapping them to status codes
/// happens only here.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A store operation or transaction script failed.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Request body or parameters are invalid.
    ///
    /// The String contains details about what was invalid.
    #[error("Invalid request")]
    InvalidRequest(String),

    /// The password digest could not be computed.
    #[error(transparent)]
    Password(#[from] HashError),

    /// A blocking helper task died before returning.
    #[error("internal error: {0}")]
    Internal(String),
}

/// Convert AppError into an HTTP response.
///
/// # Response Format
///
/// All errors return JSON in this format:
/// ```json
/// {
///   "error": {
///     "code": "error_type",
///     "message": "Human-readable error message"
///   }
/// }
/// ```
///
/// # Status Code Mapping
///
/// - `InvalidRequest`, `InvalidTransfer` → 400 Bad Request
/// - `InvalidSecret` → 403 Forbidden
/// - `NotFound` → 404 Not Found
/// - `DuplicateIdentity` → 409 Conflict
/// - `InsufficientFunds` → 422 Unprocessable Entity
/// - `AfterCreate` → 503 Service Unavailable
/// - `CanceledOperation` → 504 Gateway Timeout
/// - everything else → 500 Internal Server Error (details are logged, not returned)
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            AppError::InvalidRequest(msg) => (StatusCode::BAD_REQUEST, "invalid_request", msg),
            err @ (AppError::Password(_) | AppError::Internal(_)) => {
                tracing::error!("{}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An internal error occurred".to_string(),
                )
            }
            AppError::Store(err) => match err {
                StoreError::InvalidTransfer(reason) => (
                    StatusCode::BAD_REQUEST,
                    "invalid_transfer",
                    reason.to_string(),
                ),
                StoreError::InvalidSecret => {
                    (StatusCode::FORBIDDEN, "invalid_secret", err.to_string())
                }
                StoreError::NotFound => (StatusCode::NOT_FOUND, "not_found", err.to_string()),
                StoreError::DuplicateIdentity => {
                    (StatusCode::CONFLICT, "duplicate_identity", err.to_string())
                }
                StoreError::InsufficientFunds => (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    "insufficient_funds",
                    err.to_string(),
                ),
                StoreError::AfterCreate(_) => {
                    tracing::warn!("Registration rolled back: {}", err);
                    (
                        StatusCode::SERVICE_UNAVAILABLE,
                        "registration_unavailable",
                        "Registration could not be scheduled, try again later".to_string(),
                    )
                }
                StoreError::CanceledOperation => (
                    StatusCode::GATEWAY_TIMEOUT,
                    "canceled",
                    err.to_string(),
                ),
                StoreError::CommitFailed(_) => {
                    tracing::error!("{}", err);
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "outcome_unknown",
                        "The operation may or may not have been applied".to_string(),
                    )
                }
                StoreError::StorageFailure(_) | StoreError::RollbackFailed { .. } => {
                    tracing::error!("{}", err);
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "internal_error",
                        "An internal error occurred".to_string(),
                    )
                }
            },
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(AppError::InvalidRequest("bad".into()), StatusCode::BAD_REQUEST)]
    #[case(StoreError::InvalidTransfer("same account").into(), StatusCode::BAD_REQUEST)]
    #[case(StoreError::InvalidSecret.into(), StatusCode::FORBIDDEN)]
    #[case(StoreError::NotFound.into(), StatusCode::NOT_FOUND)]
    #[case(StoreError::DuplicateIdentity.into(), StatusCode::CONFLICT)]
    #[case(StoreError::InsufficientFunds.into(), StatusCode::UNPROCESSABLE_ENTITY)]
    #[case(StoreError::AfterCreate(anyhow::anyhow!("queue full")).into(), StatusCode::SERVICE_UNAVAILABLE)]
    #[case(StoreError::CanceledOperation.into(), StatusCode::GATEWAY_TIMEOUT)]
    #[case(StoreError::CommitFailed(sqlx::Error::PoolClosed).into(), StatusCode::INTERNAL_SERVER_ERROR)]
    #[case(StoreError::StorageFailure(sqlx::Error::PoolTimedOut).into(), StatusCode::INTERNAL_SERVER_ERROR)]
    #[case(AppError::Internal("task panicked".into()), StatusCode::INTERNAL_SERVER_ERROR)]
    fn maps_status(#[case] error: AppError, #[case] expected: StatusCode) {
        assert_eq!(error.into_response().status(), expected);
    }
}
