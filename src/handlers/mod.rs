//! HTTP request handlers (route handlers).
//!
//! Each handler is an async function that:
//! 1. Receives HTTP request data (JSON body, URL params, etc.)
//! 2. Validates it and calls the store or a transaction script
//! 3. Returns HTTP response (JSON, status code)

/// Account management endpoints
pub mod accounts;
pub mod health;
/// Funds transfer endpoint
pub mod transfers;
/// Registration and email verification endpoints
pub mod users;
