//! Email verification records.
//!
//! A record is created by the task processor after a user registers, mailed
//! to the user as a link, and consumed exactly once by the email
//! verification script.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use subtle::ConstantTimeEq;

/// Length of the generated secret code.
pub const SECRET_CODE_LENGTH: usize = 32;

/// Represents a verification record from the database.
///
/// # Database Table
///
/// Maps to the `verify_emails` table. `expired_at` defaults to fifteen
/// minutes after creation.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow, Serialize)]
pub struct VerifyEmail {
    pub id: i64,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub secret_code: String,
    pub is_used: bool,
    pub created_at: DateTime<Utc>,
    pub expired_at: DateTime<Utc>,
}

impl VerifyEmail {
    /// Whether `secret_code` may consume this record at `now`.
    ///
    /// The record must be unused and unexpired, and the code must match
    /// exactly. The code comparison runs in constant time.
    pub fn accepts(&self, secret_code: &str, now: DateTime<Utc>) -> bool {
        let matches: bool = self
            .secret_code
            .as_bytes()
            .ct_eq(secret_code.as_bytes())
            .into();
        matches && !self.is_used && now < self.expired_at
    }
}

#[derive(Debug, Clone)]
pub struct CreateVerifyEmailParams {
    pub username: String,
    pub email: String,
    pub secret_code: String,
}

/// Query string of the verification link.
///
/// `GET /api/v1/verify_email?email_id=7&secret_code=...`
#[derive(Debug, Deserialize)]
pub struct VerifyEmailQuery {
    pub email_id: i64,
    pub secret_code: String,
}

#[derive(Debug, Serialize)]
pub struct VerifyEmailResponse {
    pub is_verified: bool,
}
