//! User data models and API request/response types.
//!
//! The username is the stable identity key: accounts, sessions and
//! verification records all reference it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Represents a user record from the database.
///
/// # Database Table
///
/// Maps to the `users` table. `username` is the primary key and `email` is
/// unique; inserting a duplicate of either fails with
/// [`StoreError::DuplicateIdentity`](crate::db::StoreError::DuplicateIdentity).
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct User {
    pub username: String,

    /// Salted password digest, see [`crate::password`]
    pub hashed_password: String,

    pub full_name: String,
    pub email: String,

    /// `0001-01-01T00:00:00Z` until the password is first changed
    pub password_changed_at: DateTime<Utc>,

    /// Flipped to true by the email verification script
    pub is_email_verified: bool,

    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct CreateUserParams {
    pub username: String,
    pub hashed_password: String,
    pub full_name: String,
    pub email: String,
}

/// Partial update of a user row. `None` fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct UpdateUserParams {
    pub username: String,
    pub hashed_password: Option<String>,
    pub password_changed_at: Option<DateTime<Utc>>,
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub is_email_verified: Option<bool>,
}

/// Request body for registering a user.
///
/// # JSON Example
///
/// ```json
/// {
///   "username": "alice",
///   "password": "secret-password",
///   "full_name": "Alice Liddell",
///   "email": "alice@example.com"
/// }
/// ```
#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub username: String,
    pub password: String,
    pub full_name: String,
    pub email: String,
}

/// Response body for user endpoints.
///
/// This struct is returned to API clients.
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub username: String,
    pub full_name: String,
    pub email: String,
    pub is_email_verified: bool,
    pub password_changed_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

/// Convert database User to API UserResponse.
///
/// This transformation removes the `hashed_password` field
impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            username: user.username,
            full_name: user.full_name,
            email: user.email,
            is_email_verified: user.is_email_verified,
            password_changed_at: user.password_changed_at,
            created_at: user.created_at,
        }
    }
}
