//! Email verification script.

use chrono::Utc;
use serde::Deserialize;

use crate::db::{Store, StoreError};
use crate::models::user::{UpdateUserParams, User};
use crate::models::verify_email::VerifyEmail;

#[derive(Debug, Clone, Deserialize)]
pub struct VerifyEmailTxParams {
    pub email_id: i64,
    pub secret_code: String,
}

#[derive(Debug, Clone)]
pub struct VerifyEmailTxResult {
    pub user: User,
    pub verify_email: VerifyEmail,
}

impl Store {
    /// Consume a verification record and mark its user's email as verified.
    ///
    /// The record row is locked first, so concurrent attempts with the same
    /// code serialize and only the first can consume it.
    ///
    /// # Errors
    ///
    /// - `NotFound`: no record with this ID
    /// - `InvalidSecret`: wrong code, or the record is used or expired
    ///
    /// Nothing is written on error.
    pub async fn verify_email_tx(
        &self,
        params: VerifyEmailTxParams,
    ) -> Result<VerifyEmailTxResult, StoreError> {
        let result = self
            .run_atomic(move |q| {
                Box::pin(async move {
                    let record = q.get_verify_email_for_update(params.email_id).await?;
                    if !record.accepts(&params.secret_code, Utc::now()) {
                        return Err(StoreError::InvalidSecret);
                    }

                    let verify_email = q.mark_verify_email_used(record.id).await?;
                    let user = q
                        .update_user(&UpdateUserParams {
                            username: verify_email.username.clone(),
                            is_email_verified: Some(true),
                            ..Default::default()
                        })
                        .await?;

                    Ok(VerifyEmailTxResult { user, verify_email })
                })
            })
            .await?;

        tracing::info!(
            username = %result.user.username,
            email_id = result.verify_email.id,
            "Email verified"
        );

        Ok(result)
    }
}
