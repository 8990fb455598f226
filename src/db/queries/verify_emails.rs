use std::ops::DerefMut;

use sqlx::PgConnection;

use super::Queries;
use crate::db::StoreError;
use crate::models::verify_email::{CreateVerifyEmailParams, VerifyEmail};

impl<C> Queries<C>
where
    C: DerefMut<Target = PgConnection> + Send,
{
    pub async fn create_verify_email(
        &mut self,
        params: &CreateVerifyEmailParams,
    ) -> Result<VerifyEmail, StoreError> {
        let verify_email = sqlx::query_as::<_, VerifyEmail>(
            r#"
            INSERT INTO verify_emails (username, email, secret_code)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(&params.username)
        .bind(&params.email)
        .bind(&params.secret_code)
        .fetch_one(&mut *self.conn)
        .await?;

        Ok(verify_email)
    }

    /// Read a verification record and lock it until the transaction ends,
    /// so two concurrent verifications of the same code cannot both succeed.
    pub async fn get_verify_email_for_update(
        &mut self,
        id: i64,
    ) -> Result<VerifyEmail, StoreError> {
        let verify_email =
            sqlx::query_as::<_, VerifyEmail>("SELECT * FROM verify_emails WHERE id = $1 FOR UPDATE")
                .bind(id)
                .fetch_one(&mut *self.conn)
                .await?;

        Ok(verify_email)
    }

    pub async fn mark_verify_email_used(&mut self, id: i64) -> Result<VerifyEmail, StoreError> {
        let verify_email = sqlx::query_as::<_, VerifyEmail>(
            r#"
            UPDATE verify_emails
            SET is_used = true
            WHERE id = $1 AND is_used = false
            RETURNING *
            "#,
        )
        .bind(id)
        .fetch_one(&mut *self.conn)
        .await?;

        Ok(verify_email)
    }
}
