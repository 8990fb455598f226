use std::ops::DerefMut;

use sqlx::PgConnection;

use super::Queries;
use crate::db::StoreError;
use crate::models::user::{CreateUserParams, UpdateUserParams, User};

const USER_COLUMNS: &str =
    "username, hashed_password, full_name, email, password_changed_at, is_email_verified, created_at";

impl<C> Queries<C>
where
    C: DerefMut<Target = PgConnection> + Send,
{
    pub async fn create_user(&mut self, params: &CreateUserParams) -> Result<User, StoreError> {
        let sql = format!(
            r#"
            INSERT INTO users (username, hashed_password, full_name, email)
            VALUES ($1, $2, $3, $4)
            RETURNING {USER_COLUMNS}
            "#
        );
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(&params.username)
            .bind(&params.hashed_password)
            .bind(&params.full_name)
            .bind(&params.email)
            .fetch_one(&mut *self.conn)
            .await?;

        Ok(user)
    }

    pub async fn get_user(&mut self, username: &str) -> Result<User, StoreError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE username = $1");
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(username)
            .fetch_one(&mut *self.conn)
            .await?;

        Ok(user)
    }

    /// Update the fields set in `params`, leaving the others untouched.
    pub async fn update_user(&mut self, params: &UpdateUserParams) -> Result<User, StoreError> {
        let sql = format!(
            r#"
            UPDATE users
            SET hashed_password = COALESCE($2, hashed_password),
                password_changed_at = COALESCE($3, password_changed_at),
                full_name = COALESCE($4, full_name),
                email = COALESCE($5, email),
                is_email_verified = COALESCE($6, is_email_verified)
            WHERE username = $1
            RETURNING {USER_COLUMNS}
            "#
        );
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(&params.username)
            .bind(&params.hashed_password)
            .bind(params.password_changed_at)
            .bind(&params.full_name)
            .bind(&params.email)
            .bind(params.is_email_verified)
            .fetch_one(&mut *self.conn)
            .await?;

        Ok(user)
    }
}
