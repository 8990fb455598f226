use std::ops::DerefMut;

use sqlx::PgConnection;
use uuid::Uuid;

use super::Queries;
use crate::db::StoreError;
use crate::models::session::{CreateSessionParams, Session};

impl<C> Queries<C>
where
    C: DerefMut<Target = PgConnection> + Send,
{
    pub async fn create_session(
        &mut self,
        params: &CreateSessionParams,
    ) -> Result<Session, StoreError> {
        let session = sqlx::query_as::<_, Session>(
            r#"
            INSERT INTO sessions (
                id,
                username,
                refresh_token,
                user_agent,
                client_ip,
                is_blocked,
                expires_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(params.id)
        .bind(&params.username)
        .bind(&params.refresh_token)
        .bind(&params.user_agent)
        .bind(&params.client_ip)
        .bind(params.is_blocked)
        .bind(params.expires_at)
        .fetch_one(&mut *self.conn)
        .await?;

        Ok(session)
    }

    pub async fn get_session(&mut self, id: Uuid) -> Result<Session, StoreError> {
        let session = sqlx::query_as::<_, Session>("SELECT * FROM sessions WHERE id = $1")
            .bind(id)
            .fetch_one(&mut *self.conn)
            .await?;

        Ok(session)
    }
}
