//! Liveness probe.

use crate::{app::AppState, db::StoreError, error::AppError};
use axum::{Json, extract::State};
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub database: &'static str,
    pub checked_at: DateTime<Utc>,
}

/// `GET /health`
///
/// Checks a connection out of the store's pool and round-trips `SELECT 1`
/// on it. A pool timeout or a failed statement is reported through the
/// usual [`AppError`] mapping, so an unreachable database answers 500.
pub async fn health_check(State(state): State<AppState>) -> Result<Json<HealthResponse>, AppError> {
    let mut q = state.store.queries().await?;
    sqlx::query("SELECT 1")
        .execute(q.conn())
        .await
        .map_err(StoreError::from)?;

    Ok(Json(HealthResponse {
        status: "ok",
        database: "reachable",
        checked_at: Utc::now(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn response_shape() {
        let body = serde_json::to_value(HealthResponse {
            status: "ok",
            database: "reachable",
            checked_at: Utc::now(),
        })
        .unwrap();

        assert_eq!(body["status"], "ok");
        assert_eq!(body["database"], "reachable");
        assert!(body["checked_at"].is_string());
    }
}
