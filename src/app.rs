//! Router construction and shared handler state.

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use crate::{db::Store, handlers, worker::TaskDistributor};

/// State shared by every handler.
///
/// Both members are cheap handles onto shared resources (the pool and the
/// task queue), so cloning per request is fine.
#[derive(Debug, Clone)]
pub struct AppState {
    pub store: Store,
    pub distributor: TaskDistributor,
}

/// Build the HTTP router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health::health_check))
        // Users
        .route("/api/v1/users", post(handlers::users::create_user))
        .route("/api/v1/verify_email", get(handlers::users::verify_email))
        // Accounts
        .route("/api/v1/accounts", post(handlers::accounts::create_account))
        .route("/api/v1/accounts", get(handlers::accounts::list_accounts))
        .route(
            "/api/v1/accounts/{id}",
            get(handlers::accounts::get_account),
        )
        // Transfers
        .route(
            "/api/v1/transfers",
            post(handlers::transfers::create_transfer),
        )
        // Request tracing for observability
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
