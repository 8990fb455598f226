//! Bank Ledger - Main Application Entry Point
//!
//! # Startup Flow
//!
//! 1. Load configuration from environment variables
//! 2. Create database connection pool and run migrations
//! 3. Construct the store, the task queue and the task processor
//! 4. Build HTTP router and start server on configured port
//! 5. On Ctrl-C: stop accepting requests, drain the task queue, close the pool

use std::sync::Arc;

use bank_ledger::{
    app::{self, AppState},
    config::Config,
    db::{self, Store},
    mail::{EmailSender, LogSender, RelaySender},
    worker::{TaskDistributor, TaskProcessor},
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging with tracing subscriber. Reads RUST_LOG environment variable (defaults to "info" level)
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = Config::from_env()?;
    tracing::info!("Configuration loaded");

    let pool = db::create_pool(&config.database_url, config.max_connections).await?;
    tracing::info!("Database pool created");

    db::run_migrations(&pool).await?;
    tracing::info!("Database migrations complete");

    let store = Store::new(pool, config.tx_timeout());

    let mailer: Arc<dyn EmailSender> = match (&config.mail_relay_url, &config.mail_relay_secret) {
        (Some(url), Some(secret)) => {
            tracing::info!("Mail relay enabled at {}", url);
            Arc::new(RelaySender::new(url.clone(), secret.clone())?)
        }
        _ => Arc::new(LogSender),
    };

    let (distributor, receiver) = TaskDistributor::channel(config.task_queue_capacity);
    let processor = TaskProcessor::new(
        store.clone(),
        mailer,
        config.verify_email_base_url.clone(),
        config.task_delay(),
    )
    .start(receiver);

    let app = app::router(AppState {
        store: store.clone(),
        distributor,
    });

    let addr = format!("0.0.0.0:{}", config.server_port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // The router (and its distributor) is gone, so the processor loop ends
    // once the queued tasks are handed off.
    if let Err(e) = processor.await {
        tracing::error!("Task processor panicked: {}", e);
    }
    store.close().await;
    tracing::info!("Shutdown complete");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
