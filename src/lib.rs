//! Bank Ledger - transactional ledger core with a thin HTTP surface.
//!
//! The core is [`db::Store`]: an explicitly constructed handle on a
//! PostgreSQL pool that runs multi-statement operations atomically:
//!
//! - [`db::Store::transfer_tx`]: move funds between two accounts
//! - [`db::Store::create_user_tx`]: register a user together with a post-create side effect
//! - [`db::Store::verify_email_tx`]: consume a verification code and mark the email verified
//!
//! # Architecture
//!
//! - **Web Framework**: Axum (async HTTP server)
//! - **Database**: PostgreSQL with sqlx (async queries, embedded migrations)
//! - **Background work**: in-process task queue feeding a tokio task processor
//! - **Format**: JSON requests/responses

pub mod app;
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod mail;
pub mod models;
pub mod password;
pub mod services;
pub mod validator;
pub mod worker;
