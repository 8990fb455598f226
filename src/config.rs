//! Application configuration management.
//!
//! This module handles loading configuration from environment variables.
//! It uses the `envy` crate to deserialize environment variables into a type-safe struct.

use std::time::Duration;

use serde::Deserialize;

/// Application configuration loaded from environment variables.
///
/// # Environment Variables
///
/// - `DATABASE_URL` (required): PostgreSQL connection string
/// - `SERVER_PORT` (optional): HTTP server port, defaults to 3000
/// - `MAX_CONNECTIONS` (optional): pool size, defaults to 5
/// - `TX_TIMEOUT_MS` (optional): deadline for one transaction script, defaults to 10000
/// - `TASK_QUEUE_CAPACITY` (optional): pending background tasks, defaults to 1024
/// - `TASK_DELAY_MS` (optional): wait before a task is processed, defaults to 1000
/// - `VERIFY_EMAIL_BASE_URL` (optional): link base mailed to new users
/// - `MAIL_RELAY_URL` / `MAIL_RELAY_SECRET` (optional): enable the HTTP mail relay
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub database_url: String,

    #[serde(default = "default_port")]
    pub server_port: u16,

    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    #[serde(default = "default_tx_timeout_ms")]
    pub tx_timeout_ms: u64,

    #[serde(default = "default_task_queue_capacity")]
    pub task_queue_capacity: usize,

    #[serde(default = "default_task_delay_ms")]
    pub task_delay_ms: u64,

    #[serde(default = "default_verify_email_base_url")]
    pub verify_email_base_url: String,

    pub mail_relay_url: Option<String>,

    pub mail_relay_secret: Option<String>,
}

fn default_port() -> u16 {
    3000
}

fn default_max_connections() -> u32 {
    5
}

fn default_tx_timeout_ms() -> u64 {
    10_000
}

fn default_task_queue_capacity() -> usize {
    1024
}

fn default_task_delay_ms() -> u64 {
    1000
}

fn default_verify_email_base_url() -> String {
    "http://localhost:3000/api/v1/verify_email".to_string()
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// This method first attempts to load a `.env` file (which is optional),
    /// then reads environment variables and deserializes them into a Config struct.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Required environment variables are missing (e.g., DATABASE_URL)
    /// - Environment variable values cannot be parsed into expected types
    pub fn from_env() -> Result<Self, envy::Error> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>()
    }

    pub fn tx_timeout(&self) -> Duration {
        Duration::from_millis(self.tx_timeout_ms)
    }

    pub fn task_delay(&self) -> Duration {
        Duration::from_millis(self.task_delay_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn from_pairs(pairs: &[(&str, &str)]) -> Result<Config, envy::Error> {
        envy::from_iter(
            pairs
                .iter()
                .map(|(key, value)| (key.to_string(), value.to_string())),
        )
    }

    #[test]
    fn applies_defaults() {
        let config = from_pairs(&[("database_url", "postgres://localhost/bank")]).unwrap();

        assert_eq!(config.server_port, 3000);
        assert_eq!(config.max_connections, 5);
        assert_eq!(config.tx_timeout(), Duration::from_secs(10));
        assert_eq!(config.task_queue_capacity, 1024);
        assert_eq!(config.task_delay(), Duration::from_secs(1));
        assert!(config.mail_relay_url.is_none());
    }

    #[test]
    fn reads_overrides() {
        let config = from_pairs(&[
            ("database_url", "postgres://localhost/bank"),
            ("server_port", "8080"),
            ("tx_timeout_ms", "250"),
            ("mail_relay_url", "https://mail.example.com/send"),
        ])
        .unwrap();

        assert_eq!(config.server_port, 8080);
        assert_eq!(config.tx_timeout(), Duration::from_millis(250));
        assert_eq!(
            config.mail_relay_url.as_deref(),
            Some("https://mail.example.com/send")
        );
    }

    #[test]
    fn requires_database_url() {
        assert!(from_pairs(&[("server_port", "8080")]).is_err());
    }
}
