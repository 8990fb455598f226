//! Outbound mail boundary.
//!
//! Mail delivery belongs to an external relay. This module defines the
//! [`EmailSender`] seam plus two senders:
//!
//! - [`LogSender`]: writes the message to the log (development default)
//! - [`RelaySender`]: POSTs the message as JSON to a relay endpoint, signed
//!   with HMAC-SHA256 so the relay can authenticate it
//!
//! # Relay Request
//!
//! - `Content-Type: application/json`
//! - `X-Mail-Signature: sha256=<hex>` computed over the raw body
//! - `X-Mail-Id: <uuid>`

use std::time::Duration;

use async_trait::async_trait;
use hmac::{Hmac, Mac};
use serde::Serialize;
use sha2::Sha256;
use uuid::Uuid;

type HmacSha256 = Hmac<Sha256>;

/// Errors raised while handing a message to the relay.
#[derive(Debug, thiserror::Error)]
pub enum MailError {
    #[error("invalid relay URL: {0}")]
    InvalidRelayUrl(String),

    #[error("unusable relay secret")]
    InvalidSecret,

    #[error("failed to encode message: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("relay request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("relay rejected message with status {0}")]
    Rejected(u16),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmailMessage {
    pub subject: String,
    /// HTML body
    pub content: String,
    pub to: Vec<String>,
}

#[async_trait]
pub trait EmailSender: Send + Sync {
    async fn send(&self, message: &EmailMessage) -> Result<(), MailError>;
}

/// Sender that only logs. Used when no relay is configured.
#[derive(Debug, Clone, Default)]
pub struct LogSender;

#[async_trait]
impl EmailSender for LogSender {
    async fn send(&self, message: &EmailMessage) -> Result<(), MailError> {
        tracing::info!(
            to = ?message.to,
            subject = %message.subject,
            "Mail relay not configured, logging message instead"
        );
        tracing::debug!("{}", message.content);
        Ok(())
    }
}

/// Sender that delivers through an HTTP mail relay.
#[derive(Debug, Clone)]
pub struct RelaySender {
    client: reqwest::Client,
    url: String,
    secret: String,
}

impl RelaySender {
    /// Build a relay sender.
    ///
    /// # Errors
    ///
    /// - `InvalidRelayUrl`: see [`validate_relay_url`]
    /// - `Http`: the HTTP client could not be built
    pub fn new(url: String, secret: String) -> Result<Self, MailError> {
        validate_relay_url(&url)?;

        // 5 seconds per message (prevents hanging on a slow relay)
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(5))
            .build()?;

        Ok(Self {
            client,
            url,
            secret,
        })
    }
}

#[async_trait]
impl EmailSender for RelaySender {
    async fn send(&self, message: &EmailMessage) -> Result<(), MailError> {
        let mail_id = Uuid::new_v4();
        let body = serde_json::to_string(message)?;
        let signature = generate_signature(&self.secret, &body)?;

        let response = self
            .client
            .post(&self.url)
            .header("Content-Type", "application/json")
            .header("X-Mail-Signature", &signature)
            .header("X-Mail-Id", mail_id.to_string())
            .body(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            tracing::error!(%mail_id, status = status.as_u16(), "Mail relay rejected message");
            return Err(MailError::Rejected(status.as_u16()));
        }

        tracing::info!(%mail_id, to = ?message.to, "Mail handed to relay");
        Ok(())
    }
}

/// Generate the HMAC-SHA256 signature header value for a relay payload.
///
/// # Format
///
/// `sha256=<hex_encoded_hmac>`
pub fn generate_signature(secret: &str, payload: &str) -> Result<String, MailError> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|_| MailError::InvalidSecret)?;
    mac.update(payload.as_bytes());
    Ok(format!("sha256={}", hex::encode(mac.finalize().into_bytes())))
}

/// Validate the relay URL.
///
/// # Rules
///
/// - Must be valid URL
/// - Must be HTTPS (HTTP localhost allowed for development)
/// - Maximum 2048 characters
pub fn validate_relay_url(url: &str) -> Result<(), MailError> {
    if url.len() > 2048 {
        return Err(MailError::InvalidRelayUrl(
            "URL exceeds 2048 characters".to_string(),
        ));
    }

    let parsed = url::Url::parse(url)
        .map_err(|_| MailError::InvalidRelayUrl("Invalid URL format".to_string()))?;

    match parsed.scheme() {
        "https" => Ok(()),
        "http" => match parsed.host_str() {
            Some("localhost") | Some("127.0.0.1") | Some("0.0.0.0") => Ok(()),
            _ => Err(MailError::InvalidRelayUrl(
                "HTTP is only allowed for localhost. Use HTTPS for production.".to_string(),
            )),
        },
        _ => Err(MailError::InvalidRelayUrl(
            "URL must use HTTP or HTTPS".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn signature_is_prefixed_hex_digest() {
        let signature = generate_signature("secret", "{}").unwrap();
        let digest = signature.strip_prefix("sha256=").unwrap();
        assert_eq!(digest.len(), 64);
        assert!(digest.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn signature_depends_on_secret_and_payload() {
        let base = generate_signature("secret", "payload").unwrap();
        assert_eq!(base, generate_signature("secret", "payload").unwrap());
        assert_ne!(base, generate_signature("other", "payload").unwrap());
        assert_ne!(base, generate_signature("secret", "payload2").unwrap());
    }

    #[rstest]
    #[case("https://mail.example.com/send")]
    #[case("http://localhost:8025/send")]
    #[case("http://127.0.0.1/send")]
    fn accepts_relay_urls(#[case] url: &str) {
        assert!(validate_relay_url(url).is_ok());
    }

    #[rstest]
    #[case("http://mail.example.com/send")]
    #[case("ftp://mail.example.com")]
    #[case("not a url")]
    fn rejects_relay_urls(#[case] url: &str) {
        assert!(matches!(
            validate_relay_url(url),
            Err(MailError::InvalidRelayUrl(_))
        ));
    }

    #[test]
    fn rejects_overlong_url() {
        let url = format!("https://example.com/{}", "a".repeat(2048));
        assert!(validate_relay_url(&url).is_err());
    }

    #[tokio::test]
    async fn log_sender_accepts_everything() {
        let message = EmailMessage {
            subject: "Welcome".to_string(),
            content: "<p>hi</p>".to_string(),
            to: vec!["alice@example.com".to_string()],
        };
        assert!(LogSender.send(&message).await.is_ok());
    }
}
