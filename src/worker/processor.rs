use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use rand::Rng;
use rand::distr::Alphanumeric;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use super::distributor::{PayloadSendVerifyEmail, TASK_SEND_VERIFY_EMAIL};
use crate::db::Store;
use crate::mail::{EmailMessage, EmailSender};
use crate::models::user::User;
use crate::models::verify_email::{CreateVerifyEmailParams, SECRET_CODE_LENGTH, VerifyEmail};

/// Consumer half of the task queue.
pub struct TaskProcessor {
    store: Store,
    mailer: Arc<dyn EmailSender>,
    /// Base of the link mailed to users, e.g. `http://localhost:3000/api/v1/verify_email`
    verify_url_base: String,
    /// Wait before handling a task, giving the enqueueing transaction time to commit
    delay: Duration,
}

impl TaskProcessor {
    pub fn new(
        store: Store,
        mailer: Arc<dyn EmailSender>,
        verify_url_base: String,
        delay: Duration,
    ) -> Self {
        Self {
            store,
            mailer,
            verify_url_base,
            delay,
        }
    }

    /// Spawn the processing loop. It ends once every distributor is dropped.
    pub fn start(self, receiver: mpsc::Receiver<PayloadSendVerifyEmail>) -> JoinHandle<()> {
        tokio::spawn(Arc::new(self).run(receiver))
    }

    async fn run(self: Arc<Self>, mut receiver: mpsc::Receiver<PayloadSendVerifyEmail>) {
        tracing::info!("Task processor started");

        while let Some(payload) = receiver.recv().await {
            let processor = Arc::clone(&self);
            tokio::spawn(async move {
                tokio::time::sleep(processor.delay).await;
                if let Err(e) = processor.process_send_verify_email(&payload).await {
                    tracing::error!(
                        task = TASK_SEND_VERIFY_EMAIL,
                        username = %payload.username,
                        "Process task failed: {:#}",
                        e
                    );
                }
            });
        }

        tracing::info!("Task queue closed, processor stopped");
    }

    /// Create a verification record for the user and mail them the link.
    ///
    /// # Process
    ///
    /// 1. Load the user (fails if the registration never committed)
    /// 2. Store a verification record with a fresh secret code
    /// 3. Build the verification link and send the welcome mail
    pub async fn process_send_verify_email(
        &self,
        payload: &PayloadSendVerifyEmail,
    ) -> anyhow::Result<VerifyEmail> {
        let mut q = self.store.queries().await?;

        let user = q
            .get_user(&payload.username)
            .await
            .with_context(|| format!("failed to get user {}", payload.username))?;

        let verify_email = q
            .create_verify_email(&CreateVerifyEmailParams {
                username: user.username.clone(),
                email: user.email.clone(),
                secret_code: generate_secret_code(),
            })
            .await
            .context("failed to create verify email")?;
        drop(q);

        let message = verify_email_message(&user, &verify_email, &self.verify_url_base)?;
        self.mailer
            .send(&message)
            .await
            .context("failed to send verify email")?;

        tracing::info!(
            task = TASK_SEND_VERIFY_EMAIL,
            email = %user.email,
            email_id = verify_email.id,
            "Processed task"
        );

        Ok(verify_email)
    }
}

/// Random alphanumeric secret of [`SECRET_CODE_LENGTH`] characters.
pub fn generate_secret_code() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(SECRET_CODE_LENGTH)
        .map(char::from)
        .collect()
}

/// Build the welcome mail carrying the verification link.
pub fn verify_email_message(
    user: &User,
    verify_email: &VerifyEmail,
    verify_url_base: &str,
) -> anyhow::Result<EmailMessage> {
    let verify_url = url::Url::parse_with_params(
        verify_url_base,
        &[
            ("email_id", verify_email.id.to_string()),
            ("secret_code", verify_email.secret_code.clone()),
        ],
    )
    .context("invalid verify email base URL")?;

    let content = format!(
        "Hello {}, <br/>\
         Thank you for registering with us! <br/>\
         Please <a href=\"{}\">click here</a> to verify your email address.<br/>",
        user.full_name, verify_url
    );

    Ok(EmailMessage {
        subject: "Welcome to Bank Ledger".to_string(),
        content,
        to: vec![verify_email.email.clone()],
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration as ChronoDuration, Utc};

    #[test]
    fn secret_code_is_alphanumeric_of_fixed_length() {
        let code = generate_secret_code();
        assert_eq!(code.len(), SECRET_CODE_LENGTH);
        assert!(code.chars().all(|c| c.is_ascii_alphanumeric()));
        assert_ne!(code, generate_secret_code());
    }

    #[test]
    fn message_links_to_verification_endpoint() {
        let now = Utc::now();
        let user = User {
            username: "alice".to_string(),
            hashed_password: "x".to_string(),
            full_name: "Alice Liddell".to_string(),
            email: "alice@example.com".to_string(),
            password_changed_at: now,
            is_email_verified: false,
            created_at: now,
        };
        let verify_email = VerifyEmail {
            id: 42,
            username: "alice".to_string(),
            email: "alice@example.com".to_string(),
            secret_code: "abc123".to_string(),
            is_used: false,
            created_at: now,
            expired_at: now + ChronoDuration::minutes(15),
        };

        let message = verify_email_message(
            &user,
            &verify_email,
            "http://localhost:3000/api/v1/verify_email",
        )
        .unwrap();

        assert_eq!(message.to, vec!["alice@example.com".to_string()]);
        assert!(message.content.contains("Alice Liddell"));
        assert!(message.content.contains(
            "http://localhost:3000/api/v1/verify_email?email_id=42&secret_code=abc123"
        ));
    }

    #[test]
    fn message_rejects_invalid_base_url() {
        let now = Utc::now();
        let user = User {
            username: "alice".to_string(),
            hashed_password: "x".to_string(),
            full_name: "Alice".to_string(),
            email: "alice@example.com".to_string(),
            password_changed_at: now,
            is_email_verified: false,
            created_at: now,
        };
        let verify_email = VerifyEmail {
            id: 1,
            username: "alice".to_string(),
            email: "alice@example.com".to_string(),
            secret_code: "abc".to_string(),
            is_used: false,
            created_at: now,
            expired_at: now,
        };

        assert!(verify_email_message(&user, &verify_email, "not a url").is_err());
    }
}
