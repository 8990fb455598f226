use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

use crate::models::user::User;
use crate::services::AfterCreateUser;

pub const TASK_SEND_VERIFY_EMAIL: &str = "task:send_verify_email";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayloadSendVerifyEmail {
    pub username: String,
}

#[derive(Debug, thiserror::Error)]
pub enum DistributeError {
    #[error("task queue is full")]
    QueueFull,

    #[error("task queue is closed")]
    QueueClosed,
}

/// Producer half of the task queue.
///
/// Enqueueing never waits: a full or closed queue is reported immediately,
/// which makes the registration that triggered it roll back.
#[derive(Debug, Clone)]
pub struct TaskDistributor {
    sender: mpsc::Sender<PayloadSendVerifyEmail>,
}

impl TaskDistributor {
    /// Create a queue holding at most `capacity` pending tasks.
    pub fn channel(capacity: usize) -> (Self, mpsc::Receiver<PayloadSendVerifyEmail>) {
        let (sender, receiver) = mpsc::channel(capacity);
        (Self { sender }, receiver)
    }

    pub fn distribute_send_verify_email(
        &self,
        payload: PayloadSendVerifyEmail,
    ) -> Result<(), DistributeError> {
        self.sender.try_send(payload).map_err(|err| match err {
            mpsc::error::TrySendError::Full(_) => DistributeError::QueueFull,
            mpsc::error::TrySendError::Closed(_) => DistributeError::QueueClosed,
        })?;

        tracing::info!(
            task = TASK_SEND_VERIFY_EMAIL,
            pending = self.sender.max_capacity() - self.sender.capacity(),
            "Enqueued task"
        );
        Ok(())
    }
}

#[async_trait]
impl AfterCreateUser for TaskDistributor {
    async fn after_create(&self, user: &User) -> anyhow::Result<()> {
        self.distribute_send_verify_email(PayloadSendVerifyEmail {
            username: user.username.clone(),
        })?;
        Ok(())
    }
}
