// ABOUTME: Background outbox dispatcher
// ABOUTME: Polls pending mail and delivers through the configured mailer

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::mailer::Mailer;
use crate::outbox::OutboxStorage;

const BATCH_SIZE: i64 = 20;

/// Drains the mail outbox on an interval. Delivery failures are recorded on
/// the outbox row and never propagate anywhere near a request path.
pub struct OutboxDispatcher {
    outbox: OutboxStorage,
    mailer: Arc<dyn Mailer>,
    poll_interval: Duration,
}

impl OutboxDispatcher {
    pub fn new(outbox: OutboxStorage, mailer: Arc<dyn Mailer>, poll_interval: Duration) -> Self {
        Self {
            outbox,
            mailer,
            poll_interval,
        }
    }

    /// Process one batch of pending mail. Returns the number of rows
    /// attempted.
    pub async fn run_once(&self) -> usize {
        let pending = match self.outbox.pending(BATCH_SIZE).await {
            Ok(pending) => pending,
            Err(e) => {
                warn!("Failed to read mail outbox: {}", e);
                return 0;
            }
        };

        let attempted = pending.len();
        for mail in pending {
            match self.mailer.send(&mail.to_message()).await {
                Ok(()) => {
                    debug!("Delivered mail: {} (to: {})", mail.id, mail.recipient);
                    if let Err(e) = self.outbox.mark_sent(&mail.id).await {
                        warn!("Failed to mark mail {} sent: {}", mail.id, e);
                    }
                }
                Err(e) => {
                    warn!(
                        "Delivery failed for mail {} (attempt {}): {}",
                        mail.id,
                        mail.attempts + 1,
                        e
                    );
                    if let Err(e) = self.outbox.record_failure(&mail.id, &e.to_string()).await {
                        warn!("Failed to record failure for mail {}: {}", mail.id, e);
                    }
                }
            }
        }

        attempted
    }

    /// Spawn the dispatcher loop.
    pub fn spawn(self) -> JoinHandle<()> {
        info!(
            "Starting outbox dispatcher (poll interval: {:?})",
            self.poll_interval
        );

        tokio::spawn(async move {
            loop {
                self.run_once().await;
                tokio::time::sleep(self.poll_interval).await;
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::NotifyError;
    use crate::mailer::{EmailMessage, NullMailer};
    use crate::outbox::{test_support, MailDraft, MailStatus};
    use async_trait::async_trait;
    use sqlx::SqlitePool;

    struct FailingMailer;

    #[async_trait]
    impl Mailer for FailingMailer {
        async fn send(&self, _message: &EmailMessage) -> Result<(), NotifyError> {
            Err(NotifyError::Delivery("smtp relay down".to_string()))
        }
    }

    async fn setup() -> (SqlitePool, OutboxStorage) {
        let pool = SqlitePool::connect("sqlite::memory:").await.unwrap();
        test_support::create_outbox_table(&pool).await;
        (pool.clone(), OutboxStorage::new(pool))
    }

    fn draft() -> MailDraft {
        MailDraft {
            recipient: "vendor@example.com".to_string(),
            subject: "Welcome".to_string(),
            body_text: "Hello".to_string(),
            body_html: None,
        }
    }

    #[tokio::test]
    async fn test_run_once_marks_sent() {
        let (pool, outbox) = setup().await;
        outbox.enqueue(&draft()).await.unwrap();

        let dispatcher = OutboxDispatcher::new(
            OutboxStorage::new(pool.clone()),
            Arc::new(NullMailer),
            Duration::from_secs(1),
        );

        assert_eq!(dispatcher.run_once().await, 1);
        assert_eq!(outbox.count_by_status(MailStatus::Sent).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_run_once_records_failure_and_retries() {
        let (pool, outbox) = setup().await;
        outbox.enqueue(&draft()).await.unwrap();

        let dispatcher = OutboxDispatcher::new(
            OutboxStorage::new(pool.clone()),
            Arc::new(FailingMailer),
            Duration::from_secs(1),
        );

        dispatcher.run_once().await;

        // Still pending after one failure; attempts recorded.
        let pending = outbox.pending(10).await.unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].attempts, 1);
        assert_eq!(pending[0].last_error.as_deref(), Some("Mail delivery failed: smtp relay down"));
    }
}
