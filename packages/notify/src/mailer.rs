// ABOUTME: Mailer trait and implementations
// ABOUTME: HttpMailer posts to an HTTP mail API; NullMailer logs and discards

use async_trait::async_trait;
use serde::Serialize;
use tracing::info;

use crate::error::NotifyError;

/// A rendered email ready for delivery.
#[derive(Debug, Clone, Serialize)]
pub struct EmailMessage {
    pub to: String,
    pub subject: String,
    pub text_body: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub html_body: Option<String>,
}

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, message: &EmailMessage) -> Result<(), NotifyError>;
}

/// Delivers mail by posting JSON to an HTTP mail endpoint.
pub struct HttpMailer {
    client: reqwest::Client,
    endpoint: String,
    from: String,
}

#[derive(Serialize)]
struct HttpMailPayload<'a> {
    from: &'a str,
    #[serde(flatten)]
    message: &'a EmailMessage,
}

impl HttpMailer {
    pub fn new(endpoint: String, from: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint,
            from,
        }
    }

    pub fn with_client(client: reqwest::Client, endpoint: String, from: String) -> Self {
        Self {
            client,
            endpoint,
            from,
        }
    }
}

#[async_trait]
impl Mailer for HttpMailer {
    async fn send(&self, message: &EmailMessage) -> Result<(), NotifyError> {
        let payload = HttpMailPayload {
            from: &self.from,
            message,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .json(&payload)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(NotifyError::Delivery(format!(
                "mail endpoint returned {}",
                response.status()
            )));
        }

        Ok(())
    }
}

/// Logs the message and reports success. Used in development and tests
/// where no mail endpoint is configured.
#[derive(Default)]
pub struct NullMailer;

#[async_trait]
impl Mailer for NullMailer {
    async fn send(&self, message: &EmailMessage) -> Result<(), NotifyError> {
        info!(to = %message.to, subject = %message.subject, "Discarding email (no mailer configured)");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_null_mailer_always_succeeds() {
        let mailer = NullMailer;
        let message = EmailMessage {
            to: "vendor@example.com".to_string(),
            subject: "Hello".to_string(),
            text_body: "Body".to_string(),
            html_body: None,
        };

        assert!(mailer.send(&message).await.is_ok());
    }
}
