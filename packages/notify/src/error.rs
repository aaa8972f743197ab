// ABOUTME: Error types for outbound notification delivery
// ABOUTME: Separates transport failures from outbox bookkeeping failures

use thiserror::Error;

pub type NotifyResult<T> = Result<T, NotifyError>;

#[derive(Error, Debug)]
pub enum NotifyError {
    #[error("Mail delivery failed: {0}")]
    Delivery(String),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}
