// ABOUTME: Mail outbox storage using SQLite
// ABOUTME: At-least-once delivery log decoupling request handling from mail transport

use chrono::{DateTime, Utc};
use sqlx::{Row, SqliteConnection, SqlitePool};
use tracing::debug;

use crate::error::NotifyError;
use crate::mailer::EmailMessage;

/// Rows are marked FAILED permanently after this many delivery attempts.
pub const MAX_ATTEMPTS: i64 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MailStatus {
    Pending,
    Sent,
    Failed,
}

impl MailStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MailStatus::Pending => "PENDING",
            MailStatus::Sent => "SENT",
            MailStatus::Failed => "FAILED",
        }
    }
}

/// An email waiting in (or finished with) the outbox.
#[derive(Debug, Clone)]
pub struct OutboxMail {
    pub id: String,
    pub recipient: String,
    pub subject: String,
    pub body_text: String,
    pub body_html: Option<String>,
    pub status: String,
    pub attempts: i64,
    pub last_error: Option<String>,
    pub created_at: DateTime<Utc>,
    pub sent_at: Option<DateTime<Utc>>,
}

impl OutboxMail {
    pub fn to_message(&self) -> EmailMessage {
        EmailMessage {
            to: self.recipient.clone(),
            subject: self.subject.clone(),
            text_body: self.body_text.clone(),
            html_body: self.body_html.clone(),
        }
    }
}

/// An email to enqueue.
#[derive(Debug, Clone)]
pub struct MailDraft {
    pub recipient: String,
    pub subject: String,
    pub body_text: String,
    pub body_html: Option<String>,
}

/// Insert a draft on an existing connection. Takes a bare connection so
/// callers can enqueue inside their own transaction; a registration commit
/// and its welcome mail then share one atomic unit.
pub async fn enqueue_mail(
    conn: &mut SqliteConnection,
    draft: &MailDraft,
) -> Result<String, sqlx::Error> {
    let id = procura_core::mail_id();
    let now = Utc::now();

    debug!("Enqueueing mail: {} (to: {})", id, draft.recipient);

    sqlx::query(
        r#"
        INSERT INTO mail_outbox (id, recipient, subject, body_text, body_html, status, attempts, created_at)
        VALUES (?, ?, ?, ?, ?, 'PENDING', 0, ?)
        "#,
    )
    .bind(&id)
    .bind(&draft.recipient)
    .bind(&draft.subject)
    .bind(&draft.body_text)
    .bind(&draft.body_html)
    .bind(now)
    .execute(conn)
    .await?;

    Ok(id)
}

pub struct OutboxStorage {
    pool: SqlitePool,
}

impl OutboxStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Enqueue a draft outside any caller transaction.
    pub async fn enqueue(&self, draft: &MailDraft) -> Result<String, NotifyError> {
        let mut conn = self.pool.acquire().await?;
        Ok(enqueue_mail(&mut *conn, draft).await?)
    }

    /// Fetch pending mail, oldest first.
    pub async fn pending(&self, limit: i64) -> Result<Vec<OutboxMail>, NotifyError> {
        let rows = sqlx::query(
            r#"
            SELECT * FROM mail_outbox
            WHERE status = 'PENDING'
            ORDER BY created_at ASC
            LIMIT ?
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(row_to_mail).collect()
    }

    /// Mark a row delivered.
    pub async fn mark_sent(&self, id: &str) -> Result<(), NotifyError> {
        sqlx::query("UPDATE mail_outbox SET status = 'SENT', sent_at = ? WHERE id = ?")
            .bind(Utc::now())
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Record a failed attempt. The row stays PENDING until the attempt cap
    /// is reached, then flips to FAILED permanently.
    pub async fn record_failure(&self, id: &str, error: &str) -> Result<(), NotifyError> {
        sqlx::query(
            r#"
            UPDATE mail_outbox
            SET attempts = attempts + 1,
                last_error = ?,
                status = CASE WHEN attempts + 1 >= ? THEN 'FAILED' ELSE 'PENDING' END
            WHERE id = ?
            "#,
        )
        .bind(error)
        .bind(MAX_ATTEMPTS)
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Count rows in a given status; used by tests and the health surface.
    pub async fn count_by_status(&self, status: MailStatus) -> Result<i64, NotifyError> {
        let row = sqlx::query("SELECT COUNT(*) as count FROM mail_outbox WHERE status = ?")
            .bind(status.as_str())
            .fetch_one(&self.pool)
            .await?;

        Ok(row.try_get("count")?)
    }
}

fn row_to_mail(row: &sqlx::sqlite::SqliteRow) -> Result<OutboxMail, NotifyError> {
    Ok(OutboxMail {
        id: row.try_get("id")?,
        recipient: row.try_get("recipient")?,
        subject: row.try_get("subject")?,
        body_text: row.try_get("body_text")?,
        body_html: row.try_get("body_html")?,
        status: row.try_get("status")?,
        attempts: row.try_get("attempts")?,
        last_error: row.try_get("last_error")?,
        created_at: row.try_get("created_at")?,
        sent_at: row.try_get("sent_at")?,
    })
}


#[cfg(test)]
mod tests {
    use super::*;

    async fn setup() -> OutboxStorage {
        let pool = SqlitePool::connect("sqlite::memory:").await.unwrap();
        test_support::create_outbox_table(&pool).await;
        OutboxStorage::new(pool)
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
    async fn test_enqueue_and_fetch_pending() {
        let outbox = setup().await;
        let id = outbox.enqueue(&draft()).await.unwrap();

        let pending = outbox.pending(10).await.unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].id, id);
        assert_eq!(pending[0].attempts, 0);
    }

    #[tokio::test]
    async fn test_mark_sent_removes_from_pending() {
        let outbox = setup().await;
        let id = outbox.enqueue(&draft()).await.unwrap();

        outbox.mark_sent(&id).await.unwrap();

        assert!(outbox.pending(10).await.unwrap().is_empty());
        assert_eq!(outbox.count_by_status(MailStatus::Sent).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_failure_cap_marks_failed() {
        let outbox = setup().await;
        let id = outbox.enqueue(&draft()).await.unwrap();

        for _ in 0..MAX_ATTEMPTS {
            outbox.record_failure(&id, "connection refused").await.unwrap();
        }

        assert!(outbox.pending(10).await.unwrap().is_empty());
        assert_eq!(outbox.count_by_status(MailStatus::Failed).await.unwrap(), 1);
    }
}
