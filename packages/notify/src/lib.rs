// ABOUTME: Outbound email for Procura
// ABOUTME: Request handlers enqueue into an outbox; a background dispatcher delivers

pub mod dispatcher;
pub mod error;
pub mod mailer;
pub mod outbox;

// Re-export main types
pub use dispatcher::OutboxDispatcher;
pub use error::{NotifyError, NotifyResult};
pub use mailer::{EmailMessage, HttpMailer, Mailer, NullMailer};
pub use outbox::{enqueue_mail, MailDraft, MailStatus, OutboxMail, OutboxStorage, MAX_ATTEMPTS};
