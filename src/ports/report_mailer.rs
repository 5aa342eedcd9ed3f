//! Outbound mail port for report delivery.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::reporting::EmailAddress;

/// A file attached to a report email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub filename: String,
    pub content_type: String,
    pub content: Vec<u8>,
}

/// A fully rendered report email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportEmail {
    pub to: EmailAddress,
    pub subject: String,
    pub html_body: String,
    pub attachments: Vec<Attachment>,
}

/// Errors raised by a mail transport.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MailError {
    #[error("Mail provider rejected the message ({status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("Mail provider unreachable: {0}")]
    Transport(String),
}

/// Sends rendered report emails.
#[async_trait]
pub trait ReportMailer: Send + Sync {
    async fn send(&self, email: ReportEmail) -> Result<(), MailError>;
}
