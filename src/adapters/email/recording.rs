//! Recording mailer for tests and dry runs.
//!
//! Keeps every message instead of sending it.

use std::sync::Mutex;

use async_trait::async_trait;

use crate::ports::{MailError, ReportEmail, ReportMailer};

#[derive(Debug, Default)]
pub struct RecordingMailer {
    sent: Mutex<Vec<ReportEmail>>,
    failure: Option<MailError>,
}

impl RecordingMailer {
    pub fn new() -> Self {
        Self::default()
    }

    /// A mailer whose every send fails with `error`.
    pub fn failing(error: MailError) -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            failure: Some(error),
        }
    }

    /// Messages accepted so far, oldest first.
    pub fn sent(&self) -> Vec<ReportEmail> {
        self.sent.lock().map(|sent| sent.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl ReportMailer for RecordingMailer {
    async fn send(&self, email: ReportEmail) -> Result<(), MailError> {
        if let Some(error) = &self.failure {
            return Err(error.clone());
        }
        tracing::info!(to = %email.to, subject = %email.subject, "Recorded report email");
        self.sent
            .lock()
            .map_err(|_| MailError::Transport("recording mailer lock poisoned".to_string()))?
            .push(email);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn email(to: &str) -> ReportEmail {
        ReportEmail {
            to: to.parse().unwrap(),
            subject: "Report".to_string(),
            html_body: "<p>hi</p>".to_string(),
            attachments: vec![],
        }
    }

    #[tokio::test]
    async fn keeps_messages_in_send_order() {
        let mailer = RecordingMailer::new();
        mailer.send(email("a@example.com")).await.unwrap();
        mailer.send(email("b@example.com")).await.unwrap();

        let sent = mailer.sent();
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0].to.as_str(), "a@example.com");
        assert_eq!(sent[1].to.as_str(), "b@example.com");
    }

    #[tokio::test]
    async fn failing_mailer_records_nothing() {
        let error = MailError::Transport("down".to_string());
        let mailer = RecordingMailer::failing(error.clone());

        assert_eq!(mailer.send(email("a@example.com")).await, Err(error));
        assert!(mailer.sent().is_empty());
    }
}
