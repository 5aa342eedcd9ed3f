//! Resend HTTP API mail adapter.
//!
//! Sends report emails through `POST {api_base_url}/emails`. Attachments are
//! base64-encoded into the JSON payload.

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;

use crate::ports::{MailError, ReportEmail, ReportMailer};

/// Resend API configuration.
#[derive(Clone)]
pub struct ResendConfig {
    /// Resend API key (re_...).
    api_key: SecretString,

    /// Value of the `From` header, e.g. `Reports <reports@example.com>`.
    from: String,

    /// Base URL for the Resend API (default: https://api.resend.com).
    api_base_url: String,
}

impl ResendConfig {
    pub fn new(api_key: SecretString, from: impl Into<String>) -> Self {
        Self {
            api_key,
            from: from.into(),
            api_base_url: "https://api.resend.com".to_string(),
        }
    }

    /// Set a custom API base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into().trim_end_matches('/').to_string();
        self
    }
}

#[derive(Debug, Serialize)]
struct ResendAttachment<'a> {
    filename: &'a str,
    content: String,
    content_type: &'a str,
}

#[derive(Debug, Serialize)]
struct ResendPayload<'a> {
    from: &'a str,
    to: Vec<&'a str>,
    subject: &'a str,
    html: &'a str,
    attachments: Vec<ResendAttachment<'a>>,
}

fn build_payload<'a>(from: &'a str, email: &'a ReportEmail) -> ResendPayload<'a> {
    ResendPayload {
        from,
        to: vec![email.to.as_str()],
        subject: &email.subject,
        html: &email.html_body,
        attachments: email
            .attachments
            .iter()
            .map(|a| ResendAttachment {
                filename: &a.filename,
                content: STANDARD.encode(&a.content),
                content_type: &a.content_type,
            })
            .collect(),
    }
}

/// Report mailer backed by Resend.
pub struct ResendMailer {
    config: ResendConfig,
    http_client: reqwest::Client,
}

impl ResendMailer {
    pub fn new(config: ResendConfig) -> Self {
        Self {
            config,
            http_client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl ReportMailer for ResendMailer {
    async fn send(&self, email: ReportEmail) -> Result<(), MailError> {
        let url = format!("{}/emails", self.config.api_base_url);
        let payload = build_payload(&self.config.from, &email);

        let response = self
            .http_client
            .post(&url)
            .bearer_auth(self.config.api_key.expose_secret())
            .json(&payload)
            .send()
            .await
            .map_err(|e| MailError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            tracing::error!(status = %status, error = %error_text, "Resend send failed");
            return Err(MailError::Rejected {
                status: status.as_u16(),
                message: error_text,
            });
        }

        tracing::debug!(to = %email.to, "Report email accepted by Resend");
        Ok(())
    }
}
