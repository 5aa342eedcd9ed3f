//! SendMonthlyReportHandler - Command handler for scheduled report delivery.
//!
//! Runs once per month. The stored recipient is checked before anything
//! else: with no valid recipient the record source is never queried and no
//! mail is sent.

use std::sync::Arc;

use super::generate_report::GenerateReportHandler;
use crate::domain::foundation::Timestamp;
use crate::domain::reporting::{EmailAddress, ReportError};
use crate::ports::{
    Attachment, CsvLayout, ReportEmail, ReportExporter, ReportMailer, ReportSettingsStore,
    CSV_CONTENT_TYPE, CSV_FILENAME,
};

/// Subject line of the monthly report email.
pub const REPORT_SUBJECT: &str = "Monthly Active Subscriptions Report";

const REPORT_BODY: &str = "<p>Hi,</p>\
<p>Attached is your monthly report showing active and pending-cancel subscriptions \
along with active club members.</p>\
<p>Best,<br>Subscription Reports</p>";

/// Command to deliver the trailing twelve-month report as of `now`.
#[derive(Debug, Clone, Copy)]
pub struct SendMonthlyReportCommand {
    pub now: Timestamp,
}

/// Why a scheduled delivery did not send anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    NoRecipient,
    InvalidRecipient,
}

/// Outcome of a scheduled delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendMonthlyReportResult {
    Sent { recipient: EmailAddress, months: usize },
    Skipped(SkipReason),
}

pub struct SendMonthlyReportHandler {
    store: Arc<dyn ReportSettingsStore>,
    generator: Arc<GenerateReportHandler>,
    exporter: Arc<dyn ReportExporter>,
    mailer: Arc<dyn ReportMailer>,
}

impl SendMonthlyReportHandler {
    pub fn new(
        store: Arc<dyn ReportSettingsStore>,
        generator: Arc<GenerateReportHandler>,
        exporter: Arc<dyn ReportExporter>,
        mailer: Arc<dyn ReportMailer>,
    ) -> Self {
        Self {
            store,
            generator,
            exporter,
            mailer,
        }
    }

    pub async fn handle(&self, cmd: SendMonthlyReportCommand) -> Result<SendMonthlyReportResult, ReportError> {
        let Some(raw) = self.store.get_recipient().await? else {
            tracing::info!("No report recipient configured; skipping monthly report");
            return Ok(SendMonthlyReportResult::Skipped(SkipReason::NoRecipient));
        };
        let recipient = match EmailAddress::parse(&raw) {
            Ok(recipient) => recipient,
            Err(e) => {
                tracing::info!(error = %e, "Stored report recipient is invalid; skipping monthly report");
                return Ok(SendMonthlyReportResult::Skipped(SkipReason::InvalidRecipient));
            }
        };

        let range = self.generator.settings().default_range(cmd.now);
        let report = self.generator.generate(range).await?;
        let csv = self
            .exporter
            .to_csv(&report, CsvLayout::Full)
            .map_err(|e| ReportError::infrastructure(e.to_string()))?;

        let email = ReportEmail {
            to: recipient.clone(),
            subject: REPORT_SUBJECT.to_string(),
            html_body: REPORT_BODY.to_string(),
            attachments: vec![Attachment {
                filename: CSV_FILENAME.to_string(),
                content_type: CSV_CONTENT_TYPE.to_string(),
                content: csv,
            }],
        };

        self.mailer
            .send(email)
            .await
            .map_err(|e| ReportError::mail_delivery(e.to_string()))?;

        tracing::info!(recipient = %recipient, months = report.rows.len(), "Monthly report sent");
        Ok(SendMonthlyReportResult::Sent {
            recipient,
            months: report.rows.len(),
        })
    }
}
