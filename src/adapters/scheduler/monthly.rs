//! MonthlyReportScheduler - Background service for the monthly report email.
//!
//! Sleeps until local midnight of the first day of the next month in the
//! report time zone, then runs [`SendMonthlyReportHandler`] once. Failures
//! are logged and the loop moves on to the following month; there are no
//! retries.
//!
//! ## Graceful Shutdown
//!
//! The service listens on a watch channel and stops as soon as `true` is
//! sent. A delivery already in progress is allowed to finish.

use std::sync::Arc;
use std::time::Duration;

use chrono_tz::Tz;
use tokio::sync::watch;

use crate::application::handlers::reporting::{
    SendMonthlyReportCommand, SendMonthlyReportHandler, SendMonthlyReportResult,
};
use crate::domain::foundation::Timestamp;
use crate::domain::reporting::{ReportError, ReportMonth};

/// The first instant strictly after `now` that starts a calendar month in `tz`.
///
/// Returns `None` only when `now` lies in the last representable month.
pub fn next_run_after(now: Timestamp, tz: Tz) -> Option<Timestamp> {
    ReportMonth::containing(now.local_date(tz))
        .next()
        .map(|month| month.window(tz).start)
}

/// Background service that delivers the monthly report.
pub struct MonthlyReportScheduler {
    handler: Arc<SendMonthlyReportHandler>,
    timezone: Tz,
}

impl MonthlyReportScheduler {
    pub fn new(handler: Arc<SendMonthlyReportHandler>, timezone: Tz) -> Self {
        Self { handler, timezone }
    }

    /// Run the scheduler loop until the shutdown signal is received.
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) {
        loop {
            let now = Timestamp::now();
            let Some(next) = next_run_after(now, self.timezone) else {
                tracing::warn!("No further report month is representable; scheduler stopping");
                return;
            };
            let wait = (*next.as_datetime() - *now.as_datetime())
                .to_std()
                .unwrap_or(Duration::ZERO);
            tracing::info!(next_run = %next.as_datetime(), "Monthly report scheduled");

            tokio::select! {
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        tracing::info!("Monthly report scheduler shutting down");
                        return;
                    }
                }

                _ = tokio::time::sleep(wait) => {
                    // Errors are already logged by run_once.
                    let _ = self.run_if_due(next, Timestamp::now()).await;
                }
            }
        }
    }

    /// Runs the delivery only once the wall clock has reached `due`.
    ///
    /// The sleep runs on a monotonic clock, so a wall clock stepped backwards
    /// can wake the loop early. Returns `None` when nothing was run; the
    /// loop then waits for the same month start again.
    pub async fn run_if_due(
        &self,
        due: Timestamp,
        now: Timestamp,
    ) -> Option<Result<SendMonthlyReportResult, ReportError>> {
        if now < due {
            tracing::debug!(due = %due.as_datetime(), now = %now.as_datetime(), "Woke before scheduled time");
            return None;
        }
        Some(self.run_once(now).await)
    }

    /// Deliver the report as of `now` exactly once.
    pub async fn run_once(&self, now: Timestamp) -> Result<SendMonthlyReportResult, ReportError> {
        let result = self.handler.handle(SendMonthlyReportCommand { now }).await;
        match &result {
            Ok(SendMonthlyReportResult::Sent { recipient, months }) => {
                tracing::info!(recipient = %recipient, months, "Scheduled monthly report delivered");
            }
            Ok(SendMonthlyReportResult::Skipped(reason)) => {
                tracing::info!(?reason, "Scheduled monthly report skipped");
            }
            Err(e) => {
                tracing::error!(error = %e, "Scheduled monthly report failed");
            }
        }
        result
    }
}
