//! GenerateReportHandler - Query handler for the monthly report.

use std::sync::Arc;

use tracing::Instrument;

use super::load_snapshot::SnapshotLoader;
use super::settings::ReportSettings;
use crate::domain::foundation::Timestamp;
use crate::domain::reporting::{
    compute_monthly_stats, count_club_members, DateRange, ReportError, ReportRow,
    SubscriptionReport,
};
use crate::ports::RecordSource;

/// Query for a report over an optional date range.
///
/// Bounds are `YYYY-MM-DD` strings as received from the caller. A missing
/// or blank bound falls back to the trailing twelve-month range.
#[derive(Debug, Clone, Default)]
pub struct GenerateReportQuery {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

impl GenerateReportQuery {
    pub fn new(start_date: Option<String>, end_date: Option<String>) -> Self {
        Self {
            start_date,
            end_date,
        }
    }
}

/// Result type for the report query.
pub type GenerateReportResult = SubscriptionReport;

/// Handler that assembles one row per month of the requested range.
pub struct GenerateReportHandler {
    loader: SnapshotLoader,
    settings: ReportSettings,
}

impl GenerateReportHandler {
    pub fn new(source: Arc<dyn RecordSource>, settings: ReportSettings) -> Self {
        Self {
            loader: SnapshotLoader::new(source),
            settings,
        }
    }

    pub fn settings(&self) -> &ReportSettings {
        &self.settings
    }

    pub async fn handle(&self, query: GenerateReportQuery) -> Result<GenerateReportResult, ReportError> {
        let range = self.resolve_range(&query, Timestamp::now())?;
        self.generate(range).await
    }

    /// Validates the query bounds against the default range at `now`.
    pub fn resolve_range(
        &self,
        query: &GenerateReportQuery,
        now: Timestamp,
    ) -> Result<DateRange, ReportError> {
        let range = DateRange::parse(
            query.start_date.as_deref(),
            query.end_date.as_deref(),
            self.settings.default_range(now),
            self.settings.max_range_months,
        )?;
        Ok(range)
    }

    /// Builds the report for an already validated range.
    pub async fn generate(&self, range: DateRange) -> Result<SubscriptionReport, ReportError> {
        let span = tracing::info_span!("generate_report", start = %range.start, end = %range.end);
        self.build(range).instrument(span).await
    }

    async fn build(&self, range: DateRange) -> Result<SubscriptionReport, ReportError> {
        let months = range.months();
        if months.is_empty() {
            tracing::debug!("Range covers no months");
            return Ok(SubscriptionReport { range, rows: vec![] });
        }

        let snapshot = self.loader.load(self.settings.membership_plan_id).await?;

        let rows: Vec<ReportRow> = months
            .into_iter()
            .map(|month| {
                let window = month.window(self.settings.timezone);
                ReportRow {
                    month,
                    stats: compute_monthly_stats(&window, &snapshot),
                    club_members: count_club_members(
                        &window,
                        &snapshot,
                        self.settings.membership_plan_id,
                    ),
                }
            })
            .collect();

        tracing::info!(rows = rows.len(), "Report generated");
        Ok(SubscriptionReport { range, rows })
    }
}
