//! Report export port - tabular rendering of an assembled report.
//!
//! The application layer depends on this trait; the `export` adapter renders
//! CSV with the `csv` crate and a plain HTML table.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::reporting::SubscriptionReport;

/// File name used for downloaded and emailed CSV exports.
pub const CSV_FILENAME: &str = "subscription-report.csv";

/// MIME type of CSV exports.
pub const CSV_CONTENT_TYPE: &str = "text/csv; charset=utf-8";

/// Column set of a CSV export.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CsvLayout {
    /// Every report column.
    #[default]
    Full,
    /// Month, active and pending-cancel counts only.
    Legacy,
}

/// Renders reports into downloadable formats.
///
/// # Contract
///
/// Implementations must:
/// - Emit exactly one header row followed by one row per report month
/// - Keep report rows in their original order
/// - Render money with two decimals and `,` thousands separators
pub trait ReportExporter: Send + Sync {
    /// Renders the report as CSV bytes in the requested layout.
    fn to_csv(&self, report: &SubscriptionReport, layout: CsvLayout) -> Result<Vec<u8>, ExportError>;

    /// Renders the report as an HTML `<table>` fragment with escaped cells.
    fn to_html(&self, report: &SubscriptionReport) -> String;
}

/// Errors that can occur while exporting a report.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ExportError {
    #[error("CSV encoding failed: {0}")]
    Csv(String),
}
