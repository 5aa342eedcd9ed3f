//! Reporting handlers.
//!
//! ## Queries
//! - Generate the monthly subscription report for a date range
//! - Export the report as CSV or an HTML table
//! - Read the report settings
//!
//! ## Commands
//! - Update the monthly report recipient
//! - Send the scheduled monthly report email

mod export_report;
mod generate_report;
mod get_settings;
mod load_snapshot;
mod send_monthly_report;
mod settings;
mod update_recipient;

// Queries
pub use export_report::{
    ExportFormat, ExportReportHandler, ExportReportQuery, ExportReportResult, ExportedReport,
    HTML_CONTENT_TYPE,
};
pub use generate_report::{GenerateReportHandler, GenerateReportQuery, GenerateReportResult};
pub use get_settings::{
    GetReportSettingsHandler, GetReportSettingsQuery, GetReportSettingsResult, ReportSettingsView,
};

// Commands
pub use send_monthly_report::{
    SendMonthlyReportCommand, SendMonthlyReportHandler, SendMonthlyReportResult, SkipReason,
    REPORT_SUBJECT,
};
pub use update_recipient::{UpdateRecipientCommand, UpdateRecipientHandler, UpdateRecipientResult};

pub use load_snapshot::SnapshotLoader;
pub use settings::{ReportSettings, DEFAULT_RANGE_MONTHS};
