//! HTTP adapter for subscription reports.
//!
//! Exposes the monthly report as JSON, HTML and CSV, plus the recipient
//! settings used by the scheduled email.

mod dto;
mod handlers;
mod routes;

pub use dto::{
    CsvQueryParams, RecipientResponse, ReportQueryParams, ReportResponse, ReportRowResponse,
    ReportSettingsResponse, UpdateRecipientRequest,
};
pub use handlers::{ReportApiError, ReportsAppState};
pub use routes::report_routes;
