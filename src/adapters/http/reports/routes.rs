//! Axum router configuration for report endpoints.

use axum::{
    routing::{get, put},
    Router,
};

use super::handlers::{
    get_report, get_report_csv, get_report_html, get_settings, update_recipient, ReportsAppState,
};

/// Create the report API router.
///
/// # Routes
///
/// All routes require the `manage_reports` capability.
///
/// - `GET /subscriptions` - Monthly report as JSON
/// - `GET /subscriptions/html` - Monthly report as an HTML table
/// - `GET /subscriptions/csv` - Monthly report as a CSV download
/// - `GET /settings` - Current report settings
/// - `PUT /settings/recipient` - Replace the monthly report recipient
pub fn report_routes() -> Router<ReportsAppState> {
    Router::new()
        .route("/subscriptions", get(get_report))
        .route("/subscriptions/html", get(get_report_html))
        .route("/subscriptions/csv", get(get_report_csv))
        .route("/settings", get(get_settings))
        .route("/settings/recipient", put(update_recipient))
}
