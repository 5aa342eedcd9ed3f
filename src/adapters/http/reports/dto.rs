//! Data Transfer Objects for report HTTP endpoints.
//!
//! Money values are rendered as display strings (`1,234.50`) so that JSON,
//! CSV and HTML output agree digit for digit.

use serde::{Deserialize, Serialize};

use crate::application::handlers::reporting::{GenerateReportQuery, ReportSettingsView};
use crate::domain::reporting::{format_money, EmailAddress, ReportRow, SubscriptionReport};
use crate::ports::CsvLayout;

// ════════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Date range query string shared by every report view.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReportQueryParams {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

impl From<ReportQueryParams> for GenerateReportQuery {
    fn from(params: ReportQueryParams) -> Self {
        GenerateReportQuery::new(params.start_date, params.end_date)
    }
}

/// Query string for the CSV download.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CsvQueryParams {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    /// Column layout; the full layout when absent.
    pub layout: Option<CsvLayout>,
}

impl CsvQueryParams {
    pub fn range(&self) -> GenerateReportQuery {
        GenerateReportQuery::new(self.start_date.clone(), self.end_date.clone())
    }

    pub fn layout(&self) -> CsvLayout {
        self.layout.unwrap_or_default()
    }
}

/// Request to replace the monthly report recipient.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateRecipientRequest {
    pub email: String,
}

// ════════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// One month of the report as returned over JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportRowResponse {
    pub month: String,
    pub active: u64,
    pub pending_cancel: u64,
    pub active_club_members: u64,
    pub total_amount: String,
    pub new_subscriptions: u64,
    pub renewals: u64,
    pub cancellations: u64,
    pub ended: u64,
    pub signup_total: String,
    pub renewal_total: String,
}

impl From<&ReportRow> for ReportRowResponse {
    fn from(row: &ReportRow) -> Self {
        let stats = &row.stats;
        Self {
            month: row.month.to_string(),
            active: stats.active(),
            pending_cancel: stats.pending_cancel(),
            active_club_members: row.club_members,
            total_amount: format_money(stats.combined_total()),
            new_subscriptions: stats.new_subscriptions(),
            renewals: stats.renewals(),
            cancellations: stats.cancellations(),
            ended: stats.ended(),
            signup_total: format_money(stats.signup_total()),
            renewal_total: format_money(stats.renewal_total()),
        }
    }
}

/// The full report over JSON.
#[derive(Debug, Clone, Serialize)]
pub struct ReportResponse {
    pub start_date: String,
    pub end_date: String,
    pub rows: Vec<ReportRowResponse>,
}

impl From<&SubscriptionReport> for ReportResponse {
    fn from(report: &SubscriptionReport) -> Self {
        Self {
            start_date: report.range.start.format("%Y-%m-%d").to_string(),
            end_date: report.range.end.format("%Y-%m-%d").to_string(),
            rows: report.rows.iter().map(ReportRowResponse::from).collect(),
        }
    }
}

/// Report settings as shown to administrators.
#[derive(Debug, Clone, Serialize)]
pub struct ReportSettingsResponse {
    pub recipient_email: Option<String>,
    pub timezone: String,
    pub membership_plan_id: i64,
    pub max_range_months: u32,
}

impl From<ReportSettingsView> for ReportSettingsResponse {
    fn from(view: ReportSettingsView) -> Self {
        Self {
            recipient_email: view.recipient,
            timezone: view.timezone,
            membership_plan_id: view.membership_plan_id,
            max_range_months: view.max_range_months,
        }
    }
}

/// Response after the recipient was saved.
#[derive(Debug, Clone, Serialize)]
pub struct RecipientResponse {
    pub recipient_email: String,
}

impl From<EmailAddress> for RecipientResponse {
    fn from(email: EmailAddress) -> Self {
        Self {
            recipient_email: email.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::reporting::{
        compute_monthly_stats, DateRange, RecordSnapshot, ReportMonth,
    };
    use chrono::NaiveDate;

    fn empty_row(year: i32, month: u32) -> ReportRow {
        let month = ReportMonth::new(year, month).unwrap();
        let snapshot = RecordSnapshot::default();
        ReportRow {
            month,
            stats: compute_monthly_stats(&month.window(chrono_tz::UTC), &snapshot),
            club_members: 4,
        }
    }

    #[test]
    fn row_response_formats_money_and_month() {
        let response = ReportRowResponse::from(&empty_row(2025, 3));

        assert_eq!(response.month, "2025-03");
        assert_eq!(response.total_amount, "0.00");
        assert_eq!(response.signup_total, "0.00");
        assert_eq!(response.active_club_members, 4);
    }

    #[test]
    fn report_response_carries_range_bounds() {
        let report = SubscriptionReport {
            range: DateRange {
                start: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
                end: NaiveDate::from_ymd_opt(2025, 2, 28).unwrap(),
            },
            rows: vec![empty_row(2025, 1), empty_row(2025, 2)],
        };

        let json = serde_json::to_value(ReportResponse::from(&report)).unwrap();

        assert_eq!(json["start_date"], "2025-01-01");
        assert_eq!(json["end_date"], "2025-02-28");
        assert_eq!(json["rows"].as_array().unwrap().len(), 2);
        assert_eq!(json["rows"][1]["month"], "2025-02");
    }

    #[test]
    fn csv_params_default_to_full_layout() {
        let params: CsvQueryParams = serde_json::from_value(serde_json::json!({})).unwrap();
        assert_eq!(params.layout(), CsvLayout::Full);

        let params: CsvQueryParams =
            serde_json::from_value(serde_json::json!({"layout": "legacy"})).unwrap();
        assert_eq!(params.layout(), CsvLayout::Legacy);
    }

    #[test]
    fn settings_response_keeps_missing_recipient_as_null() {
        let view = ReportSettingsView {
            recipient: None,
            timezone: "UTC".to_string(),
            membership_plan_id: 13981,
            max_range_months: 120,
        };

        let json = serde_json::to_value(ReportSettingsResponse::from(view)).unwrap();

        assert!(json["recipient_email"].is_null());
        assert_eq!(json["membership_plan_id"], 13981);
    }
}
