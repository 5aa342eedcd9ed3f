//! Assembled report rows.

use serde::Serialize;

use super::date_range::DateRange;
use super::month::ReportMonth;
use super::stats::MonthlyStats;

/// One month of the report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportRow {
    pub month: ReportMonth,
    pub stats: MonthlyStats,
    pub club_members: u64,
}

/// Rows for every month of a range, ascending by month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubscriptionReport {
    pub range: DateRange,
    pub rows: Vec<ReportRow>,
}

impl SubscriptionReport {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
