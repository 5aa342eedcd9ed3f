//! CSV and HTML table rendering of subscription reports.
//!
//! Implements the `ReportExporter` port. CSV is written with the `csv`
//! crate so that money values containing `,` separators are quoted.

use crate::domain::reporting::{format_money, ReportRow, SubscriptionReport};
use crate::ports::{CsvLayout, ExportError, ReportExporter};

/// Column headers of the full layout, in output order.
pub const FULL_HEADERS: [&str; 11] = [
    "Month",
    "Active Subscriptions",
    "Pending Cancel",
    "Active CT Club Members",
    "Total Amount",
    "New Subs",
    "Renewals",
    "Cancellations",
    "Ended",
    "Signup Total",
    "Renewal Total",
];

/// Column headers of the legacy layout.
pub const LEGACY_HEADERS: [&str; 3] = ["Month", "Active Subscriptions", "Pending Cancel"];

/// Renders reports as CSV or an HTML table.
#[derive(Debug, Clone, Copy, Default)]
pub struct TabularReportExporter;

impl TabularReportExporter {
    pub fn new() -> Self {
        Self
    }
}

fn full_cells(row: &ReportRow) -> Vec<String> {
    let stats = &row.stats;
    vec![
        row.month.to_string(),
        stats.active().to_string(),
        stats.pending_cancel().to_string(),
        row.club_members.to_string(),
        format_money(stats.combined_total()),
        stats.new_subscriptions().to_string(),
        stats.renewals().to_string(),
        stats.cancellations().to_string(),
        stats.ended().to_string(),
        format_money(stats.signup_total()),
        format_money(stats.renewal_total()),
    ]
}

fn legacy_cells(row: &ReportRow) -> Vec<String> {
    vec![
        row.month.to_string(),
        row.stats.active().to_string(),
        row.stats.pending_cancel().to_string(),
    ]
}

impl ReportExporter for TabularReportExporter {
    fn to_csv(&self, report: &SubscriptionReport, layout: CsvLayout) -> Result<Vec<u8>, ExportError> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        let csv_err = |e: csv::Error| ExportError::Csv(e.to_string());

        match layout {
            CsvLayout::Full => writer.write_record(FULL_HEADERS).map_err(csv_err)?,
            CsvLayout::Legacy => writer.write_record(LEGACY_HEADERS).map_err(csv_err)?,
        }
        for row in &report.rows {
            let cells = match layout {
                CsvLayout::Full => full_cells(row),
                CsvLayout::Legacy => legacy_cells(row),
            };
            writer.write_record(&cells).map_err(csv_err)?;
        }

        writer
            .into_inner()
            .map_err(|e| ExportError::Csv(e.error().to_string()))
    }

    fn to_html(&self, report: &SubscriptionReport) -> String {
        let mut html = String::from("<table>\n");

        html.push_str("<thead><tr>");
        for header in FULL_HEADERS {
            html.push_str(&format!("<th>{}</th>", html_escape(header)));
        }
        html.push_str("</tr></thead>\n<tbody>\n");

        for row in &report.rows {
            html.push_str("<tr>");
            for cell in full_cells(row) {
                html.push_str(&format!("<td>{}</td>", html_escape(&cell)));
            }
            html.push_str("</tr>\n");
        }

        html.push_str("</tbody>\n</table>\n");
        html
    }
}

/// Escape HTML special characters.
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::reporting::{
        compute_monthly_stats, DateRange, Order, RecordSnapshot, ReportMonth, Subscription,
        SubscriptionStatus,
    };
    use crate::domain::foundation::{CustomerId, OrderId, SubscriptionId, Timestamp};
    use chrono::{NaiveDate, TimeZone, Utc};
    use chrono_tz::Tz;

    fn at(y: i32, m: u32, d: u32) -> Timestamp {
        Timestamp::from_datetime(Utc.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap())
    }

    /// Two months; January carries a 1,234.50 signup.
    fn sample_report() -> SubscriptionReport {
        let subscription = Subscription {
            id: SubscriptionId::new(1).unwrap(),
            status: SubscriptionStatus::Active,
            customer_id: CustomerId::new(7).unwrap(),
            starts_at: at(2025, 1, 10),
            next_payment_at: None,
            ends_at: None,
            cancelled_at: None,
            parent_order_id: Some(OrderId::new(9).unwrap()),
            renewal_order_ids: vec![],
        };
        let order = Order::new(OrderId::new(9).unwrap(), "1234.5".parse().unwrap(), at(2025, 1, 10)).unwrap();
        let snapshot = RecordSnapshot::from_records(vec![subscription], vec![order], vec![]);

        let rows = [ReportMonth::new(2025, 1).unwrap(), ReportMonth::new(2025, 2).unwrap()]
            .into_iter()
            .map(|month| ReportRow {
                month,
                stats: compute_monthly_stats(&month.window(Tz::UTC), &snapshot),
                club_members: 3,
            })
            .collect();
        SubscriptionReport {
            range: DateRange::new(
                NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
                NaiveDate::from_ymd_opt(2025, 2, 28).unwrap(),
                120,
            )
            .unwrap(),
            rows,
        }
    }

    #[test]
    fn full_csv_has_header_and_quoted_money() {
        let csv = TabularReportExporter::new()
            .to_csv(&sample_report(), CsvLayout::Full)
            .unwrap();
        let text = String::from_utf8(csv).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 3);
        assert_eq!(
            lines[0],
            "Month,Active Subscriptions,Pending Cancel,Active CT Club Members,Total Amount,\
New Subs,Renewals,Cancellations,Ended,Signup Total,Renewal Total"
        );
        assert_eq!(lines[1], "2025-01,1,0,3,\"1,234.50\",1,0,0,0,\"1,234.50\",0.00");
        assert_eq!(lines[2], "2025-02,1,0,3,0.00,0,0,0,0,0.00,0.00");
    }

    #[test]
    fn legacy_csv_has_three_columns() {
        let csv = TabularReportExporter::new()
            .to_csv(&sample_report(), CsvLayout::Legacy)
            .unwrap();
        let text = String::from_utf8(csv).unwrap();

        assert_eq!(
            text.lines().collect::<Vec<_>>(),
            vec!["Month,Active Subscriptions,Pending Cancel", "2025-01,1,0", "2025-02,1,0"]
        );
    }

    #[test]
    fn empty_report_is_header_only() {
        let mut report = sample_report();
        report.rows.clear();

        let csv = TabularReportExporter::new().to_csv(&report, CsvLayout::Full).unwrap();

        assert_eq!(String::from_utf8(csv).unwrap().lines().count(), 1);
    }

    #[test]
    fn html_table_lists_every_column_and_row() {
        let html = TabularReportExporter::new().to_html(&sample_report());

        assert!(html.starts_with("<table>"));
        assert_eq!(html.matches("<th>").count(), 11);
        assert_eq!(html.matches("<tr>").count(), 3);
        assert!(html.contains("<td>1,234.50</td>"));
    }

    #[test]
    fn html_escape_escapes_special_chars() {
        assert_eq!(html_escape("<b>\"x\" & 'y'</b>"), "&lt;b&gt;&quot;x&quot; &amp; &#39;y&#39;&lt;/b&gt;");
    }
}
