//! ExportReportHandler - Query handler for CSV and HTML exports.

use std::sync::Arc;

use super::generate_report::{GenerateReportHandler, GenerateReportQuery};
use crate::domain::reporting::ReportError;
use crate::ports::{CsvLayout, ReportExporter, CSV_CONTENT_TYPE, CSV_FILENAME};

/// MIME type of the HTML table view.
pub const HTML_CONTENT_TYPE: &str = "text/html; charset=utf-8";

/// Output format of an export.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv(CsvLayout),
    Html,
}

/// Query to export a report.
#[derive(Debug, Clone)]
pub struct ExportReportQuery {
    pub range: GenerateReportQuery,
    pub format: ExportFormat,
}

/// A rendered export ready to be returned to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedReport {
    pub content_type: &'static str,
    /// Download file name; `None` for inline views.
    pub filename: Option<&'static str>,
    pub body: Vec<u8>,
}

/// Result type for the export query.
pub type ExportReportResult = ExportedReport;

/// Handler that generates a report and renders it in the requested format.
pub struct ExportReportHandler {
    generator: Arc<GenerateReportHandler>,
    exporter: Arc<dyn ReportExporter>,
}

impl ExportReportHandler {
    pub fn new(generator: Arc<GenerateReportHandler>, exporter: Arc<dyn ReportExporter>) -> Self {
        Self { generator, exporter }
    }

    pub async fn handle(&self, query: ExportReportQuery) -> Result<ExportReportResult, ReportError> {
        let report = self.generator.handle(query.range).await?;

        match query.format {
            ExportFormat::Csv(layout) => {
                let body = self
                    .exporter
                    .to_csv(&report, layout)
                    .map_err(|e| ReportError::infrastructure(e.to_string()))?;
                Ok(ExportedReport {
                    content_type: CSV_CONTENT_TYPE,
                    filename: Some(CSV_FILENAME),
                    body,
                })
            }
            ExportFormat::Html => Ok(ExportedReport {
                content_type: HTML_CONTENT_TYPE,
                filename: None,
                body: self.exporter.to_html(&report).into_bytes(),
            }),
        }
    }
}
