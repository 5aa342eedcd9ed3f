//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! - `RecordSource` - Read access to subscriptions, orders and memberships
//! - `ReportSettingsStore` - Persisted report recipient
//! - `ReportExporter` - CSV and HTML rendering of assembled reports
//! - `ReportMailer` - Outbound delivery of the monthly report email
//! - `SessionValidator` - Bearer token validation for the HTTP surface

mod record_source;
mod report_exporter;
mod report_mailer;
mod report_settings_store;
mod session_validator;

pub use record_source::RecordSource;
pub use report_exporter::{CsvLayout, ExportError, ReportExporter, CSV_CONTENT_TYPE, CSV_FILENAME};
pub use report_mailer::{Attachment, MailError, ReportEmail, ReportMailer};
pub use report_settings_store::ReportSettingsStore;
pub use session_validator::SessionValidator;
