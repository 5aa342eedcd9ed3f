//! PostgreSQL adapters - Database implementations of the reporting ports.
//!
//! - `PostgresRecordSource` - Reads subscriptions, orders and memberships
//! - `PostgresReportSettingsStore` - Persists the report recipient

mod record_source;
mod report_settings_store;

pub use record_source::PostgresRecordSource;
pub use report_settings_store::PostgresReportSettingsStore;
