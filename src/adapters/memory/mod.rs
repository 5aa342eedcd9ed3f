//! In-memory adapters for tests and database-less local runs.

mod record_source;
mod settings_store;

pub use record_source::InMemoryRecordSource;
pub use settings_store::InMemoryReportSettingsStore;
