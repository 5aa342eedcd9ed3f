//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `auth` - OIDC token validation and a mock validator
//! - `email` - Resend mail transport and a recording mailer
//! - `export` - CSV and HTML rendering of reports
//! - `http` - axum routes, middleware and error mapping
//! - `memory` - in-memory record source and settings store
//! - `postgres` - PostgreSQL record source and settings store
//! - `scheduler` - monthly report delivery loop

pub mod auth;
pub mod email;
pub mod export;
pub mod http;
pub mod memory;
pub mod postgres;
pub mod scheduler;

pub use auth::{MockSessionValidator, OidcConfig, OidcSessionValidator};
pub use email::{RecordingMailer, ResendConfig, ResendMailer};
pub use export::TabularReportExporter;
pub use memory::{InMemoryRecordSource, InMemoryReportSettingsStore};
pub use postgres::{PostgresRecordSource, PostgresReportSettingsStore};
pub use scheduler::MonthlyReportScheduler;
