//! Report settings port.
//!
//! Persists the single administrator-configured recipient of the monthly
//! report email.

use async_trait::async_trait;

use crate::domain::foundation::DomainError;
use crate::domain::reporting::EmailAddress;

/// Storage for report delivery settings.
#[async_trait]
pub trait ReportSettingsStore: Send + Sync {
    /// The stored recipient, exactly as saved.
    ///
    /// Returns the raw text because values written by other tools are not
    /// guaranteed to be valid; callers validate before use.
    async fn get_recipient(&self) -> Result<Option<String>, DomainError>;

    /// Replaces the stored recipient.
    async fn set_recipient(&self, email: &EmailAddress) -> Result<(), DomainError>;
}
