//! In-memory report settings store.

use std::sync::RwLock;

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, ErrorCode};
use crate::domain::reporting::EmailAddress;
use crate::ports::ReportSettingsStore;

/// Settings store that lives for the lifetime of the process.
///
/// Seeded from `report.recipient_email` when no database is configured.
#[derive(Debug, Default)]
pub struct InMemoryReportSettingsStore {
    recipient: RwLock<Option<String>>,
}

impl InMemoryReportSettingsStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the store with a raw, unvalidated recipient.
    pub fn with_recipient(raw: impl Into<String>) -> Self {
        Self {
            recipient: RwLock::new(Some(raw.into())),
        }
    }
}

fn poisoned() -> DomainError {
    DomainError::new(ErrorCode::InternalError, "Settings lock poisoned")
}

#[async_trait]
impl ReportSettingsStore for InMemoryReportSettingsStore {
    async fn get_recipient(&self) -> Result<Option<String>, DomainError> {
        Ok(self.recipient.read().map_err(|_| poisoned())?.clone())
    }

    async fn set_recipient(&self, email: &EmailAddress) -> Result<(), DomainError> {
        *self.recipient.write().map_err(|_| poisoned())? = Some(email.to_string());
        Ok(())
    }
}
