//! UpdateRecipientHandler - Command handler for the report recipient.

use std::sync::Arc;

use crate::domain::reporting::{EmailAddress, ReportError};
use crate::ports::ReportSettingsStore;

/// Command to replace the monthly report recipient.
#[derive(Debug, Clone)]
pub struct UpdateRecipientCommand {
    pub email: String,
}

/// Result of updating the recipient: the normalized stored address.
pub type UpdateRecipientResult = EmailAddress;

/// Validates and stores the recipient address.
///
/// Invalid input is rejected and nothing is written.
pub struct UpdateRecipientHandler {
    store: Arc<dyn ReportSettingsStore>,
}

impl UpdateRecipientHandler {
    pub fn new(store: Arc<dyn ReportSettingsStore>) -> Self {
        Self { store }
    }

    pub async fn handle(&self, cmd: UpdateRecipientCommand) -> Result<UpdateRecipientResult, ReportError> {
        let email = EmailAddress::parse(&cmd.email)
            .map_err(|e| ReportError::invalid_recipient(e.to_string()))?;

        self.store.set_recipient(&email).await?;
        tracing::info!(recipient = %email, "Report recipient updated");

        Ok(email)
    }
}
