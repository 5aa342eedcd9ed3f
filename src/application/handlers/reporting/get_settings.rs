//! GetReportSettingsHandler - Query handler for report settings.

use std::sync::Arc;

use serde::Serialize;

use super::settings::ReportSettings;
use crate::domain::reporting::ReportError;
use crate::ports::ReportSettingsStore;

/// Query for the current report settings.
#[derive(Debug, Clone)]
pub struct GetReportSettingsQuery;

/// Settings as shown to report administrators.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportSettingsView {
    /// Stored recipient, `None` when unset.
    pub recipient: Option<String>,
    pub timezone: String,
    pub membership_plan_id: i64,
    pub max_range_months: u32,
}

/// Result type for the settings query.
pub type GetReportSettingsResult = ReportSettingsView;

pub struct GetReportSettingsHandler {
    store: Arc<dyn ReportSettingsStore>,
    settings: ReportSettings,
}

impl GetReportSettingsHandler {
    pub fn new(store: Arc<dyn ReportSettingsStore>, settings: ReportSettings) -> Self {
        Self { store, settings }
    }

    pub async fn handle(&self, _query: GetReportSettingsQuery) -> Result<GetReportSettingsResult, ReportError> {
        let recipient = self.store.get_recipient().await?;
        Ok(ReportSettingsView {
            recipient,
            timezone: self.settings.timezone.name().to_string(),
            membership_plan_id: self.settings.membership_plan_id.as_i64(),
            max_range_months: self.settings.max_range_months,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryReportSettingsStore;
    use crate::domain::foundation::MembershipPlanId;

    #[tokio::test]
    async fn returns_recipient_and_configuration() {
        let store = Arc::new(InMemoryReportSettingsStore::with_recipient("ops@example.com"));
        let settings = ReportSettings::new(
            chrono_tz::America::New_York,
            MembershipPlanId::new(13981).unwrap(),
            60,
        );

        let view = GetReportSettingsHandler::new(store, settings)
            .handle(GetReportSettingsQuery)
            .await
            .unwrap();

        assert_eq!(view.recipient.as_deref(), Some("ops@example.com"));
        assert_eq!(view.timezone, "America/New_York");
        assert_eq!(view.membership_plan_id, 13981);
        assert_eq!(view.max_range_months, 60);
    }

    #[tokio::test]
    async fn unset_recipient_is_none() {
        let settings = ReportSettings::new(chrono_tz::Tz::UTC, MembershipPlanId::new(1).unwrap(), 120);

        let view = GetReportSettingsHandler::new(Arc::new(InMemoryReportSettingsStore::new()), settings)
            .handle(GetReportSettingsQuery)
            .await
            .unwrap();

        assert_eq!(view.recipient, None);
    }
}
