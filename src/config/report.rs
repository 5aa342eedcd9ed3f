//! Report configuration

use chrono_tz::Tz;
use serde::Deserialize;

use super::error::ValidationError;
use crate::application::handlers::reporting::ReportSettings;
use crate::domain::foundation::MembershipPlanId;
use crate::domain::reporting::EmailAddress;

/// Report parameters and scheduled delivery settings.
#[derive(Debug, Clone, Deserialize)]
pub struct ReportConfig {
    /// IANA zone in which months start and end
    #[serde(default = "default_timezone")]
    pub timezone: String,

    /// Plan whose active members are counted as club members
    #[serde(default = "default_membership_plan_id")]
    pub membership_plan_id: i64,

    /// Initial report recipient; never overwrites a recipient saved via the API
    pub recipient_email: Option<String>,

    /// Longest range one report may span
    #[serde(default = "default_max_range_months")]
    pub max_range_months: u32,

    /// Send the report on the first of each month
    #[serde(default = "default_schedule_enabled")]
    pub schedule_enabled: bool,
}

impl ReportConfig {
    pub fn timezone(&self) -> Result<Tz, ValidationError> {
        self.timezone
            .trim()
            .parse::<Tz>()
            .map_err(|_| ValidationError::UnknownTimeZone(self.timezone.clone()))
    }

    pub fn membership_plan_id(&self) -> Result<MembershipPlanId, ValidationError> {
        MembershipPlanId::new(self.membership_plan_id)
            .map_err(|_| ValidationError::InvalidMembershipPlan)
    }

    /// Configured recipient, ignoring blank values.
    pub fn seed_recipient(&self) -> Option<&str> {
        self.recipient_email
            .as_deref()
            .map(str::trim)
            .filter(|raw| !raw.is_empty())
    }

    /// Resolves the settings handed to the reporting handlers.
    pub fn settings(&self) -> Result<ReportSettings, ValidationError> {
        Ok(ReportSettings::new(
            self.timezone()?,
            self.membership_plan_id()?,
            self.max_range_months,
        ))
    }

    /// Validate report configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.settings()?;
        if self.max_range_months == 0 || self.max_range_months > 1200 {
            return Err(ValidationError::InvalidRangeLimit);
        }
        if let Some(raw) = self.seed_recipient() {
            EmailAddress::parse(raw).map_err(|_| ValidationError::InvalidRecipientEmail)?;
        }
        Ok(())
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            timezone: default_timezone(),
            membership_plan_id: default_membership_plan_id(),
            recipient_email: None,
            max_range_months: default_max_range_months(),
            schedule_enabled: default_schedule_enabled(),
        }
    }
}

fn default_timezone() -> String {
    "UTC".to_string()
}

fn default_membership_plan_id() -> i64 {
    13981
}

fn default_max_range_months() -> u32 {
    120
}

fn default_schedule_enabled() -> bool {
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_config_defaults() {
        let config = ReportConfig::default();
        let settings = config.settings().unwrap();
        assert_eq!(settings.timezone, chrono_tz::UTC);
        assert_eq!(settings.membership_plan_id.as_i64(), 13981);
        assert_eq!(settings.max_range_months, 120);
        assert!(!config.schedule_enabled);
    }

    #[test]
    fn test_named_timezone_parses() {
        let config = ReportConfig {
            timezone: "America/New_York".to_string(),
            ..Default::default()
        };
        assert_eq!(config.timezone().unwrap(), chrono_tz::America::New_York);
    }

    #[test]
    fn test_unknown_timezone_is_rejected() {
        let config = ReportConfig {
            timezone: "Mars/Olympus".to_string(),
            ..Default::default()
        };
        assert_eq!(
            config.validate(),
            Err(ValidationError::UnknownTimeZone("Mars/Olympus".to_string()))
        );
    }

    #[test]
    fn test_range_limit_bounds() {
        let config = ReportConfig {
            max_range_months: 0,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ValidationError::InvalidRangeLimit));
    }

    #[test]
    fn test_blank_recipient_is_ignored() {
        let config = ReportConfig {
            recipient_email: Some("   ".to_string()),
            ..Default::default()
        };
        assert_eq!(config.seed_recipient(), None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_recipient_is_rejected() {
        let config = ReportConfig {
            recipient_email: Some("ops-at-example".to_string()),
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ValidationError::InvalidRecipientEmail));
    }

    #[test]
    fn test_non_positive_plan_is_rejected() {
        let config = ReportConfig {
            membership_plan_id: 0,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ValidationError::InvalidMembershipPlan));
    }
}
