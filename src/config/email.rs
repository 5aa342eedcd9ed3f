//! Email configuration

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use super::error::ValidationError;

/// Email configuration (Resend)
#[derive(Debug, Clone, Deserialize)]
pub struct EmailConfig {
    /// Resend API key; required only when scheduled delivery is enabled
    pub resend_api_key: Option<SecretString>,

    /// From email address
    #[serde(default = "default_from_email")]
    pub from_email: String,

    /// From name
    #[serde(default = "default_from_name")]
    pub from_name: String,

    /// Resend API base URL
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
}

impl EmailConfig {
    /// Get formatted "From" header value
    pub fn from_header(&self) -> String {
        format!("{} <{}>", self.from_name, self.from_email)
    }

    /// Validate email configuration
    ///
    /// The API key is checked only when `delivery_enabled` is set.
    pub fn validate(&self, delivery_enabled: bool) -> Result<(), ValidationError> {
        if delivery_enabled {
            let key = self
                .resend_api_key
                .as_ref()
                .map(|k| k.expose_secret().as_str())
                .unwrap_or_default();
            if key.is_empty() {
                return Err(ValidationError::MissingRequired("EMAIL__RESEND_API_KEY"));
            }
            if !key.starts_with("re_") {
                return Err(ValidationError::InvalidResendKey);
            }
        }
        if !self.from_email.contains('@') {
            return Err(ValidationError::InvalidFromEmail);
        }
        Ok(())
    }
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            resend_api_key: None,
            from_email: default_from_email(),
            from_name: default_from_name(),
            api_base_url: default_api_base_url(),
        }
    }
}

fn default_from_email() -> String {
    "reports@example.com".to_string()
}

fn default_from_name() -> String {
    "Subscription Reports".to_string()
}

fn default_api_base_url() -> String {
    "https://api.resend.com".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_key(key: &str) -> EmailConfig {
        EmailConfig {
            resend_api_key: Some(SecretString::new(key.to_string())),
            ..Default::default()
        }
    }

    #[test]
    fn test_email_config_defaults() {
        let config = EmailConfig::default();
        assert!(config.resend_api_key.is_none());
        assert_eq!(config.api_base_url, "https://api.resend.com");
    }

    #[test]
    fn test_from_header() {
        let config = EmailConfig {
            from_email: "ops@example.com".to_string(),
            from_name: "Ops".to_string(),
            ..Default::default()
        };
        assert_eq!(config.from_header(), "Ops <ops@example.com>");
    }

    #[test]
    fn test_key_not_required_without_delivery() {
        assert!(EmailConfig::default().validate(false).is_ok());
    }

    #[test]
    fn test_key_required_for_delivery() {
        assert_eq!(
            EmailConfig::default().validate(true),
            Err(ValidationError::MissingRequired("EMAIL__RESEND_API_KEY"))
        );
        assert_eq!(with_key("sk_xxx").validate(true), Err(ValidationError::InvalidResendKey));
        assert!(with_key("re_xxx").validate(true).is_ok());
    }

    #[test]
    fn test_invalid_from_email() {
        let config = EmailConfig {
            from_email: "reports".to_string(),
            ..with_key("re_xxx")
        };
        assert_eq!(config.validate(true), Err(ValidationError::InvalidFromEmail));
    }

    #[test]
    fn test_api_key_is_redacted_in_debug() {
        let debug = format!("{:?}", with_key("re_super_secret"));
        assert!(!debug.contains("re_super_secret"));
    }
}
