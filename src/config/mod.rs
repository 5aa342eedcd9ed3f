//! Application configuration module
//!
//! Type-safe configuration loaded from environment variables with the
//! `config` and `dotenvy` crates. Variables use the `SUBSCRIPTION_SNAPSHOT`
//! prefix and `__` between nested keys.
//!
//! # Example
//!
//! ```no_run
//! use subscription_snapshot::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//! ```

mod auth;
mod database;
mod email;
mod error;
mod report;
mod server;

pub use auth::AuthConfig;
pub use database::DatabaseConfig;
pub use email::EmailConfig;
pub use error::{ConfigError, ValidationError};
pub use report::ReportConfig;
pub use server::{Environment, ServerConfig};

use serde::Deserialize;

/// Root application configuration
///
/// Load using [`AppConfig::load()`] which reads from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration (host, port, environment, logging)
    #[serde(default)]
    pub server: ServerConfig,

    /// Database configuration (PostgreSQL connection)
    pub database: DatabaseConfig,

    /// Authentication configuration (OIDC issuer)
    pub auth: AuthConfig,

    /// Email configuration (Resend)
    #[serde(default)]
    pub email: EmailConfig,

    /// Report parameters and scheduled delivery
    #[serde(default)]
    pub report: ReportConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `SUBSCRIPTION_SNAPSHOT` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `SUBSCRIPTION_SNAPSHOT__SERVER__PORT=8080` -> `server.port = 8080`
    /// - `SUBSCRIPTION_SNAPSHOT__REPORT__TIMEZONE=Europe/Berlin` -> `report.timezone`
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("SUBSCRIPTION_SNAPSHOT")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` for the first invalid value found.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.database.validate()?;
        self.auth.validate(&self.server.environment)?;
        self.email.validate(self.report.schedule_enabled)?;
        self.report.validate()?;
        Ok(())
    }

    /// Check if running in production environment
    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::Mutex;

    // Env vars are process-global; tests touching them run one at a time.
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    const VARS: [&str; 7] = [
        "SUBSCRIPTION_SNAPSHOT__DATABASE__URL",
        "SUBSCRIPTION_SNAPSHOT__AUTH__ISSUER_URL",
        "SUBSCRIPTION_SNAPSHOT__AUTH__AUDIENCE",
        "SUBSCRIPTION_SNAPSHOT__SERVER__ENVIRONMENT",
        "SUBSCRIPTION_SNAPSHOT__REPORT__TIMEZONE",
        "SUBSCRIPTION_SNAPSHOT__REPORT__SCHEDULE_ENABLED",
        "SUBSCRIPTION_SNAPSHOT__EMAIL__RESEND_API_KEY",
    ];

    fn set_minimal_env() {
        env::set_var("SUBSCRIPTION_SNAPSHOT__DATABASE__URL", "postgresql://test@localhost/shop");
        env::set_var("SUBSCRIPTION_SNAPSHOT__AUTH__ISSUER_URL", "https://auth.example.com");
        env::set_var("SUBSCRIPTION_SNAPSHOT__AUTH__AUDIENCE", "subscription-reports");
    }

    fn clear_env() {
        for var in VARS {
            env::remove_var(var);
        }
    }

    fn load_with(extra: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let _guard = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
        set_minimal_env();
        for (key, value) in extra {
            env::set_var(key, value);
        }
        let result = AppConfig::load();
        clear_env();
        result
    }

    #[test]
    fn test_load_from_environment() {
        let config = load_with(&[]).unwrap();
        assert_eq!(config.database.url, "postgresql://test@localhost/shop");
        assert_eq!(config.auth.audience, "subscription-reports");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_sections_fall_back_to_defaults() {
        let config = load_with(&[]).unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.environment, Environment::Development);
        assert_eq!(config.report.timezone, "UTC");
        assert!(config.email.resend_api_key.is_none());
    }

    #[test]
    fn test_report_timezone_from_environment() {
        let config = load_with(&[("SUBSCRIPTION_SNAPSHOT__REPORT__TIMEZONE", "Europe/Berlin")]).unwrap();
        assert_eq!(config.report.timezone().unwrap(), chrono_tz::Europe::Berlin);
    }

    #[test]
    fn test_schedule_requires_resend_key() {
        let config =
            load_with(&[("SUBSCRIPTION_SNAPSHOT__REPORT__SCHEDULE_ENABLED", "true")]).unwrap();
        assert!(config.report.schedule_enabled);
        assert_eq!(
            config.validate(),
            Err(ValidationError::MissingRequired("EMAIL__RESEND_API_KEY"))
        );
    }

    #[test]
    fn test_is_production() {
        let config =
            load_with(&[("SUBSCRIPTION_SNAPSHOT__SERVER__ENVIRONMENT", "production")]).unwrap();
        assert!(config.is_production());
    }
}
