//! Authentication configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;
use super::server::Environment;

/// OIDC provider settings used to validate bearer tokens.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// Issuer URL; JWKS are fetched from `{issuer_url}/.well-known/jwks.json`
    pub issuer_url: String,

    /// Expected audience for tokens
    pub audience: String,

    /// JWKS cache TTL in seconds
    #[serde(default = "default_jwks_cache_ttl")]
    pub jwks_cache_ttl_secs: u64,

    /// Claim listing the caller's capabilities
    #[serde(default = "default_capability_claim")]
    pub capability_claim: String,
}

impl AuthConfig {
    /// Get JWKS cache TTL as Duration
    pub fn jwks_cache_ttl(&self) -> Duration {
        Duration::from_secs(self.jwks_cache_ttl_secs)
    }

    /// Validate authentication configuration
    ///
    /// In production the issuer must be served over HTTPS.
    pub fn validate(&self, environment: &Environment) -> Result<(), ValidationError> {
        if self.issuer_url.is_empty() {
            return Err(ValidationError::MissingRequired("AUTH__ISSUER_URL"));
        }
        if self.audience.is_empty() {
            return Err(ValidationError::MissingRequired("AUTH__AUDIENCE"));
        }
        if self.capability_claim.trim().is_empty() {
            return Err(ValidationError::MissingRequired("AUTH__CAPABILITY_CLAIM"));
        }
        if *environment == Environment::Production && !self.issuer_url.starts_with("https://") {
            return Err(ValidationError::IssuerMustBeHttps);
        }
        Ok(())
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            issuer_url: String::new(),
            audience: String::new(),
            jwks_cache_ttl_secs: default_jwks_cache_ttl(),
            capability_claim: default_capability_claim(),
        }
    }
}

fn default_jwks_cache_ttl() -> u64 {
    3600
}

fn default_capability_claim() -> String {
    "capabilities".to_string()
}
