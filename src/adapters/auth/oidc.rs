//! OIDC adapter for JWT validation.
//!
//! Implements the `SessionValidator` port against any OpenID Connect
//! provider that publishes a JWKS. It validates JWTs by:
//!
//! 1. Fetching JWKS from the issuer's well-known endpoint (cached)
//! 2. Validating the JWT signature against the public keys
//! 3. Validating issuer, audience, and expiry claims
//! 4. Mapping claims, including the configured capability claim, to an
//!    `AuthenticatedUser`
//!
//! The capability claim may hold a JSON array of strings or a single
//! space-separated string. Unknown capability names are ignored.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use jsonwebtoken::{
    decode, decode_header, jwk::JwkSet, Algorithm, DecodingKey, TokenData, Validation,
};
use serde::Deserialize;
use tokio::sync::RwLock;

use crate::domain::foundation::{AuthError, AuthenticatedUser, Capability, UserId};
use crate::ports::SessionValidator;

const DEFAULT_JWKS_CACHE: Duration = Duration::from_secs(3600);

/// Configuration for the OIDC adapter.
#[derive(Debug, Clone)]
pub struct OidcConfig {
    /// The issuer URL, used for JWKS discovery and issuer validation.
    pub issuer_url: String,

    /// Expected audience claim in JWTs.
    pub audience: String,

    /// How long to cache JWKS before refetching. Defaults to 1 hour.
    pub jwks_cache_duration: Option<Duration>,

    /// Name of the claim listing the caller's capabilities.
    pub capability_claim: String,
}

impl OidcConfig {
    pub fn new(issuer_url: impl Into<String>, audience: impl Into<String>) -> Self {
        Self {
            issuer_url: issuer_url.into(),
            audience: audience.into(),
            jwks_cache_duration: None,
            capability_claim: "capabilities".to_string(),
        }
    }

    pub fn with_cache_duration(mut self, duration: Duration) -> Self {
        self.jwks_cache_duration = Some(duration);
        self
    }

    pub fn with_capability_claim(mut self, claim: impl Into<String>) -> Self {
        self.capability_claim = claim.into();
        self
    }

    fn jwks_url(&self) -> String {
        format!("{}/.well-known/jwks.json", self.issuer_url.trim_end_matches('/'))
    }
}

/// JWT claims read from provider tokens.
#[derive(Debug, Deserialize)]
struct OidcClaims {
    sub: String,

    iss: String,

    #[serde(default)]
    aud: Audience,

    #[serde(default)]
    email: Option<String>,

    #[serde(default)]
    name: Option<String>,

    #[serde(default)]
    preferred_username: Option<String>,

    /// Remaining claims; the capability claim is looked up here.
    #[serde(flatten)]
    extra: HashMap<String, serde_json::Value>,
}

/// Audience can be a single string or array of strings in JWTs.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(untagged)]
enum Audience {
    #[default]
    None,
    Single(String),
    Multiple(Vec<String>),
}

impl Audience {
    fn contains(&self, expected: &str) -> bool {
        match self {
            Audience::None => false,
            Audience::Single(s) => s == expected,
            Audience::Multiple(v) => v.iter().any(|s| s == expected),
        }
    }
}

/// Reads capabilities from a claim value.
fn parse_capabilities(value: Option<&serde_json::Value>) -> Vec<Capability> {
    let names: Vec<&str> = match value {
        Some(serde_json::Value::Array(items)) => items.iter().filter_map(|v| v.as_str()).collect(),
        Some(serde_json::Value::String(s)) => s.split_whitespace().collect(),
        _ => Vec::new(),
    };
    names.into_iter().filter_map(|name| name.parse().ok()).collect()
}

/// Maps validated claims to the domain user.
fn claims_to_user(claims: OidcClaims, capability_claim: &str) -> Result<AuthenticatedUser, AuthError> {
    let email = claims.email.ok_or_else(|| {
        tracing::warn!("Token missing email claim");
        AuthError::InvalidToken
    })?;

    let user_id = UserId::new(&claims.sub).map_err(|_| {
        tracing::warn!("Invalid user ID in token: {}", claims.sub);
        AuthError::InvalidToken
    })?;

    let capabilities = parse_capabilities(claims.extra.get(capability_claim));
    let user = capabilities.into_iter().fold(
        AuthenticatedUser::new(user_id, email, claims.name.or(claims.preferred_username)),
        AuthenticatedUser::with_capability,
    );
    Ok(user)
}

/// Cached JWKS with expiry tracking.
struct JwksCache {
    jwks: JwkSet,
    fetched_at: Instant,
    cache_duration: Duration,
}

impl JwksCache {
    fn new(jwks: JwkSet, cache_duration: Duration) -> Self {
        Self {
            jwks,
            fetched_at: Instant::now(),
            cache_duration,
        }
    }

    fn is_expired(&self) -> bool {
        self.fetched_at.elapsed() > self.cache_duration
    }
}

/// OIDC session validator.
///
/// Validates JWTs against the issuer's JWKS. This is the production
/// implementation of `SessionValidator`.
pub struct OidcSessionValidator {
    config: OidcConfig,
    http_client: reqwest::Client,
    jwks_cache: Arc<RwLock<Option<JwksCache>>>,
}

impl OidcSessionValidator {
    /// Creates a validator. Keys are fetched lazily on first validation.
    pub fn new(config: OidcConfig) -> Result<Self, AuthError> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| AuthError::service_unavailable(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            config,
            http_client,
            jwks_cache: Arc::new(RwLock::new(None)),
        })
    }

    async fn fetch_jwks(&self) -> Result<JwkSet, AuthError> {
        let url = self.config.jwks_url();
        tracing::debug!("Fetching JWKS from {}", url);

        let response = self.http_client.get(&url).send().await.map_err(|e| {
            tracing::error!("Failed to fetch JWKS: {}", e);
            AuthError::service_unavailable(format!("Failed to fetch JWKS: {}", e))
        })?;

        if !response.status().is_success() {
            let status = response.status();
            tracing::error!("JWKS endpoint returned {}", status);
            return Err(AuthError::service_unavailable(format!(
                "JWKS endpoint returned {}",
                status
            )));
        }

        let jwks: JwkSet = response.json().await.map_err(|e| {
            tracing::error!("Failed to parse JWKS: {}", e);
            AuthError::service_unavailable(format!("Failed to parse JWKS: {}", e))
        })?;

        tracing::debug!("Fetched {} keys from JWKS", jwks.keys.len());
        Ok(jwks)
    }

    async fn get_jwks(&self) -> Result<JwkSet, AuthError> {
        {
            let cache = self.jwks_cache.read().await;
            if let Some(ref cached) = *cache {
                if !cached.is_expired() {
                    return Ok(cached.jwks.clone());
                }
            }
        }

        let jwks = self.fetch_jwks().await?;

        {
            let mut cache = self.jwks_cache.write().await;
            let duration = self.config.jwks_cache_duration.unwrap_or(DEFAULT_JWKS_CACHE);
            *cache = Some(JwksCache::new(jwks.clone(), duration));
        }

        Ok(jwks)
    }

    fn find_decoding_key(
        &self,
        header: &jsonwebtoken::Header,
        jwks: &JwkSet,
    ) -> Result<(DecodingKey, Algorithm), AuthError> {
        let kid = header.kid.as_ref().ok_or_else(|| {
            tracing::warn!("JWT missing 'kid' header");
            AuthError::InvalidToken
        })?;

        let jwk = jwks.find(kid).ok_or_else(|| {
            tracing::warn!("No matching key found for kid: {}", kid);
            AuthError::InvalidToken
        })?;

        let algorithm = match jwk.common.key_algorithm {
            Some(jsonwebtoken::jwk::KeyAlgorithm::RS256) | None => Algorithm::RS256,
            Some(jsonwebtoken::jwk::KeyAlgorithm::RS384) => Algorithm::RS384,
            Some(jsonwebtoken::jwk::KeyAlgorithm::RS512) => Algorithm::RS512,
            Some(jsonwebtoken::jwk::KeyAlgorithm::ES256) => Algorithm::ES256,
            Some(jsonwebtoken::jwk::KeyAlgorithm::ES384) => Algorithm::ES384,
            Some(other) => {
                tracing::warn!("Unsupported algorithm: {:?}", other);
                return Err(AuthError::InvalidToken);
            }
        };

        let decoding_key = DecodingKey::from_jwk(jwk).map_err(|e| {
            tracing::warn!("Failed to create decoding key: {}", e);
            AuthError::InvalidToken
        })?;

        Ok((decoding_key, algorithm))
    }

    fn validate_token(
        &self,
        token: &str,
        decoding_key: &DecodingKey,
        algorithm: Algorithm,
    ) -> Result<TokenData<OidcClaims>, AuthError> {
        let mut validation = Validation::new(algorithm);
        validation.set_issuer(&[&self.config.issuer_url]);
        validation.set_audience(&[&self.config.audience]);
        validation.validate_exp = true;
        validation.set_required_spec_claims(&["exp", "iss", "sub"]);

        decode::<OidcClaims>(token, decoding_key, &validation).map_err(|e| {
            use jsonwebtoken::errors::ErrorKind;
            match e.kind() {
                ErrorKind::ExpiredSignature => {
                    tracing::debug!("Token expired");
                    AuthError::TokenExpired
                }
                ErrorKind::InvalidIssuer | ErrorKind::InvalidAudience => {
                    tracing::warn!("Token issued for another issuer or audience: {}", e);
                    AuthError::InvalidToken
                }
                _ => {
                    tracing::warn!("Token validation failed: {}", e);
                    AuthError::InvalidToken
                }
            }
        })
    }
}

#[async_trait]
impl SessionValidator for OidcSessionValidator {
    async fn validate(&self, token: &str) -> Result<AuthenticatedUser, AuthError> {
        let header = decode_header(token).map_err(|e| {
            tracing::debug!("Failed to decode JWT header: {}", e);
            AuthError::InvalidToken
        })?;

        let jwks = self.get_jwks().await?;
        let (decoding_key, algorithm) = self.find_decoding_key(&header, &jwks)?;
        let claims = self.validate_token(token, &decoding_key, algorithm)?.claims;

        if claims.iss != self.config.issuer_url || !claims.aud.contains(&self.config.audience) {
            tracing::warn!(issuer = %claims.iss, "Issuer or audience mismatch after validation");
            return Err(AuthError::InvalidToken);
        }

        claims_to_user(claims, &self.config.capability_claim)
    }
}

impl std::fmt::Debug for OidcSessionValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OidcSessionValidator")
            .field("issuer_url", &self.config.issuer_url)
            .field("audience", &self.config.audience)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn claims(extra: serde_json::Value) -> OidcClaims {
        let mut value = json!({
            "sub": "user-42",
            "iss": "https://auth.example.com",
            "aud": "reports-api",
            "exp": 4_000_000_000i64,
            "email": "admin@example.com",
            "name": "Report Admin",
        });
        if let (Some(base), Some(more)) = (value.as_object_mut(), extra.as_object()) {
            base.extend(more.clone());
        }
        serde_json::from_value(value).unwrap()
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Configuration Tests
    // ════════════════════════════════════════════════════════════════════════════

    #[test]
    fn config_builds_jwks_url_without_double_slash() {
        let config = OidcConfig::new("https://auth.example.com/", "reports-api");
        assert_eq!(config.jwks_url(), "https://auth.example.com/.well-known/jwks.json");
    }

    #[test]
    fn config_defaults_capability_claim() {
        let config = OidcConfig::new("https://auth.example.com", "reports-api");
        assert_eq!(config.capability_claim, "capabilities");
        assert_eq!(config.with_capability_claim("roles").capability_claim, "roles");
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Claim Mapping Tests
    // ════════════════════════════════════════════════════════════════════════════

    #[test]
    fn capability_array_grants_manage_reports() {
        let user = claims_to_user(
            claims(json!({ "capabilities": ["manage_reports", "something_else"] })),
            "capabilities",
        )
        .unwrap();

        assert_eq!(user.id.as_str(), "user-42");
        assert!(user.has_capability(Capability::ManageReports));
        assert_eq!(user.capabilities.len(), 1);
    }

    #[test]
    fn space_separated_capability_string_is_accepted() {
        let user = claims_to_user(claims(json!({ "scope": "openid manage_reports" })), "scope").unwrap();
        assert!(user.has_capability(Capability::ManageReports));
    }

    #[test]
    fn missing_capability_claim_grants_nothing() {
        let user = claims_to_user(claims(json!({})), "capabilities").unwrap();
        assert!(!user.has_capability(Capability::ManageReports));
    }

    #[test]
    fn missing_email_is_invalid_token() {
        let mut c = claims(json!({}));
        c.email = None;
        assert!(matches!(claims_to_user(c, "capabilities"), Err(AuthError::InvalidToken)));
    }

    #[test]
    fn audience_variants() {
        assert!(Audience::Single("a".to_string()).contains("a"));
        assert!(Audience::Multiple(vec!["a".to_string(), "b".to_string()]).contains("b"));
        assert!(!Audience::None.contains("a"));
    }

    #[test]
    fn jwks_cache_expires_after_duration() {
        let cache = JwksCache::new(JwkSet { keys: vec![] }, Duration::from_millis(1));
        std::thread::sleep(Duration::from_millis(10));
        assert!(cache.is_expired());
    }

    #[tokio::test]
    async fn garbage_token_is_rejected_before_fetching_keys() {
        let validator =
            OidcSessionValidator::new(OidcConfig::new("http://127.0.0.1:9", "reports-api")).unwrap();

        let result = validator.validate("not-a-jwt").await;

        assert!(matches!(result, Err(AuthError::InvalidToken)));
    }
}
