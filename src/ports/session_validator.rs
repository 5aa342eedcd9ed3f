//! Session validation port for bearer token validation.
//!
//! Defines the contract for validating access tokens and extracting the
//! caller's identity and capabilities. It is provider-agnostic: the OIDC
//! adapter validates JWTs against a JWKS endpoint, and a mock exists for
//! tests.
//!
//! All implementations MUST validate:
//! - **Issuer (iss)**: Token must come from the expected identity provider
//! - **Audience (aud)**: Token must be intended for this service
//! - **Expiry (exp)**: Token must not be expired

use async_trait::async_trait;

use crate::domain::foundation::{AuthError, AuthenticatedUser};

/// Validates access tokens and extracts user identity.
///
/// HTTP middleware uses this to validate Bearer tokens before any report
/// route runs.
///
/// # Contract
///
/// Implementations must:
/// - Validate the token signature
/// - Validate issuer, audience, and expiry claims
/// - Return `AuthError::InvalidToken` for malformed/bad signature tokens
/// - Return `AuthError::TokenExpired` for expired tokens
/// - Return `AuthError::ServiceUnavailable` for transient errors
#[async_trait]
pub trait SessionValidator: Send + Sync {
    /// Validate an access token (without the "Bearer " prefix) and return
    /// the authenticated user with the capabilities granted by its claims.
    async fn validate(&self, token: &str) -> Result<AuthenticatedUser, AuthError>;
}
