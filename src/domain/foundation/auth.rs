//! Authentication types for the domain layer.
//!
//! These types represent an authenticated caller extracted from a bearer
//! token. They have **no external dependencies**: any identity provider can
//! populate them via the `SessionValidator` port.
//!
//! Report viewing, export and configuration all require the
//! [`Capability::ManageReports`] capability.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use super::UserId;
use thiserror::Error;

/// A permission granted to a caller by the identity provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Capability {
    /// View and export subscription reports, and change report settings.
    ManageReports,
}

impl Capability {
    /// Claim value used by identity providers for this capability.
    pub fn as_str(&self) -> &'static str {
        match self {
            Capability::ManageReports => "manage_reports",
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Capability {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "manage_reports" => Ok(Capability::ManageReports),
            _ => Err(()),
        }
    }
}

/// Authenticated caller extracted from a validated token.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    /// The unique user identifier from the auth provider.
    pub id: UserId,

    /// User's email address from the token claims.
    pub email: String,

    /// Display name if available.
    pub display_name: Option<String>,

    /// Capabilities granted to this user.
    pub capabilities: BTreeSet<Capability>,
}

impl AuthenticatedUser {
    /// Creates a new authenticated user with no capabilities.
    pub fn new(id: UserId, email: impl Into<String>, display_name: Option<String>) -> Self {
        Self {
            id,
            email: email.into(),
            display_name,
            capabilities: BTreeSet::new(),
        }
    }

    /// Grants a capability.
    pub fn with_capability(mut self, capability: Capability) -> Self {
        self.capabilities.insert(capability);
        self
    }

    /// Returns true if the user holds `capability`.
    pub fn has_capability(&self, capability: Capability) -> bool {
        self.capabilities.contains(&capability)
    }

    /// Fails with `InsufficientPermissions` unless the user holds `capability`.
    pub fn require(&self, capability: Capability) -> Result<(), AuthError> {
        if self.has_capability(capability) {
            Ok(())
        } else {
            Err(AuthError::InsufficientPermissions)
        }
    }
}

/// Authentication errors that can occur during token validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// The token is missing, malformed, or has an invalid signature.
    #[error("Invalid or expired token")]
    InvalidToken,

    /// The token has expired.
    #[error("Token expired")]
    TokenExpired,

    /// User exists but lacks required permissions for this action.
    #[error("Insufficient permissions")]
    InsufficientPermissions,

    /// The authentication service is unavailable (network, config, etc.).
    #[error("Auth service unavailable: {0}")]
    ServiceUnavailable(String),
}

impl AuthError {
    /// Creates a service unavailable error with a message.
    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::ServiceUnavailable(message.into())
    }

    /// Returns true if this is a transient error that may succeed on retry.
    pub fn is_transient(&self) -> bool {
        matches!(self, AuthError::ServiceUnavailable(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_user() -> AuthenticatedUser {
        AuthenticatedUser::new(
            UserId::new("user-123").unwrap(),
            "shop@example.com",
            Some("Shop Manager".to_string()),
        )
    }

    #[test]
    fn new_user_has_no_capabilities() {
        let user = test_user();
        assert!(!user.has_capability(Capability::ManageReports));
        assert_eq!(
            user.require(Capability::ManageReports),
            Err(AuthError::InsufficientPermissions)
        );
    }

    #[test]
    fn granted_capability_passes_require() {
        let user = test_user().with_capability(Capability::ManageReports);
        assert!(user.require(Capability::ManageReports).is_ok());
    }

    #[test]
    fn capability_parses_claim_value() {
        assert_eq!("manage_reports".parse(), Ok(Capability::ManageReports));
        assert!("manage_orders".parse::<Capability>().is_err());
        assert_eq!(Capability::ManageReports.to_string(), "manage_reports");
    }

    #[test]
    fn auth_error_is_transient_for_service_errors() {
        assert!(AuthError::service_unavailable("timeout").is_transient());
        assert!(!AuthError::InvalidToken.is_transient());
        assert_eq!(
            AuthError::service_unavailable("Connection refused").to_string(),
            "Auth service unavailable: Connection refused"
        );
    }
}
