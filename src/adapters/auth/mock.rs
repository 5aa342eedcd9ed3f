//! Mock session validator for testing.
//!
//! Avoids the need for a real identity provider in HTTP tests.
//!
//! # Example
//!
//! ```ignore
//! let validator = MockSessionValidator::new()
//!     .with_report_admin("admin-token", "admin-1")
//!     .with_test_user("viewer-token", "viewer-1");
//!
//! let admin = validator.validate("admin-token").await?;
//! assert!(admin.has_capability(Capability::ManageReports));
//! ```

use std::collections::HashMap;

use async_trait::async_trait;

use crate::domain::foundation::{AuthError, AuthenticatedUser, Capability, UserId};
use crate::ports::SessionValidator;

/// Maps fixed tokens to users. Unknown tokens return `InvalidToken`.
#[derive(Debug, Default)]
pub struct MockSessionValidator {
    tokens: HashMap<String, AuthenticatedUser>,
    /// Error returned for every validation when set.
    force_error: Option<AuthError>,
}

impl MockSessionValidator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a valid token that maps to `user`.
    pub fn with_user(mut self, token: impl Into<String>, user: AuthenticatedUser) -> Self {
        self.tokens.insert(token.into(), user);
        self
    }

    /// Adds a token for a user without any capabilities.
    ///
    /// An empty `user_id` adds nothing.
    pub fn with_test_user(self, token: impl Into<String>, user_id: impl Into<String>) -> Self {
        match test_user(user_id.into()) {
            Some(user) => self.with_user(token, user),
            None => self,
        }
    }

    /// Adds a token for a user holding `manage_reports`.
    pub fn with_report_admin(self, token: impl Into<String>, user_id: impl Into<String>) -> Self {
        match test_user(user_id.into()) {
            Some(user) => self.with_user(token, user.with_capability(Capability::ManageReports)),
            None => self,
        }
    }

    /// Forces all validations to return `error`.
    pub fn with_error(mut self, error: AuthError) -> Self {
        self.force_error = Some(error);
        self
    }

    pub fn token_count(&self) -> usize {
        self.tokens.len()
    }
}

fn test_user(user_id: String) -> Option<AuthenticatedUser> {
    let id = UserId::new(user_id.clone()).ok()?;
    Some(AuthenticatedUser::new(
        id,
        format!("{}@test.example.com", user_id),
        Some(format!("Test User {}", user_id)),
    ))
}

#[async_trait]
impl SessionValidator for MockSessionValidator {
    async fn validate(&self, token: &str) -> Result<AuthenticatedUser, AuthError> {
        if let Some(error) = &self.force_error {
            return Err(error.clone());
        }

        self.tokens.get(token).cloned().ok_or(AuthError::InvalidToken)
    }
}
