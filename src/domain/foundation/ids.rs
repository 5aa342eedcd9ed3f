//! Strongly-typed identifier value objects.
//!
//! The record store keys every entity by a positive integer, so these wrap
//! `i64` rather than UUIDs.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::ValidationError;

macro_rules! record_id {
    ($(#[$meta:meta])* $name:ident, $field:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            /// Creates an identifier, rejecting zero and negative values.
            pub fn new(id: i64) -> Result<Self, ValidationError> {
                if id <= 0 {
                    return Err(ValidationError::out_of_range($field, 1, i32::MAX, id.clamp(i64::from(i32::MIN), 0) as i32));
                }
                Ok(Self(id))
            }

            /// Returns the raw key.
            pub fn as_i64(&self) -> i64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = ValidationError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let raw = s
                    .trim()
                    .parse::<i64>()
                    .map_err(|e| ValidationError::invalid_format($field, e.to_string()))?;
                Self::new(raw)
            }
        }
    };
}

record_id!(
    /// Identifier of a subscription record.
    SubscriptionId,
    "subscription_id"
);

record_id!(
    /// Identifier of a signup or renewal order.
    OrderId,
    "order_id"
);

record_id!(
    /// Identifier of a club membership record.
    MembershipId,
    "membership_id"
);

record_id!(
    /// Identifier of the customer owning subscriptions and memberships.
    CustomerId,
    "customer_id"
);

record_id!(
    /// Identifier of the membership plan that groups memberships.
    MembershipPlanId,
    "membership_plan_id"
);

/// Identifier of an authenticated user from the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    /// Creates a new UserId, returning error if empty.
    pub fn new(id: impl Into<String>) -> Result<Self, ValidationError> {
        let id = id.into();
        if id.is_empty() {
            return Err(ValidationError::empty_field("user_id"));
        }
        Ok(Self(id))
    }

    /// Returns the inner string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subscription_id_accepts_positive_keys() {
        let id = SubscriptionId::new(42).unwrap();
        assert_eq!(id.as_i64(), 42);
        assert_eq!(id.to_string(), "42");
    }

    #[test]
    fn record_ids_reject_zero_and_negative_keys() {
        assert!(OrderId::new(0).is_err());
        assert!(CustomerId::new(-7).is_err());
    }

    #[test]
    fn record_ids_parse_from_strings() {
        let id: MembershipId = " 13981 ".parse().unwrap();
        assert_eq!(id.as_i64(), 13981);

        let err = "abc".parse::<MembershipPlanId>().unwrap_err();
        assert!(matches!(err, ValidationError::InvalidFormat { .. }));
    }

    #[test]
    fn record_ids_serialize_as_plain_numbers() {
        let id = CustomerId::new(7).unwrap();
        assert_eq!(serde_json::to_string(&id).unwrap(), "7");
    }

    #[test]
    fn user_id_rejects_empty_string() {
        let result = UserId::new("");
        match result {
            Err(ValidationError::EmptyField { field }) => assert_eq!(field, "user_id"),
            _ => panic!("Expected EmptyField error"),
        }
    }

    #[test]
    fn user_id_displays_correctly() {
        let id = UserId::new("user-456").unwrap();
        assert_eq!(format!("{}", id), "user-456");
    }
}
