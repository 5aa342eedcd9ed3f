//! Foundation module - Shared domain primitives.
//!
//! Contains value objects, identifiers and error types that form the
//! vocabulary of the reporting domain.

mod auth;
mod errors;
mod ids;
mod timestamp;

pub use auth::{AuthError, AuthenticatedUser, Capability};
pub use errors::{DomainError, ErrorCode, ValidationError};
pub use ids::{CustomerId, MembershipId, MembershipPlanId, OrderId, SubscriptionId, UserId};
pub use timestamp::Timestamp;
