//! Reporting-specific error types.
//!
//! # HTTP Status Mapping
//!
//! | Error | HTTP Status |
//! |-------|-------------|
//! | InvalidDateRange | 400 |
//! | InvalidRecipient | 400 |
//! | MailDelivery | 502 |
//! | Infrastructure | 500 |

use crate::domain::foundation::{DomainError, ErrorCode, ValidationError};

/// Errors raised while producing or delivering a report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportError {
    /// A date bound was malformed or the range was too long.
    InvalidDateRange { field: String, message: String },

    /// The recipient address is not a valid email address.
    InvalidRecipient(String),

    /// The mail transport refused or failed to send the report.
    MailDelivery(String),

    /// The record source or settings store failed.
    Infrastructure(String),
}

impl ReportError {
    pub fn invalid_date_range(field: impl Into<String>, message: impl Into<String>) -> Self {
        ReportError::InvalidDateRange {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn invalid_recipient(message: impl Into<String>) -> Self {
        ReportError::InvalidRecipient(message.into())
    }

    pub fn mail_delivery(message: impl Into<String>) -> Self {
        ReportError::MailDelivery(message.into())
    }

    pub fn infrastructure(message: impl Into<String>) -> Self {
        ReportError::Infrastructure(message.into())
    }

    /// Returns the error code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            ReportError::InvalidDateRange { .. } => ErrorCode::InvalidFormat,
            ReportError::InvalidRecipient(_) => ErrorCode::ValidationFailed,
            ReportError::MailDelivery(_) => ErrorCode::MailTransportError,
            ReportError::Infrastructure(_) => ErrorCode::DatabaseError,
        }
    }

    /// Returns a user-facing error message.
    pub fn message(&self) -> String {
        match self {
            ReportError::InvalidDateRange { field, message } => {
                format!("Invalid '{}': {}", field, message)
            }
            ReportError::InvalidRecipient(msg) => format!("Invalid recipient: {}", msg),
            ReportError::MailDelivery(msg) => format!("Report email could not be sent: {}", msg),
            ReportError::Infrastructure(msg) => format!("Error: {}", msg),
        }
    }
}

impl std::fmt::Display for ReportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for ReportError {}

impl From<DomainError> for ReportError {
    fn from(err: DomainError) -> Self {
        ReportError::Infrastructure(err.to_string())
    }
}

impl From<ReportError> for DomainError {
    fn from(err: ReportError) -> Self {
        DomainError::new(err.code(), err.message())
    }
}

/// Date-range validation failures become [`ReportError::InvalidDateRange`].
impl From<ValidationError> for ReportError {
    fn from(err: ValidationError) -> Self {
        ReportError::invalid_date_range(err.field().to_string(), err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_errors_keep_their_field() {
        let err: ReportError = ValidationError::invalid_format("start_date", "bad").into();
        assert!(matches!(err, ReportError::InvalidDateRange { ref field, .. } if field == "start_date"));
        assert_eq!(err.code(), ErrorCode::InvalidFormat);
    }

    #[test]
    fn domain_errors_become_infrastructure() {
        let err: ReportError = DomainError::database("connection reset").into();
        assert_eq!(err, ReportError::infrastructure("[DATABASE_ERROR] connection reset"));
        assert_eq!(err.code(), ErrorCode::DatabaseError);
    }

    #[test]
    fn converts_back_to_domain_error() {
        let err: DomainError = ReportError::mail_delivery("timeout").into();
        assert_eq!(err.code, ErrorCode::MailTransportError);
        assert_eq!(err.message, "Report email could not be sent: timeout");
    }
}
