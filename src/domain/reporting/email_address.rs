//! Report recipient address.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::foundation::ValidationError;

const MAX_LENGTH: usize = 254;

/// A syntactically valid email address.
///
/// Validation is structural only: one `@`, a non-empty local part made of
/// printable characters, and a dotted domain of letters, digits and hyphens.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EmailAddress(String);

impl EmailAddress {
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        let value = raw.trim();
        if value.is_empty() {
            return Err(ValidationError::empty_field("email"));
        }
        if value.len() > MAX_LENGTH {
            return Err(ValidationError::invalid_format("email", "address is too long"));
        }

        let (local, domain) = value
            .split_once('@')
            .ok_or_else(|| ValidationError::invalid_format("email", "missing '@'"))?;

        if !is_valid_local(local) {
            return Err(ValidationError::invalid_format("email", "invalid local part"));
        }
        if !is_valid_domain(domain) {
            return Err(ValidationError::invalid_format("email", "invalid domain"));
        }

        Ok(Self(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn is_valid_local(local: &str) -> bool {
    const SPECIALS: &str = "!#$%&'*+/=?^_`{|}~.-";
    !local.is_empty()
        && local
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || SPECIALS.contains(c))
}

fn is_valid_domain(domain: &str) -> bool {
    let labels: Vec<&str> = domain.split('.').collect();
    if labels.len() < 2 {
        return false;
    }
    labels.iter().all(|label| {
        !label.is_empty()
            && !label.starts_with('-')
            && !label.ends_with('-')
            && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
    })
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for EmailAddress {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for EmailAddress {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<EmailAddress> for String {
    fn from(value: EmailAddress) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_ordinary_addresses() {
        for raw in ["ops@example.com", "first.last+reports@mail.example.co.uk", " a@b.io "] {
            assert!(EmailAddress::parse(raw).is_ok(), "{raw} should parse");
        }
        assert_eq!(EmailAddress::parse(" a@b.io ").unwrap().as_str(), "a@b.io");
    }

    #[test]
    fn rejects_malformed_addresses() {
        for raw in [
            "",
            "   ",
            "no-at-sign",
            "@example.com",
            "user@",
            "user@localhost",
            "user@exa mple.com",
            "user@-bad.com",
            "user@example..com",
            "us er@example.com",
            "a@b@c.com",
        ] {
            assert!(EmailAddress::parse(raw).is_err(), "{raw:?} should be rejected");
        }
    }

    #[test]
    fn deserialize_validates() {
        let ok: Result<EmailAddress, _> = serde_json::from_str("\"ops@example.com\"");
        assert!(ok.is_ok());
        let bad: Result<EmailAddress, _> = serde_json::from_str("\"not an email\"");
        assert!(bad.is_err());
    }
}
