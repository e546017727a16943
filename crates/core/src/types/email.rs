//! Account email address.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Why an address was rejected at sign-up.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum EmailError {
    #[error("email cannot be empty")]
    Empty,
    #[error("email must be at most {max} characters")]
    TooLong { max: usize },
    #[error("email must contain an @ symbol")]
    MissingAtSymbol,
    #[error("email must have text before the @")]
    EmptyLocalPart,
    #[error("email must have a domain after the @")]
    EmptyDomain,
    #[error("email cannot contain whitespace")]
    Whitespace,
}

/// The login identifier of an account.
///
/// Only the structure is checked: some text, an `@`, some more text. The
/// address is stored exactly as entered, so lookups are byte-for-byte and
/// `Ann@x.io` and `ann@x.io` name different accounts.
///
/// Records read back from storage are trusted and deserialize without
/// re-validation.
///
/// ```
/// use bazarlink_core::Email;
///
/// assert!(Email::parse("test@example.com").is_ok());
/// assert!(Email::parse("test@").is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Email(String);

impl Email {
    /// Longest accepted address (RFC 5321 path limit).
    pub const MAX_LENGTH: usize = 254;

    /// Validate `s` as an account email.
    ///
    /// # Errors
    ///
    /// Returns `EmailError` naming the first structural problem found.
    pub fn parse(s: &str) -> Result<Self, EmailError> {
        if s.is_empty() {
            return Err(EmailError::Empty);
        }
        if s.len() > Self::MAX_LENGTH {
            return Err(EmailError::TooLong {
                max: Self::MAX_LENGTH,
            });
        }
        if s.chars().any(char::is_whitespace) {
            return Err(EmailError::Whitespace);
        }

        match s.split_once('@') {
            None => Err(EmailError::MissingAtSymbol),
            Some(("", _)) => Err(EmailError::EmptyLocalPart),
            Some((_, "")) => Err(EmailError::EmptyDomain),
            Some(_) => Ok(Self(s.to_owned())),
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for Email {
    type Err = EmailError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_demo_and_tagged_addresses() {
        for ok in ["test@example.com", "a+shop@b.co.uk", "x@localhost"] {
            assert!(Email::parse(ok).is_ok(), "{ok}");
        }
    }

    #[test]
    fn test_rejections() {
        assert_eq!(Email::parse(""), Err(EmailError::Empty));
        assert_eq!(Email::parse("seller.example.com"), Err(EmailError::MissingAtSymbol));
        assert_eq!(Email::parse("@example.com"), Err(EmailError::EmptyLocalPart));
        assert_eq!(Email::parse("seller@"), Err(EmailError::EmptyDomain));
        assert_eq!(Email::parse("sel ler@example.com"), Err(EmailError::Whitespace));

        let long = format!("{}@example.com", "a".repeat(250));
        assert!(matches!(Email::parse(&long), Err(EmailError::TooLong { max: 254 })));
    }

    #[test]
    fn test_case_is_preserved() {
        let email = Email::parse("Ann@Example.com").unwrap();
        assert_eq!(email.to_string(), "Ann@Example.com");
        assert_ne!(email, Email::parse("ann@example.com").unwrap());
    }

    #[test]
    fn test_stored_form_is_plain_string() {
        let email: Email = "test@example.com".parse().unwrap();
        assert_eq!(serde_json::to_string(&email).unwrap(), "\"test@example.com\"");

        // Stored records are not re-validated
        let stored: Email = serde_json::from_str("\"legacy\"").unwrap();
        assert_eq!(stored.as_str(), "legacy");
    }
}
