//! Account credential types.
//!
//! Type-safe wrapper for the password a user signs in with.

use core::fmt;

use serde::{Deserialize, Serialize};

/// A user's sign-in password.
///
/// The fallback engine persists this value verbatim alongside the user
/// record and compares it byte-for-byte on sign-in; it is a development
/// convenience, not a secure credential store. The remote engine only ever
/// forwards it to the auth service.
///
/// `Debug` and `Display` are redacted so the value never ends up in logs.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Password(String);

impl Password {
    /// Create a new password.
    #[must_use]
    pub fn new(secret: impl Into<String>) -> Self {
        Self(secret.into())
    }

    /// Expose the underlying secret.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Password {
    fn from(secret: &str) -> Self {
        Self::new(secret)
    }
}

impl From<String> for Password {
    fn from(secret: String) -> Self {
        Self(secret)
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password([REDACTED])")
    }
}

impl fmt::Display for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}
