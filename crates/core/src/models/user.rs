//! User and session types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::types::{Email, Password, UserId};

/// Free-form profile data attached at sign-up.
///
/// The storefront writes `display_name` and `is_seller`; anything else the
/// caller supplies is kept verbatim in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserMetadata {
    /// Name shown in the storefront header.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    /// Whether the user signed up intending to sell.
    #[serde(default)]
    pub is_seller: bool,
    /// Any other keys.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A stored account, including its credential.
///
/// Only the fallback engine ever holds one of these; everything that
/// crosses the data-layer boundary is an [`AuthUser`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub email: Email,
    pub password: Password,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_metadata: Option<UserMetadata>,
}

impl User {
    /// Create a new account with a fresh id.
    #[must_use]
    pub fn new(email: Email, password: Password, user_metadata: Option<UserMetadata>) -> Self {
        Self {
            id: UserId::generate(),
            email,
            password,
            created_at: Utc::now(),
            user_metadata,
        }
    }

    /// The account without its credential.
    #[must_use]
    pub fn redacted(&self) -> AuthUser {
        AuthUser {
            id: self.id,
            email: self.email.clone(),
            created_at: self.created_at,
            user_metadata: self.user_metadata.clone(),
        }
    }

    /// Public identity (id and email only).
    #[must_use]
    pub fn public_ref(&self) -> UserRef {
        UserRef {
            id: self.id,
            email: self.email.clone(),
        }
    }
}

/// A signed-in user as returned by the auth operations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: UserId,
    pub email: Email,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_metadata: Option<UserMetadata>,
}

/// The current session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub user: AuthUser,
}

/// The public identity of a user, as joined onto reviews.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRef {
    pub id: UserId,
    pub email: Email,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn sample() -> User {
        User::new(
            Email::parse("ann@example.com").unwrap(),
            Password::from("s3cret"),
            Some(UserMetadata {
                display_name: Some("Ann".to_string()),
                ..UserMetadata::default()
            }),
        )
    }

    #[test]
    fn test_redacted_drops_password() {
        let user = sample();
        let json = serde_json::to_string(&user.redacted()).unwrap();
        assert!(!json.contains("s3cret"));
        assert!(!json.contains("password"));
    }

    #[test]
    fn test_metadata_keeps_unknown_keys() {
        let meta: UserMetadata =
            serde_json::from_str(r#"{"display_name":"Ann","is_seller":true,"city":"Pune"}"#)
                .unwrap();
        assert!(meta.is_seller);
        assert_eq!(meta.extra.get("city"), Some(&Value::from("Pune")));

        let back = serde_json::to_value(&meta).unwrap();
        assert_eq!(back["city"], "Pune");
    }

    #[test]
    fn test_auth_user_ignores_service_fields() {
        let json = r#"{
            "id": "4a5c2f0e-8a39-4c56-9d7b-0f5f5ef0d6a1",
            "aud": "authenticated",
            "role": "authenticated",
            "email": "ann@example.com",
            "created_at": "2026-01-02T03:04:05Z",
            "user_metadata": {}
        }"#;
        let user: AuthUser = serde_json::from_str(json).unwrap();
        assert_eq!(user.email.as_str(), "ann@example.com");
        assert_eq!(user.user_metadata, Some(UserMetadata::default()));
    }
}
