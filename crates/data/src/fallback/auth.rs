//! Accounts and the session slot.

use bazarlink_core::{AuthUser, Email, Password, Session, User, UserMetadata, ValidationError};

use super::{Tables, keys};
use crate::error::{DataError, Result};
use crate::store::StoreError;

impl Tables {
    /// The session slot's user. An unreadable slot counts as signed out
    /// and a corrupt one is cleared.
    pub(super) fn get_session(&self) -> Result<Option<Session>> {
        match self.store.read_slot::<AuthUser>(keys::CURRENT_USER) {
            Ok(user) => Ok(user.map(|user| Session { user })),
            Err(err) => {
                tracing::warn!(error = %err, "Session slot unreadable, treating as signed out");
                if matches!(err, StoreError::Corrupt { .. }) {
                    if let Err(clear_err) = self.store.clear(keys::CURRENT_USER) {
                        tracing::warn!(error = %clear_err, "Failed to clear corrupt session slot");
                    }
                }
                Ok(None)
            }
        }
    }

    pub(super) fn sign_in(&self, email: &str, password: &Password) -> Result<AuthUser> {
        let Ok(email) = Email::parse(email) else {
            return Err(DataError::InvalidCredentials);
        };

        let users: Vec<User> = self.store.read(keys::USERS)?;
        let Some(user) = users
            .iter()
            .find(|user| user.email == email && user.password == *password)
        else {
            tracing::debug!(email = %email, "Sign-in rejected");
            return Err(DataError::InvalidCredentials);
        };

        let session = user.redacted();
        self.store.write_slot(keys::CURRENT_USER, &session)?;
        tracing::info!(user_id = %session.id, "User signed in");
        Ok(session)
    }

    pub(super) fn sign_up(
        &self,
        email: &str,
        password: &Password,
        metadata: Option<UserMetadata>,
    ) -> Result<AuthUser> {
        let email = Email::parse(email).map_err(ValidationError::from)?;

        let _guard = self.lock()?;
        let mut users: Vec<User> = self.store.read(keys::USERS)?;
        if users.iter().any(|user| user.email == email) {
            return Err(DataError::DuplicateUser);
        }

        let user = User::new(email, password.clone(), metadata);
        let session = user.redacted();
        users.push(user);
        self.store.write(keys::USERS, &users)?;
        self.store.write_slot(keys::CURRENT_USER, &session)?;

        tracing::info!(user_id = %session.id, "User signed up");
        Ok(session)
    }

    pub(super) fn sign_out(&self) -> Result<()> {
        self.store.clear(keys::CURRENT_USER)?;
        tracing::info!("User signed out");
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use crate::engine::DataEngine;
    use crate::fallback::FallbackEngine;
    use crate::store::{KeyValueMedium, MemoryMedium, RecordStore};

    use super::*;

    async fn engine() -> FallbackEngine {
        let engine = FallbackEngine::in_memory();
        engine.init().await.unwrap();
        engine
    }

    #[tokio::test]
    async fn test_sign_up_then_sign_in_returns_same_id() {
        let engine = engine().await;
        let password = Password::from("hunter22");
        let created = engine
            .sign_up("ann@example.com", &password, None)
            .await
            .unwrap();
        engine.sign_out().await.unwrap();

        let signed_in = engine.sign_in("ann@example.com", &password).await.unwrap();
        assert_eq!(signed_in.id, created.id);
    }

    #[tokio::test]
    async fn test_sign_up_establishes_session() {
        let engine = engine().await;
        let meta = UserMetadata {
            display_name: Some("Ann".to_string()),
            ..UserMetadata::default()
        };
        let user = engine
            .sign_up("ann@example.com", &Password::from("pw"), Some(meta.clone()))
            .await
            .unwrap();

        let session = engine.get_session().await.unwrap().unwrap();
        assert_eq!(session.user, user);
        assert_eq!(session.user.user_metadata, Some(meta));
    }

    #[tokio::test]
    async fn test_duplicate_sign_up() {
        let engine = engine().await;
        engine
            .sign_up("ann@example.com", &Password::from("one"), None)
            .await
            .unwrap();
        let err = engine
            .sign_up("ann@example.com", &Password::from("two"), None)
            .await
            .unwrap_err();
        assert!(matches!(err, DataError::DuplicateUser));
    }

    #[tokio::test]
    async fn test_email_match_is_case_sensitive() {
        let engine = engine().await;
        engine
            .sign_up("ann@example.com", &Password::from("pw"), None)
            .await
            .unwrap();
        engine
            .sign_up("Ann@example.com", &Password::from("pw"), None)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_wrong_password_leaves_no_session() {
        let engine = engine().await;
        engine
            .sign_up("ann@example.com", &Password::from("right"), None)
            .await
            .unwrap();
        engine.sign_out().await.unwrap();

        let err = engine
            .sign_in("ann@example.com", &Password::from("wrong"))
            .await
            .unwrap_err();
        assert!(matches!(err, DataError::InvalidCredentials));
        assert!(engine.get_session().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_malformed_email() {
        let engine = engine().await;
        let err = engine
            .sign_in("not-an-email", &Password::from("pw"))
            .await
            .unwrap_err();
        assert!(matches!(err, DataError::InvalidCredentials));

        let err = engine
            .sign_up("not-an-email", &Password::from("pw"), None)
            .await
            .unwrap_err();
        assert!(matches!(err, DataError::Validation(_)));
    }

    #[tokio::test]
    async fn test_sign_out_without_session() {
        let engine = engine().await;
        engine.sign_out().await.unwrap();
        assert!(engine.get_session().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_stored_session_has_no_password() {
        let engine = engine().await;
        engine
            .sign_up("ann@example.com", &Password::from("s3cret-pw"), None)
            .await
            .unwrap();
        let slot: serde_json::Value = engine
            .store()
            .read_slot(keys::CURRENT_USER)
            .unwrap()
            .unwrap();
        assert!(slot.get("password").is_none());
        assert!(!slot.to_string().contains("s3cret-pw"));
    }

    #[tokio::test]
    async fn test_corrupt_session_slot_reads_as_signed_out() {
        let medium = MemoryMedium::default();
        medium.set(keys::CURRENT_USER, "{garbage").unwrap();
        let engine = FallbackEngine::new(RecordStore::new(medium));
        engine.init().await.unwrap();

        assert!(engine.get_session().await.unwrap().is_none());
        assert!(!engine.store().contains(keys::CURRENT_USER).unwrap());

        let user = engine
            .sign_up("ann@example.com", &Password::from("hunter22"), None)
            .await
            .unwrap();
        let session = engine.get_session().await.unwrap().unwrap();
        assert_eq!(session.user.id, user.id);
    }
}
