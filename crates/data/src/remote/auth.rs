//! Sign-up, sign-in and session handling against `/auth/v1`.

use bazarlink_core::{AuthUser, Email, Password, Session, UserMetadata, ValidationError};
use reqwest::Method;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use super::client::{execute, fetch};
use super::{RemoteEngine, RemoteError, RemoteSession, classify};
use crate::error::{DataError, Result};

/// Codes the auth service uses for rejected credentials.
const INVALID_CREDENTIAL_CODES: [&str; 2] = ["invalid_credentials", "invalid_grant"];

/// Codes the auth service uses for an email that is already registered.
const DUPLICATE_USER_CODES: [&str; 2] = ["user_already_exists", "email_exists"];

#[derive(Serialize)]
struct PasswordGrant<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct SignUpRequest<'a> {
    email: &'a str,
    password: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<&'a UserMetadata>,
}

/// Issued tokens; the refresh token is not retained.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    user: AuthUser,
}

/// Sign-up returns a session when email confirmation is off, otherwise
/// only the pending user.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SignUpResponse {
    Session(TokenResponse),
    User(AuthUser),
}

impl RemoteEngine {
    /// One lightweight auth call proving the service is reachable.
    pub(super) async fn check_connectivity(&self) -> Result<()> {
        let signed_in = self.session.read().await.is_some();
        let path = if signed_in {
            "auth/v1/user"
        } else {
            "auth/v1/settings"
        };

        let builder = self.request(Method::GET, path).await?;
        execute(builder).await.map_err(|err| {
            tracing::warn!(url = %self.base, error = %err, "Remote service unreachable");
            DataError::Remote(err)
        })?;

        tracing::info!(url = %self.base, "Connected to remote service");
        Ok(())
    }

    pub(super) async fn current_session(&self) -> Result<Option<Session>> {
        Ok(self
            .session
            .read()
            .await
            .as_ref()
            .map(|session| Session {
                user: session.user.clone(),
            }))
    }

    pub(super) async fn password_sign_in(
        &self,
        email: &str,
        password: &Password,
    ) -> Result<AuthUser> {
        let builder = self
            .request(Method::POST, "auth/v1/token")
            .await?
            .query(&[("grant_type", "password")])
            .json(&PasswordGrant {
                email,
                password: password.expose(),
            });

        let tokens: TokenResponse = fetch(builder).await.map_err(|err| {
            if is_invalid_credentials(&err) {
                DataError::InvalidCredentials
            } else {
                classify("sign_in", err)
            }
        })?;

        tracing::info!(user_id = %tokens.user.id, "User signed in");
        Ok(self.hold(tokens).await)
    }

    pub(super) async fn register(
        &self,
        email: &str,
        password: &Password,
        metadata: Option<UserMetadata>,
    ) -> Result<AuthUser> {
        Email::parse(email).map_err(ValidationError::from)?;

        let builder = self
            .request(Method::POST, "auth/v1/signup")
            .await?
            .json(&SignUpRequest {
                email,
                password: password.expose(),
                data: metadata.as_ref(),
            });

        let response: SignUpResponse = fetch(builder).await.map_err(|err| {
            if DUPLICATE_USER_CODES.iter().any(|code| err.has_code(code)) {
                DataError::DuplicateUser
            } else {
                classify("sign_up", err)
            }
        })?;

        let user = match response {
            SignUpResponse::Session(tokens) => self.hold(tokens).await,
            SignUpResponse::User(user) => {
                tracing::info!(user_id = %user.id, "Sign-up awaiting email confirmation");
                user
            }
        };
        tracing::info!(user_id = %user.id, "User signed up");
        Ok(user)
    }

    pub(super) async fn logout(&self) -> Result<()> {
        let Some(session) = self.session.write().await.take() else {
            return Ok(());
        };

        let url = self.base.join("auth/v1/logout").map_err(RemoteError::from)?;
        let builder = self
            .client
            .post(url)
            .bearer_auth(session.access_token.expose_secret());
        match execute(builder).await {
            Ok(()) => {}
            // Token already expired or revoked
            Err(err) if matches!(err.status(), Some(401 | 404)) => {
                tracing::debug!(error = %err, "Logout of stale session ignored");
            }
            Err(err) => return Err(classify("sign_out", err)),
        }

        tracing::info!(user_id = %session.user.id, "User signed out");
        Ok(())
    }

    /// Keep `tokens` as the current session and return its user.
    async fn hold(&self, tokens: TokenResponse) -> AuthUser {
        let user = tokens.user;
        *self.session.write().await = Some(RemoteSession {
            access_token: SecretString::from(tokens.access_token),
            user: user.clone(),
        });
        user
    }
}

/// Only the credential codes count; other 400s (unconfirmed email, bad
/// request) surface as `Remote` errors.
fn is_invalid_credentials(err: &RemoteError) -> bool {
    INVALID_CREDENTIAL_CODES
        .iter()
        .any(|code| err.has_code(code))
}
