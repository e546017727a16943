//! Request building and response handling.

use reqwest::{Method, RequestBuilder, Response};
use secrecy::ExposeSecret;
use serde::de::DeserializeOwned;

use super::{RemoteEngine, RemoteError};
use crate::error::DataError;

/// Ask the REST service to echo affected rows back.
const RETURN_REPRESENTATION: &str = "return=representation";

/// `column=eq.value` filter operand.
pub(super) fn eq(value: impl std::fmt::Display) -> String {
    format!("eq.{value}")
}

impl RemoteEngine {
    /// Bearer token for the next request: the session's access token, or
    /// the anon key when signed out.
    async fn bearer(&self) -> String {
        self.session.read().await.as_ref().map_or_else(
            || self.anon_key.expose_secret().to_string(),
            |session| session.access_token.expose_secret().to_string(),
        )
    }

    /// Start a request to `path`, relative to the service root.
    pub(super) async fn request(
        &self,
        method: Method,
        path: &str,
    ) -> Result<RequestBuilder, RemoteError> {
        let url = self.base.join(path)?;
        let token = self.bearer().await;
        Ok(self.client.request(method, url).bearer_auth(token))
    }

    /// Start a request against `/rest/v1/{table}`.
    pub(super) async fn table(
        &self,
        method: Method,
        table: &str,
    ) -> Result<RequestBuilder, RemoteError> {
        let builder = self.request(method.clone(), &format!("rest/v1/{table}")).await?;
        Ok(if method == Method::GET {
            builder
        } else {
            builder.header("Prefer", RETURN_REPRESENTATION)
        })
    }

    /// Start a call of the server-side function `name`.
    pub(super) async fn rpc(&self, name: &str) -> Result<RequestBuilder, RemoteError> {
        self.request(Method::POST, &format!("rest/v1/rpc/{name}"))
            .await
    }
}

/// Send `builder` and decode a JSON success body.
pub(super) async fn fetch<T: DeserializeOwned>(builder: RequestBuilder) -> Result<T, RemoteError> {
    let response = checked(builder.send().await?).await?;
    let body = response.text().await?;
    serde_json::from_str(&body).map_err(|e| RemoteError::Decode(e.to_string()))
}

/// Send `builder` and discard a success body.
pub(super) async fn execute(builder: RequestBuilder) -> Result<(), RemoteError> {
    checked(builder.send().await?).await?;
    Ok(())
}

/// Turn a non-success response into `RemoteError::Api`.
async fn checked(response: Response) -> Result<Response, RemoteError> {
    let status = response.status();
    tracing::debug!(status = %status, url = %response.url().path(), "Remote response received");
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(RemoteError::from_response(status.as_u16(), &body))
}

/// First row of a representation, or `None` when it is empty.
pub(super) fn first<T>(rows: Vec<T>) -> Option<T> {
    rows.into_iter().next()
}

/// An insert asked for its row back but got none.
pub(super) fn empty_representation(table: &str) -> DataError {
    DataError::Remote(RemoteError::Decode(format!(
        "insert into {table} returned no rows"
    )))
}
