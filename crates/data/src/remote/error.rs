//! Failures talking to the hosted service.

use serde::Deserialize;
use thiserror::Error;

/// Database error codes meaning the schema lacks a table or function.
const MISSING_SCHEMA_CODES: [&str; 4] = ["42P01", "42883", "PGRST202", "PGRST205"];

/// Errors that can occur when calling the hosted service.
#[derive(Debug, Error)]
pub enum RemoteError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The service answered with an error status.
    #[error("API error: {status} - {message}")]
    Api {
        status: u16,
        code: Option<String>,
        message: String,
    },

    /// A success response did not have the expected shape.
    #[error("Decode error: {0}")]
    Decode(String),

    /// The configured service URL cannot be used.
    #[error("Invalid service URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The configured key cannot be sent as a header.
    #[error("Invalid API key: {0}")]
    InvalidKey(String),
}

impl RemoteError {
    /// HTTP status of an API error.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Machine-readable error code of an API error.
    #[must_use]
    pub fn code(&self) -> Option<&str> {
        match self {
            Self::Api { code, .. } => code.as_deref(),
            _ => None,
        }
    }

    /// Whether the API error carries `code`.
    #[must_use]
    pub fn has_code(&self, code: &str) -> bool {
        self.code() == Some(code)
    }

    /// Whether the service reported a missing table or function.
    #[must_use]
    pub fn is_missing_schema(&self) -> bool {
        self.code()
            .is_some_and(|code| MISSING_SCHEMA_CODES.contains(&code))
    }

    /// Build an `Api` error from a status and raw response body.
    pub(crate) fn from_response(status: u16, body: &str) -> Self {
        let parsed: ErrorBody = serde_json::from_str(body).unwrap_or_default();
        let code = parsed
            .error_code
            .or_else(|| parsed.code.and_then(code_text))
            .or(parsed.error);
        let message = parsed
            .msg
            .or(parsed.message)
            .or(parsed.error_description)
            .unwrap_or_else(|| body.trim().to_string());

        Self::Api {
            status,
            code,
            message,
        }
    }
}

/// Union of the auth service's and the REST service's error bodies.
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    code: Option<serde_json::Value>,
    error_code: Option<String>,
    error: Option<String>,
    error_description: Option<String>,
    msg: Option<String>,
    message: Option<String>,
}

/// Auth errors carry the HTTP status as a numeric `code`; only string
/// codes identify the failure.
fn code_text(code: serde_json::Value) -> Option<String> {
    match code {
        serde_json::Value::String(code) => Some(code),
        _ => None,
    }
}
