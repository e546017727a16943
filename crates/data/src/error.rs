//! Unified error type for every data-access operation.
//!
//! Both engines report failures through `DataError`, so callers can match
//! on the same variants whichever engine the facade selected.

use bazarlink_core::ValidationError;
use thiserror::Error;

use crate::remote::RemoteError;
use crate::store::StoreError;

/// Errors returned by the data-access layer.
#[derive(Debug, Error)]
pub enum DataError {
    /// Sign-up with an email that already has an account.
    #[error("User with this email already exists")]
    DuplicateUser,

    /// No account matches the email and password.
    #[error("Invalid login credentials")]
    InvalidCredentials,

    /// The referenced record does not exist.
    #[error("{0} not found")]
    NotFound(String),

    /// The user already reviewed this product.
    #[error("You have already reviewed this product")]
    DuplicateReview,

    /// The selected engine cannot perform this operation.
    #[error("Not implemented: {0}")]
    NotImplemented(&'static str),

    /// Input rejected before reaching storage.
    #[error("Invalid input: {0}")]
    Validation(#[from] ValidationError),

    /// The remote service failed or could not be reached.
    #[error("Remote service error: {0}")]
    Remote(#[from] RemoteError),

    /// The local record store failed.
    #[error("Storage error: {0}")]
    Storage(#[from] StoreError),
}

impl DataError {
    /// Shorthand for a `NotFound` naming the entity and id.
    pub(crate) fn not_found(entity: &str, id: impl std::fmt::Display) -> Self {
        Self::NotFound(format!("{entity} {id}"))
    }
}

/// Result type alias for `DataError`.
pub type Result<T> = std::result::Result<T, DataError>;
