//! Entity records shared by every storage engine.
//!
//! Field names are `snake_case` and match the remote service's column
//! names, so the same structs serialize into the fallback engine's JSON
//! collections and deserialize from the remote service's responses.
//!
//! Input types (`New*`, [`OrderRequest`]) validate their required fields
//! on construction; engines re-run [`validate`](NewProduct::validate)
//! before persisting, since the fields are public.

pub mod cart;
pub mod order;
pub mod product;
pub mod review;
pub mod seller;
pub mod user;

pub use cart::{CartItem, CartLine};
pub use order::{Order, OrderDetails, OrderItem, OrderLine, OrderRequest};
pub use product::{NewProduct, Product};
pub use review::{NewReview, ProductReview, Review};
pub use seller::{NewSeller, Seller};
pub use user::{AuthUser, Session, User, UserMetadata, UserRef};

use thiserror::Error;

use crate::types::{EmailError, PriceError};

/// Errors raised when an input record is missing or has an invalid field.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// A required text field is blank.
    #[error("{0} is required")]
    Required(&'static str),

    /// A review rating outside 1-5.
    #[error("rating must be between {min} and {max} (got {got})")]
    RatingOutOfRange {
        /// Lowest accepted rating.
        min: u8,
        /// Highest accepted rating.
        max: u8,
        /// Rating supplied.
        got: u8,
    },

    /// A cart or order quantity of zero.
    #[error("quantity must be at least 1")]
    ZeroQuantity,

    /// Merging into a cart row would exceed the largest storable quantity.
    #[error("quantity cannot exceed {max}")]
    QuantityTooLarge {
        /// Largest storable quantity.
        max: u32,
    },

    /// A line or order total does not fit in a decimal.
    #[error("order total is too large")]
    TotalTooLarge,

    /// Invalid price.
    #[error(transparent)]
    Price(#[from] PriceError),

    /// Invalid email address.
    #[error(transparent)]
    Email(#[from] EmailError),
}

/// Reject blank required text.
pub(crate) fn require(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::Required(field));
    }
    Ok(())
}

/// Reject a zero quantity.
///
/// # Errors
///
/// Returns `ValidationError::ZeroQuantity` when `quantity` is zero.
pub const fn check_quantity(quantity: u32) -> Result<u32, ValidationError> {
    if quantity == 0 {
        return Err(ValidationError::ZeroQuantity);
    }
    Ok(quantity)
}
