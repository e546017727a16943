//! Product review types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{UserRef, ValidationError};
use crate::types::{ProductId, ReviewId, UserId};

/// Lowest accepted rating.
pub const MIN_RATING: u8 = 1;
/// Highest accepted rating.
pub const MAX_RATING: u8 = 5;

/// One user's review of one product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Review {
    pub id: ReviewId,
    pub user_id: UserId,
    pub product_id: ProductId,
    pub rating: u8,
    #[serde(default)]
    pub comment: String,
    pub created_at: DateTime<Utc>,
}

impl Review {
    /// Materialize a review with a fresh id.
    #[must_use]
    pub fn from_new(user_id: UserId, product_id: ProductId, new: NewReview) -> Self {
        Self {
            id: ReviewId::generate(),
            user_id,
            product_id,
            rating: new.rating,
            comment: new.comment,
            created_at: Utc::now(),
        }
    }
}

/// Rating and comment supplied by the reviewer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewReview {
    pub rating: u8,
    #[serde(default)]
    pub comment: String,
}

impl NewReview {
    /// Build a review input.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::RatingOutOfRange` unless `rating` is 1-5.
    pub fn new(rating: u8, comment: impl Into<String>) -> Result<Self, ValidationError> {
        let new = Self {
            rating,
            comment: comment.into(),
        };
        new.validate()?;
        Ok(new)
    }

    /// Check the rating range.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::RatingOutOfRange` unless `rating` is 1-5.
    pub const fn validate(&self) -> Result<(), ValidationError> {
        if self.rating < MIN_RATING || self.rating > MAX_RATING {
            return Err(ValidationError::RatingOutOfRange {
                min: MIN_RATING,
                max: MAX_RATING,
                got: self.rating,
            });
        }
        Ok(())
    }
}

/// A review joined to its author's public identity.
///
/// `user` is `None` when the author record no longer resolves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductReview {
    #[serde(flatten)]
    pub review: Review,
    pub user: Option<UserRef>,
}
