//! Product reviews.

use bazarlink_core::{NewReview, ProductId, ProductReview, Review, User, UserId};

use super::{Tables, keys};
use crate::error::{DataError, Result};

impl Tables {
    pub(super) fn add_review(
        &self,
        user_id: UserId,
        product_id: ProductId,
        new: NewReview,
    ) -> Result<Review> {
        new.validate()?;

        let _guard = self.lock()?;
        let mut reviews: Vec<Review> = self.store.read(keys::REVIEWS)?;
        if reviews
            .iter()
            .any(|r| r.user_id == user_id && r.product_id == product_id)
        {
            return Err(DataError::DuplicateReview);
        }

        let review = Review::from_new(user_id, product_id, new);
        reviews.push(review.clone());
        self.store.write(keys::REVIEWS, &reviews)?;

        tracing::debug!(review_id = %review.id, product_id = %product_id, "Review added");
        Ok(review)
    }

    pub(super) fn get_product_reviews(&self, product_id: ProductId) -> Result<Vec<ProductReview>> {
        let reviews: Vec<Review> = self.store.read(keys::REVIEWS)?;
        let users: Vec<User> = self.store.read(keys::USERS)?;

        Ok(reviews
            .into_iter()
            .filter(|review| review.product_id == product_id)
            .map(|review| ProductReview {
                user: users
                    .iter()
                    .find(|user| user.id == review.user_id)
                    .map(User::public_ref),
                review,
            })
            .collect())
    }
}
