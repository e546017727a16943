//! Shopping cart types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Product;
use crate::types::{CartItemId, ProductId, UserId};

/// One (user, product) row in a cart.
///
/// There is at most one row per pair; adding the same product again
/// increments `quantity`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    pub id: CartItemId,
    pub user_id: UserId,
    pub product_id: ProductId,
    pub quantity: u32,
    pub created_at: DateTime<Utc>,
}

impl CartItem {
    /// Create a new cart row with a fresh id.
    #[must_use]
    pub fn new(user_id: UserId, product_id: ProductId, quantity: u32) -> Self {
        Self {
            id: CartItemId::generate(),
            user_id,
            product_id,
            quantity,
            created_at: Utc::now(),
        }
    }

    /// Whether this row belongs to the (user, product) pair.
    #[must_use]
    pub fn is_for(&self, user_id: UserId, product_id: ProductId) -> bool {
        self.user_id == user_id && self.product_id == product_id
    }
}

/// A cart row joined to its product.
///
/// `product` is `None` when the product has since been deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    #[serde(flatten)]
    pub item: CartItem,
    pub product: Option<Product>,
}
