//! Order types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::Product;
use crate::types::{OrderId, OrderItemId, OrderStatus, Price, ProductId, UserId};

/// A checkout snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub user_id: UserId,
    /// Sum of `price * quantity` over the order's items.
    pub total: Decimal,
    pub status: OrderStatus,
    #[serde(default)]
    pub shipping_address: String,
    pub created_at: DateTime<Utc>,
}

impl Order {
    /// Create a `pending` order with a fresh id.
    #[must_use]
    pub fn new(user_id: UserId, total: Decimal, shipping_address: String) -> Self {
        Self {
            id: OrderId::generate(),
            user_id,
            total,
            status: OrderStatus::Pending,
            shipping_address,
            created_at: Utc::now(),
        }
    }
}

/// A line of an order.
///
/// `price` is the unit price copied at checkout; later product price
/// changes do not alter it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItem {
    pub id: OrderItemId,
    pub order_id: OrderId,
    pub product_id: ProductId,
    pub quantity: u32,
    pub price: Price,
}

impl OrderItem {
    /// Snapshot `quantity` units of `product` into `order_id`.
    #[must_use]
    pub fn snapshot(order_id: OrderId, product: &Product, quantity: u32) -> Self {
        Self {
            id: OrderItemId::generate(),
            order_id,
            product_id: product.id,
            quantity,
            price: product.price,
        }
    }

    /// `price * quantity`, or `None` on decimal overflow.
    #[must_use]
    pub fn line_total(&self) -> Option<Decimal> {
        self.price.line_total(self.quantity)
    }
}

/// An order item joined to its (current) product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLine {
    #[serde(flatten)]
    pub item: OrderItem,
    pub product: Option<Product>,
}

/// An order with its items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderDetails {
    #[serde(flatten)]
    pub order: Order,
    pub items: Vec<OrderLine>,
}

/// Checkout details supplied by the buyer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderRequest {
    #[serde(default)]
    pub shipping_address: String,
}

impl OrderRequest {
    /// Checkout shipping to `address`.
    #[must_use]
    pub fn ship_to(address: impl Into<String>) -> Self {
        Self {
            shipping_address: address.into(),
        }
    }
}
