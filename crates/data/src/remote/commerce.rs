//! Cart, orders and reviews over the REST interface.

use bazarlink_core::{
    CartItem, CartLine, NewReview, Order, OrderDetails, OrderId, OrderRequest, ProductId,
    ProductReview, Review, UserId, check_quantity,
};
use reqwest::Method;
use serde::Serialize;

use super::client::{empty_representation, eq, fetch, first};
use super::{RemoteEngine, classify};
use crate::error::{DataError, Result};

/// Unique-constraint violation.
const UNIQUE_VIOLATION: &str = "23505";

const CART_SELECT: &str = "*,product:products(*)";
const ORDER_SELECT: &str = "*,items:order_items(*,product:products(*))";
const REVIEW_SELECT: &str = "*,user:public_users(id,email)";

#[derive(Serialize)]
struct AddToCartArgs {
    p_user_id: UserId,
    p_product_id: ProductId,
    p_quantity: u32,
}

#[derive(Serialize)]
struct PlaceOrderArgs {
    p_user_id: UserId,
    p_shipping_address: String,
}

#[derive(Serialize)]
struct QuantityPatch {
    quantity: u32,
}

#[derive(Serialize)]
struct ReviewInsert {
    user_id: UserId,
    product_id: ProductId,
    rating: u8,
    comment: String,
}

impl RemoteEngine {
    pub(super) async fn cart_add(
        &self,
        user_id: UserId,
        product_id: ProductId,
        quantity: u32,
    ) -> Result<CartItem> {
        let quantity = check_quantity(quantity)?;
        let builder = self.rpc("add_to_cart").await?.json(&AddToCartArgs {
            p_user_id: user_id,
            p_product_id: product_id,
            p_quantity: quantity,
        });
        let row: CartItem = fetch(builder)
            .await
            .map_err(|err| classify("add_to_cart", err))?;
        tracing::debug!(user_id = %user_id, product_id = %product_id, quantity = row.quantity, "Cart updated");
        Ok(row)
    }

    pub(super) async fn cart_lines(&self, user_id: UserId) -> Result<Vec<CartLine>> {
        let builder = self.table(Method::GET, "cart_items").await?.query(&[
            ("select", CART_SELECT.to_string()),
            ("user_id", eq(user_id)),
            ("order", "created_at.asc".to_string()),
        ]);
        fetch(builder).await.map_err(|err| classify("get_cart", err))
    }

    pub(super) async fn cart_set_quantity(
        &self,
        user_id: UserId,
        product_id: ProductId,
        quantity: u32,
    ) -> Result<CartItem> {
        let quantity = check_quantity(quantity)?;
        let builder = self
            .table(Method::PATCH, "cart_items")
            .await?
            .query(&[("user_id", eq(user_id)), ("product_id", eq(product_id))])
            .json(&QuantityPatch { quantity });
        let rows: Vec<CartItem> = fetch(builder)
            .await
            .map_err(|err| classify("update_cart_item", err))?;
        first(rows).ok_or_else(|| DataError::not_found("Cart item for product", product_id))
    }

    pub(super) async fn cart_remove(&self, user_id: UserId, product_id: ProductId) -> Result<()> {
        let builder = self
            .table(Method::DELETE, "cart_items")
            .await?
            .query(&[("user_id", eq(user_id)), ("product_id", eq(product_id))]);
        let rows: Vec<CartItem> = fetch(builder)
            .await
            .map_err(|err| classify("remove_cart_item", err))?;
        if rows.is_empty() {
            return Err(DataError::not_found("Cart item for product", product_id));
        }
        Ok(())
    }

    pub(super) async fn place_order(
        &self,
        user_id: UserId,
        request: OrderRequest,
    ) -> Result<Order> {
        let builder = self.rpc("place_order").await?.json(&PlaceOrderArgs {
            p_user_id: user_id,
            p_shipping_address: request.shipping_address,
        });
        let order: Order = fetch(builder)
            .await
            .map_err(|err| classify("create_order", err))?;
        tracing::info!(order_id = %order.id, user_id = %user_id, total = %order.total, "Order placed");
        Ok(order)
    }

    pub(super) async fn orders_of(&self, user_id: UserId) -> Result<Vec<Order>> {
        let builder = self.table(Method::GET, "orders").await?.query(&[
            ("select", "*".to_string()),
            ("user_id", eq(user_id)),
            ("order", "created_at.desc".to_string()),
        ]);
        fetch(builder).await.map_err(|err| classify("get_orders", err))
    }

    pub(super) async fn order_details(&self, order_id: OrderId) -> Result<OrderDetails> {
        let builder = self.table(Method::GET, "orders").await?.query(&[
            ("select", ORDER_SELECT.to_string()),
            ("id", eq(order_id)),
            ("limit", "1".to_string()),
        ]);
        let rows: Vec<OrderDetails> = fetch(builder)
            .await
            .map_err(|err| classify("get_order_by_id", err))?;
        first(rows).ok_or_else(|| DataError::not_found("Order", order_id))
    }

    pub(super) async fn insert_review(
        &self,
        user_id: UserId,
        product_id: ProductId,
        new: NewReview,
    ) -> Result<Review> {
        new.validate()?;
        let builder = self.table(Method::POST, "reviews").await?.json(&ReviewInsert {
            user_id,
            product_id,
            rating: new.rating,
            comment: new.comment,
        });
        let rows: Vec<Review> = fetch(builder).await.map_err(|err| {
            if err.has_code(UNIQUE_VIOLATION) {
                DataError::DuplicateReview
            } else {
                classify("add_review", err)
            }
        })?;
        first(rows).ok_or_else(|| empty_representation("reviews"))
    }

    pub(super) async fn reviews_of(&self, product_id: ProductId) -> Result<Vec<ProductReview>> {
        let builder = self.table(Method::GET, "reviews").await?.query(&[
            ("select", REVIEW_SELECT.to_string()),
            ("product_id", eq(product_id)),
            ("order", "created_at.asc".to_string()),
        ]);
        fetch(builder)
            .await
            .map_err(|err| classify("get_product_reviews", err))
    }
}
