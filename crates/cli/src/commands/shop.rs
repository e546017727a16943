//! Cart, order and review commands for the signed-in user.

use bazarlink_core::{NewReview, OrderId, OrderRequest, ProductId};
use bazarlink_data::Database;
use tracing::info;

use super::{output, signed_in};

/// Print the cart.
///
/// # Errors
///
/// Returns an error if nobody is signed in.
pub async fn show_cart(db: &Database) -> Result<(), Box<dyn std::error::Error>> {
    let user = signed_in(db).await?;
    output::json(&db.get_cart(user.id).await?)
}

/// Add units of a product to the cart.
///
/// # Errors
///
/// Returns an error if nobody is signed in or `quantity` is zero.
pub async fn add_to_cart(
    db: &Database,
    product_id: ProductId,
    quantity: u32,
) -> Result<(), Box<dyn std::error::Error>> {
    let user = signed_in(db).await?;
    let row = db.add_to_cart(user.id, product_id, quantity).await?;
    output::json(&row)
}

/// Set the quantity of a cart row.
///
/// # Errors
///
/// Returns an error if the product is not in the cart.
pub async fn set_quantity(
    db: &Database,
    product_id: ProductId,
    quantity: u32,
) -> Result<(), Box<dyn std::error::Error>> {
    let user = signed_in(db).await?;
    let row = db.update_cart_item(user.id, product_id, quantity).await?;
    output::json(&row)
}

/// Remove a product from the cart.
///
/// # Errors
///
/// Returns an error if the product is not in the cart.
pub async fn remove_from_cart(
    db: &Database,
    product_id: ProductId,
) -> Result<(), Box<dyn std::error::Error>> {
    let user = signed_in(db).await?;
    db.remove_cart_item(user.id, product_id).await?;
    output::line(&format!("Removed product {product_id} from cart"));
    Ok(())
}

/// Turn the cart into an order.
///
/// # Errors
///
/// Returns an error if nobody is signed in or the order cannot be stored.
pub async fn place_order(db: &Database, address: String) -> Result<(), Box<dyn std::error::Error>> {
    let user = signed_in(db).await?;
    let order = db
        .create_order(user.id, OrderRequest::ship_to(address))
        .await?;
    info!(order_id = %order.id, total = %order.total, "Order placed");
    output::json(&order)
}

/// Print the user's orders.
///
/// # Errors
///
/// Returns an error if nobody is signed in.
pub async fn list_orders(db: &Database) -> Result<(), Box<dyn std::error::Error>> {
    let user = signed_in(db).await?;
    output::json(&db.get_orders(user.id).await?)
}

/// Print one order with its items.
///
/// # Errors
///
/// Returns an error if the order does not exist.
pub async fn show_order(db: &Database, order_id: OrderId) -> Result<(), Box<dyn std::error::Error>> {
    output::json(&db.get_order_by_id(order_id).await?)
}

/// Review a product as the signed-in user.
///
/// # Errors
///
/// Returns an error if the rating is out of range or the user already
/// reviewed the product.
pub async fn add_review(
    db: &Database,
    product_id: ProductId,
    rating: u8,
    comment: String,
) -> Result<(), Box<dyn std::error::Error>> {
    let user = signed_in(db).await?;
    let review = db
        .add_review(user.id, product_id, NewReview::new(rating, comment)?)
        .await?;
    output::json(&review)
}

/// Print a product's reviews.
///
/// # Errors
///
/// Returns an error if the reviews cannot be read.
pub async fn list_reviews(
    db: &Database,
    product_id: ProductId,
) -> Result<(), Box<dyn std::error::Error>> {
    output::json(&db.get_product_reviews(product_id).await?)
}
