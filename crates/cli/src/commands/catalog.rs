//! Seller and product commands.

use bazarlink_core::{NewProduct, NewSeller, Price, ProductId, SellerId, SellerStatus};
use bazarlink_data::Database;
use rust_decimal::Decimal;
use tracing::info;

use super::{output, signed_in};

/// Fields of a product listed from the command line.
pub struct Listing {
    pub title: String,
    pub description: String,
    pub price: Decimal,
    pub category: String,
    pub inventory: u32,
}

/// Print the signed-in user's seller profile.
///
/// # Errors
///
/// Returns an error if nobody is signed in or the user is not a seller.
pub async fn show_seller(db: &Database) -> Result<(), Box<dyn std::error::Error>> {
    let user = signed_in(db).await?;
    let seller = db
        .get_seller_profile(user.id)
        .await?
        .ok_or("No seller profile for the signed-in user")?;
    output::json(&seller)
}

/// Create a seller profile for the signed-in user.
///
/// # Errors
///
/// Returns an error if nobody is signed in or the name is blank.
pub async fn create_seller(
    db: &Database,
    business_name: String,
    description: Option<String>,
    contact_email: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let user = signed_in(db).await?;
    let mut new = NewSeller::new(user.id, business_name)?;
    new.description = description;
    new.contact_email = contact_email;

    let seller = db.create_seller_profile(new).await?;
    output::json(&seller)
}

/// Approve a pending seller.
///
/// # Errors
///
/// Returns an error if the seller does not exist.
pub async fn approve_seller(
    db: &Database,
    seller_id: SellerId,
) -> Result<(), Box<dyn std::error::Error>> {
    let seller = db
        .update_seller_status(seller_id, SellerStatus::Approved)
        .await?;
    info!(seller_id = %seller.id, "Seller approved");
    output::json(&seller)
}

/// Print every product.
///
/// # Errors
///
/// Returns an error if the products cannot be read.
pub async fn list_products(db: &Database) -> Result<(), Box<dyn std::error::Error>> {
    output::json(&db.get_products().await?)
}

/// Print products matching `query`.
///
/// # Errors
///
/// Returns an error if the products cannot be read.
pub async fn search_products(
    db: &Database,
    query: &str,
    category: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    output::json(&db.search_products(query, category).await?)
}

/// Print one product.
///
/// # Errors
///
/// Returns an error if the product does not exist.
pub async fn show_product(
    db: &Database,
    product_id: ProductId,
) -> Result<(), Box<dyn std::error::Error>> {
    output::json(&db.get_product_by_id(product_id).await?)
}

/// List a product under the signed-in user's seller profile.
///
/// # Errors
///
/// Returns an error if nobody is signed in, the user has no seller
/// profile, or the listing is invalid.
pub async fn add_product(db: &Database, listing: Listing) -> Result<(), Box<dyn std::error::Error>> {
    let user = signed_in(db).await?;
    let seller = db
        .get_seller_profile(user.id)
        .await?
        .ok_or("Create a seller profile first (`bazarlink seller create`)")?;

    let new = NewProduct::new(
        seller.id,
        listing.title,
        listing.description,
        Price::new(listing.price)?,
        listing.category,
        listing.inventory,
    )?;
    let product = db.create_product(new).await?;
    info!(product_id = %product.id, "Product listed");
    output::json(&product)
}

/// Delete a product.
///
/// # Errors
///
/// Returns an error if the product does not exist.
pub async fn delete_product(
    db: &Database,
    product_id: ProductId,
) -> Result<(), Box<dyn std::error::Error>> {
    db.delete_product(product_id).await?;
    output::line(&format!("Deleted product {product_id}"));
    Ok(())
}
