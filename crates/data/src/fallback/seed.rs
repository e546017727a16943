//! Demo account and catalog for local development.

use bazarlink_core::{
    Email, NewProduct, NewSeller, Password, Price, Product, Seller, SellerStatus, User,
    ValidationError,
};
use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;

use super::{Tables, keys};
use crate::engine::SeedSummary;
use crate::error::Result;

/// Email of the seeded account.
pub const DEMO_EMAIL: &str = "test@example.com";
/// Password of the seeded account.
pub const DEMO_PASSWORD: &str = "password123";

/// (title, description, price in cents, category, inventory)
const DEMO_PRODUCTS: [DemoRow; 3] = [
    (
        "Test Product 1",
        "This is a test product with a detailed description. The product is made with high-quality materials and is perfect for everyday use.",
        1999,
        "Electronics",
        10,
    ),
    (
        "Test Product 2",
        "Another test product with different specifications. Great for gifting to friends and family.",
        2999,
        "Home & Garden",
        5,
    ),
    (
        "Test Product 3",
        "Premium test product with advanced features. Limited edition with special packaging.",
        4999,
        "Fashion",
        2,
    ),
];

impl Tables {
    /// Seed one user, one seller and three products if no user exists.
    pub(super) fn seed_demo_data(&self) -> Result<Option<SeedSummary>> {
        let _guard = self.lock()?;
        let users: Vec<User> = self.store.read(keys::USERS)?;
        if !users.is_empty() {
            tracing::debug!(users = users.len(), "Store already has users, skipping seed");
            return Ok(None);
        }

        let email = Email::parse(DEMO_EMAIL).map_err(ValidationError::from)?;
        let user = User::new(email, Password::from(DEMO_PASSWORD), None);

        let mut new_seller = NewSeller::new(user.id, "Test Store")?;
        new_seller.description = Some("This is a test store for development purposes".to_string());
        new_seller.status = SellerStatus::Approved;
        let seller = Seller::from_new(new_seller);

        let now = Utc::now();
        let products = DEMO_PRODUCTS
            .iter()
            .zip(0_i64..)
            .map(|(row, age)| demo_product(&seller, *row, age, now - Duration::days(age)))
            .collect::<std::result::Result<Vec<_>, _>>()?;

        let summary = SeedSummary {
            user: user.id,
            seller: seller.id,
            products: products.iter().map(|p| p.id).collect(),
        };

        let mut sellers: Vec<Seller> = self.store.read(keys::SELLERS)?;
        sellers.push(seller);
        let mut catalog: Vec<Product> = self.store.read(keys::PRODUCTS)?;
        catalog.extend(products);

        self.store.write(keys::USERS, &[user])?;
        self.store.write(keys::SELLERS, &sellers)?;
        self.store.write(keys::PRODUCTS, &catalog)?;

        tracing::info!(user_id = %summary.user, products = summary.products.len(), "Seeded demo data");
        Ok(Some(summary))
    }
}

type DemoRow = (&'static str, &'static str, i64, &'static str, u32);

fn demo_product(
    seller: &Seller,
    (title, description, cents, category, inventory): DemoRow,
    index: i64,
    created_at: DateTime<Utc>,
) -> std::result::Result<Product, ValidationError> {
    let price = Price::new(Decimal::new(cents, 2))?;
    let image = format!(
        "https://via.placeholder.com/300x300?text=Product+{}",
        index + 1
    );
    let new = NewProduct::new(seller.id, title, description, price, category, inventory)?
        .with_images([image]);
    Ok(Product::from_new_at(new, created_at))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::engine::DataEngine;
    use crate::fallback::FallbackEngine;

    #[tokio::test]
    async fn test_seed_creates_demo_account() {
        let engine = FallbackEngine::in_memory();
        engine.init().await.unwrap();
        let summary = engine.seed_demo_data().await.unwrap().unwrap();

        let user = engine
            .sign_in(DEMO_EMAIL, &Password::from(DEMO_PASSWORD))
            .await
            .unwrap();
        assert_eq!(user.id, summary.user);

        let seller = engine.get_seller_profile(user.id).await.unwrap().unwrap();
        assert_eq!(seller.business_name, "Test Store");

        let titles: Vec<String> = engine
            .get_seller_products(seller.id)
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.title)
            .collect();
        assert_eq!(titles, ["Test Product 1", "Test Product 2", "Test Product 3"]);
    }

    #[tokio::test]
    async fn test_seed_prices_are_decimal() {
        let engine = FallbackEngine::in_memory();
        engine.seed_demo_data().await.unwrap();
        let hits = engine.search_products("premium", None).await.unwrap();
        assert_eq!(hits[0].price.amount(), Decimal::new(4999, 2));
        assert_eq!(hits[0].image_urls.len(), 1);
    }

    #[tokio::test]
    async fn test_seed_is_idempotent() {
        let engine = FallbackEngine::in_memory();
        assert!(engine.seed_demo_data().await.unwrap().is_some());
        assert!(engine.seed_demo_data().await.unwrap().is_none());
        assert_eq!(engine.get_products().await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_seed_skips_populated_store() {
        let engine = FallbackEngine::in_memory();
        engine
            .sign_up("ann@example.com", &Password::from("pw"), None)
            .await
            .unwrap();
        assert!(engine.seed_demo_data().await.unwrap().is_none());
        assert!(engine.get_products().await.unwrap().is_empty());
    }
}
