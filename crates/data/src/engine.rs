//! The operation set shared by every storage engine.

use async_trait::async_trait;
use bazarlink_core::{
    AuthUser, CartItem, CartLine, NewProduct, NewReview, NewSeller, Order, OrderDetails,
    OrderRequest, OrderId, Password, Product, ProductId, ProductReview, Review, Seller, SellerId,
    SellerStatus, Session, UserId, UserMetadata,
};

use crate::error::Result;

/// Which engine a [`Database`](crate::Database) selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EngineKind {
    /// Local record store, no network.
    Fallback,
    /// Hosted auth and database service.
    Remote,
}

impl std::fmt::Display for EngineKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Fallback => write!(f, "fallback"),
            Self::Remote => write!(f, "remote"),
        }
    }
}

/// Summary of what [`DataEngine::seed_demo_data`] created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedSummary {
    pub user: UserId,
    pub seller: SellerId,
    pub products: Vec<ProductId>,
}

/// Storage engine contract.
///
/// Both engines return the same [`DataError`](crate::DataError) variants for
/// the same situations, so callers never branch on the engine in use.
#[async_trait]
pub trait DataEngine: Send + Sync {
    /// The engine's kind.
    fn kind(&self) -> EngineKind;

    /// Prepare the engine. Safe to call more than once.
    async fn init(&self) -> Result<()>;

    // -- Session ---------------------------------------------------------

    /// The signed-in user, if any.
    async fn get_session(&self) -> Result<Option<Session>>;

    /// Sign in with an exact email and password match.
    async fn sign_in(&self, email: &str, password: &Password) -> Result<AuthUser>;

    /// Create an account and sign it in.
    async fn sign_up(
        &self,
        email: &str,
        password: &Password,
        metadata: Option<UserMetadata>,
    ) -> Result<AuthUser>;

    /// Forget the current session. Succeeds when nobody is signed in.
    async fn sign_out(&self) -> Result<()>;

    // -- Sellers ---------------------------------------------------------

    /// The seller profile owned by `user_id`.
    async fn get_seller_profile(&self, user_id: UserId) -> Result<Option<Seller>>;

    /// Register a seller profile.
    async fn create_seller_profile(&self, seller: NewSeller) -> Result<Seller>;

    /// Change a seller's onboarding status.
    async fn update_seller_status(&self, seller_id: SellerId, status: SellerStatus)
    -> Result<Seller>;

    // -- Products --------------------------------------------------------

    /// List a new product.
    async fn create_product(&self, product: NewProduct) -> Result<Product>;

    /// Products of one seller, newest first.
    async fn get_seller_products(&self, seller_id: SellerId) -> Result<Vec<Product>>;

    /// Replace a product's fields, keeping its id and creation time.
    async fn update_product(&self, product: Product) -> Result<Product>;

    /// Delete a product.
    async fn delete_product(&self, product_id: ProductId) -> Result<()>;

    /// All products, newest first.
    async fn get_products(&self) -> Result<Vec<Product>>;

    /// One product.
    async fn get_product_by_id(&self, product_id: ProductId) -> Result<Product>;

    /// Case-insensitive text search over title and description, optionally
    /// narrowed to an exact category. Newest first.
    async fn search_products(&self, query: &str, category: Option<&str>) -> Result<Vec<Product>>;

    // -- Cart ------------------------------------------------------------

    /// Add `quantity` units, merging with an existing row for the product.
    async fn add_to_cart(
        &self,
        user_id: UserId,
        product_id: ProductId,
        quantity: u32,
    ) -> Result<CartItem>;

    /// The user's cart joined to products.
    async fn get_cart(&self, user_id: UserId) -> Result<Vec<CartLine>>;

    /// Set the quantity of an existing cart row.
    async fn update_cart_item(
        &self,
        user_id: UserId,
        product_id: ProductId,
        quantity: u32,
    ) -> Result<CartItem>;

    /// Remove a cart row.
    async fn remove_cart_item(&self, user_id: UserId, product_id: ProductId) -> Result<()>;

    // -- Orders ----------------------------------------------------------

    /// Turn the user's cart into a pending order.
    async fn create_order(&self, user_id: UserId, request: OrderRequest) -> Result<Order>;

    /// The user's orders, newest first.
    async fn get_orders(&self, user_id: UserId) -> Result<Vec<Order>>;

    /// One order with its items.
    async fn get_order_by_id(&self, order_id: OrderId) -> Result<OrderDetails>;

    // -- Reviews ---------------------------------------------------------

    /// Review a product; one review per user and product.
    async fn add_review(
        &self,
        user_id: UserId,
        product_id: ProductId,
        review: NewReview,
    ) -> Result<Review>;

    /// Reviews of a product with their authors.
    async fn get_product_reviews(&self, product_id: ProductId) -> Result<Vec<ProductReview>>;

    // -- Maintenance -----------------------------------------------------

    /// Populate an empty store with a demo account, seller and products.
    ///
    /// Returns `None` when users already exist.
    async fn seed_demo_data(&self) -> Result<Option<SeedSummary>>;
}
