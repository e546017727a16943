//! Local engine over the persistent record store.
//!
//! Every operation reads whole collections, computes in memory and writes
//! whole collections back. Relations are resolved by id lookups across
//! collections:
//!
//! - cart lines and order lines join to `bazarlink_products`
//! - reviews join to `bazarlink_users` (id and email only)
//!
//! Mutations hold an engine-level lock for their whole read-modify-write
//! cycle, so concurrent callers on one engine cannot lose each other's
//! updates. Order placement writes its four collections through one
//! [`Batch`](crate::store::Batch).

mod auth;
mod cart;
mod catalog;
mod orders;
mod reviews;
mod seed;

pub use seed::{DEMO_EMAIL, DEMO_PASSWORD};

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use bazarlink_core::{
    AuthUser, CartItem, CartLine, NewProduct, NewReview, NewSeller, Order, OrderDetails, OrderId,
    OrderRequest, Password, Product, ProductId, ProductReview, Review, Seller, SellerId,
    SellerStatus, Session, UserId, UserMetadata,
};

use crate::engine::{DataEngine, EngineKind, SeedSummary};
use crate::error::Result;
use crate::store::{FileMedium, RecordStore, StoreError};

/// Storage keys of the fallback engine.
pub mod keys {
    pub const USERS: &str = "bazarlink_users";
    pub const SELLERS: &str = "bazarlink_sellers";
    pub const PRODUCTS: &str = "bazarlink_products";
    pub const CART_ITEMS: &str = "bazarlink_cart_items";
    pub const ORDERS: &str = "bazarlink_orders";
    pub const ORDER_ITEMS: &str = "bazarlink_order_items";
    pub const REVIEWS: &str = "bazarlink_reviews";

    /// Single redacted user, not an array.
    pub const CURRENT_USER: &str = "bazarlink_current_user";

    /// Every array-valued collection.
    pub const COLLECTIONS: [&str; 7] = [
        USERS,
        SELLERS,
        PRODUCTS,
        CART_ITEMS,
        ORDERS,
        ORDER_ITEMS,
        REVIEWS,
    ];
}

/// Collections plus the lock serializing their mutation.
#[derive(Debug)]
struct Tables {
    store: RecordStore,
    write_lock: Mutex<()>,
}

impl Tables {
    fn lock(&self) -> std::result::Result<MutexGuard<'_, ()>, StoreError> {
        self.write_lock.lock().map_err(|_| StoreError::Poisoned)
    }

    /// Write `[]` under every collection key that was never written.
    fn ensure_collections(&self) -> Result<()> {
        let _guard = self.lock()?;
        for key in keys::COLLECTIONS {
            if !self.store.contains(key)? {
                self.store.write::<()>(key, &[])?;
            }
        }
        Ok(())
    }
}

/// Engine that keeps every collection in a local [`RecordStore`].
#[derive(Debug)]
pub struct FallbackEngine {
    tables: Tables,
    seed_on_init: bool,
}

impl FallbackEngine {
    /// Engine over an existing record store.
    #[must_use]
    pub fn new(store: RecordStore) -> Self {
        Self {
            tables: Tables {
                store,
                write_lock: Mutex::new(()),
            },
            seed_on_init: false,
        }
    }

    /// Engine persisting to `<dir>/<key>.json` files.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Io` if the directory cannot be created.
    pub fn open(dir: &Path) -> std::result::Result<Self, StoreError> {
        Ok(Self::new(RecordStore::new(FileMedium::open(dir)?)))
    }

    /// Engine keeping everything in process memory.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(RecordStore::in_memory())
    }

    /// Seed demo data during [`DataEngine::init`] when the store is empty.
    #[must_use]
    pub const fn with_seed_on_init(mut self, seed: bool) -> Self {
        self.seed_on_init = seed;
        self
    }

    /// The underlying record store.
    #[must_use]
    pub const fn store(&self) -> &RecordStore {
        &self.tables.store
    }
}

#[async_trait]
impl DataEngine for FallbackEngine {
    fn kind(&self) -> EngineKind {
        EngineKind::Fallback
    }

    async fn init(&self) -> Result<()> {
        self.tables.ensure_collections()?;
        if self.seed_on_init {
            self.tables.seed_demo_data()?;
        }
        Ok(())
    }

    async fn get_session(&self) -> Result<Option<Session>> {
        self.tables.get_session()
    }

    async fn sign_in(&self, email: &str, password: &Password) -> Result<AuthUser> {
        self.tables.sign_in(email, password)
    }

    async fn sign_up(
        &self,
        email: &str,
        password: &Password,
        metadata: Option<UserMetadata>,
    ) -> Result<AuthUser> {
        self.tables.sign_up(email, password, metadata)
    }

    async fn sign_out(&self) -> Result<()> {
        self.tables.sign_out()
    }

    async fn get_seller_profile(&self, user_id: UserId) -> Result<Option<Seller>> {
        self.tables.get_seller_profile(user_id)
    }

    async fn create_seller_profile(&self, seller: NewSeller) -> Result<Seller> {
        self.tables.create_seller_profile(seller)
    }

    async fn update_seller_status(
        &self,
        seller_id: SellerId,
        status: SellerStatus,
    ) -> Result<Seller> {
        self.tables.update_seller_status(seller_id, status)
    }

    async fn create_product(&self, product: NewProduct) -> Result<Product> {
        self.tables.create_product(product)
    }

    async fn get_seller_products(&self, seller_id: SellerId) -> Result<Vec<Product>> {
        self.tables.get_seller_products(seller_id)
    }

    async fn update_product(&self, product: Product) -> Result<Product> {
        self.tables.update_product(product)
    }

    async fn delete_product(&self, product_id: ProductId) -> Result<()> {
        self.tables.delete_product(product_id)
    }

    async fn get_products(&self) -> Result<Vec<Product>> {
        self.tables.get_products()
    }

    async fn get_product_by_id(&self, product_id: ProductId) -> Result<Product> {
        self.tables.get_product_by_id(product_id)
    }

    async fn search_products(&self, query: &str, category: Option<&str>) -> Result<Vec<Product>> {
        self.tables.search_products(query, category)
    }

    async fn add_to_cart(
        &self,
        user_id: UserId,
        product_id: ProductId,
        quantity: u32,
    ) -> Result<CartItem> {
        self.tables.add_to_cart(user_id, product_id, quantity)
    }

    async fn get_cart(&self, user_id: UserId) -> Result<Vec<CartLine>> {
        self.tables.get_cart(user_id)
    }

    async fn update_cart_item(
        &self,
        user_id: UserId,
        product_id: ProductId,
        quantity: u32,
    ) -> Result<CartItem> {
        self.tables.update_cart_item(user_id, product_id, quantity)
    }

    async fn remove_cart_item(&self, user_id: UserId, product_id: ProductId) -> Result<()> {
        self.tables.remove_cart_item(user_id, product_id)
    }

    async fn create_order(&self, user_id: UserId, request: OrderRequest) -> Result<Order> {
        self.tables.create_order(user_id, request)
    }

    async fn get_orders(&self, user_id: UserId) -> Result<Vec<Order>> {
        self.tables.get_orders(user_id)
    }

    async fn get_order_by_id(&self, order_id: OrderId) -> Result<OrderDetails> {
        self.tables.get_order_by_id(order_id)
    }

    async fn add_review(
        &self,
        user_id: UserId,
        product_id: ProductId,
        review: NewReview,
    ) -> Result<Review> {
        self.tables.add_review(user_id, product_id, review)
    }

    async fn get_product_reviews(&self, product_id: ProductId) -> Result<Vec<ProductReview>> {
        self.tables.get_product_reviews(product_id)
    }

    async fn seed_demo_data(&self) -> Result<Option<SeedSummary>> {
        self.tables.seed_demo_data()
    }
}

/// Sort products newest first; equal timestamps keep insertion order.
fn newest_first(products: &mut [Product]) {
    products.sort_by(|a, b| b.created_at.cmp(&a.created_at));
}
