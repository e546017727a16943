//! Engine backed by a hosted auth and database service.
//!
//! Auth calls go to the service's `/auth/v1` endpoints; data calls use the
//! REST interface at `/rest/v1/{table}` with filter query parameters and
//! embedded selects for joins. Operations that touch several rows (adding
//! to a cart, placing an order) call server-side functions under
//! `/rest/v1/rpc/` so they stay transactional.
//!
//! The schema these calls expect ships as `sql/setup.sql`.

mod auth;
mod catalog;
mod client;
mod commerce;
mod error;

pub use error::RemoteError;

use async_trait::async_trait;
use bazarlink_core::{
    AuthUser, CartItem, CartLine, NewProduct, NewReview, NewSeller, Order, OrderDetails, OrderId,
    OrderRequest, Password, Product, ProductId, ProductReview, Review, Seller, SellerId,
    SellerStatus, Session, UserId, UserMetadata,
};
use reqwest::header::{HeaderMap, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use tokio::sync::{OnceCell, RwLock};
use url::Url;

use crate::config::RemoteConfig;
use crate::engine::{DataEngine, EngineKind, SeedSummary};
use crate::error::{DataError, Result};

/// Tokens and user returned by a successful sign-in.
#[derive(Debug, Clone)]
struct RemoteSession {
    access_token: SecretString,
    user: AuthUser,
}

/// Engine that delegates every operation to the hosted service.
#[derive(Debug)]
pub struct RemoteEngine {
    client: reqwest::Client,
    base: Url,
    anon_key: SecretString,
    session: RwLock<Option<RemoteSession>>,
    ready: OnceCell<()>,
}

impl RemoteEngine {
    /// Create a client for the service described by `config`.
    ///
    /// No request is made until [`DataEngine::init`].
    ///
    /// # Errors
    ///
    /// Returns error if the URL does not parse, the key is not a valid
    /// header value, or the HTTP client fails to build.
    pub fn new(config: &RemoteConfig) -> std::result::Result<Self, RemoteError> {
        let mut base = Url::parse(config.url.trim())?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        let mut apikey = HeaderValue::from_str(config.anon_key.expose_secret())
            .map_err(|e| RemoteError::InvalidKey(e.to_string()))?;
        apikey.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert("apikey", apikey);

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .connect_timeout(config.timeout)
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            client,
            base,
            anon_key: config.anon_key.clone(),
            session: RwLock::new(None),
            ready: OnceCell::new(),
        })
    }

    /// The service base URL.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base
    }
}

/// Map a service failure onto the shared error taxonomy.
///
/// Only the mappings every operation shares live here; callers match their
/// own specific codes first.
fn classify(operation: &'static str, err: RemoteError) -> DataError {
    if err.is_missing_schema() {
        tracing::warn!(operation, error = %err, "Remote schema is missing a table or function");
        return DataError::NotImplemented(operation);
    }
    DataError::Remote(err)
}

#[async_trait]
impl DataEngine for RemoteEngine {
    fn kind(&self) -> EngineKind {
        EngineKind::Remote
    }

    async fn init(&self) -> Result<()> {
        self.ready
            .get_or_try_init(|| self.check_connectivity())
            .await
            .map(|_| ())
    }

    async fn get_session(&self) -> Result<Option<Session>> {
        self.current_session().await
    }

    async fn sign_in(&self, email: &str, password: &Password) -> Result<AuthUser> {
        self.password_sign_in(email, password).await
    }

    async fn sign_up(
        &self,
        email: &str,
        password: &Password,
        metadata: Option<UserMetadata>,
    ) -> Result<AuthUser> {
        self.register(email, password, metadata).await
    }

    async fn sign_out(&self) -> Result<()> {
        self.logout().await
    }

    async fn get_seller_profile(&self, user_id: UserId) -> Result<Option<Seller>> {
        self.seller_by_user(user_id).await
    }

    async fn create_seller_profile(&self, seller: NewSeller) -> Result<Seller> {
        self.insert_seller(seller).await
    }

    async fn update_seller_status(
        &self,
        seller_id: SellerId,
        status: SellerStatus,
    ) -> Result<Seller> {
        self.set_seller_status(seller_id, status).await
    }

    async fn create_product(&self, product: NewProduct) -> Result<Product> {
        self.insert_product(product).await
    }

    async fn get_seller_products(&self, seller_id: SellerId) -> Result<Vec<Product>> {
        self.products_of(seller_id).await
    }

    async fn update_product(&self, product: Product) -> Result<Product> {
        self.patch_product(product).await
    }

    async fn delete_product(&self, product_id: ProductId) -> Result<()> {
        self.remove_product(product_id).await
    }

    async fn get_products(&self) -> Result<Vec<Product>> {
        self.all_products().await
    }

    async fn get_product_by_id(&self, product_id: ProductId) -> Result<Product> {
        self.product(product_id).await
    }

    async fn search_products(&self, query: &str, category: Option<&str>) -> Result<Vec<Product>> {
        self.find_products(query, category).await
    }

    async fn add_to_cart(
        &self,
        user_id: UserId,
        product_id: ProductId,
        quantity: u32,
    ) -> Result<CartItem> {
        self.cart_add(user_id, product_id, quantity).await
    }

    async fn get_cart(&self, user_id: UserId) -> Result<Vec<CartLine>> {
        self.cart_lines(user_id).await
    }

    async fn update_cart_item(
        &self,
        user_id: UserId,
        product_id: ProductId,
        quantity: u32,
    ) -> Result<CartItem> {
        self.cart_set_quantity(user_id, product_id, quantity).await
    }

    async fn remove_cart_item(&self, user_id: UserId, product_id: ProductId) -> Result<()> {
        self.cart_remove(user_id, product_id).await
    }

    async fn create_order(&self, user_id: UserId, request: OrderRequest) -> Result<Order> {
        self.place_order(user_id, request).await
    }

    async fn get_orders(&self, user_id: UserId) -> Result<Vec<Order>> {
        self.orders_of(user_id).await
    }

    async fn get_order_by_id(&self, order_id: OrderId) -> Result<OrderDetails> {
        self.order_details(order_id).await
    }

    async fn add_review(
        &self,
        user_id: UserId,
        product_id: ProductId,
        review: NewReview,
    ) -> Result<Review> {
        self.insert_review(user_id, product_id, review).await
    }

    async fn get_product_reviews(&self, product_id: ProductId) -> Result<Vec<ProductReview>> {
        self.reviews_of(product_id).await
    }

    async fn seed_demo_data(&self) -> Result<Option<SeedSummary>> {
        Err(DataError::NotImplemented("seed_demo_data"))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) mod tests {
    use std::time::Duration;

    use super::*;

    /// Engine pointed at a mock server.
    pub(crate) fn engine_for(uri: &str) -> RemoteEngine {
        RemoteEngine::new(&RemoteConfig {
            url: uri.to_string(),
            anon_key: SecretString::from("anon-test-key"),
            timeout: Duration::from_secs(5),
        })
        .unwrap()
    }

    #[test]
    fn test_base_url_gets_trailing_slash() {
        let engine = engine_for("https://abc.supabase.co/base");
        assert_eq!(engine.base_url().as_str(), "https://abc.supabase.co/base/");
    }

    #[test]
    fn test_invalid_url() {
        let result = RemoteEngine::new(&RemoteConfig {
            url: "not a url".to_string(),
            anon_key: SecretString::from("k"),
            timeout: Duration::from_secs(1),
        });
        assert!(matches!(result, Err(RemoteError::InvalidUrl(_))));
    }

    #[test]
    fn test_invalid_key() {
        let result = RemoteEngine::new(&RemoteConfig {
            url: "https://abc.supabase.co".to_string(),
            anon_key: SecretString::from("bad\nkey"),
            timeout: Duration::from_secs(1),
        });
        assert!(matches!(result, Err(RemoteError::InvalidKey(_))));
    }

    #[test]
    fn test_classify_missing_schema() {
        let err = RemoteError::from_response(404, r#"{"code":"PGRST205","message":"no table"}"#);
        assert!(matches!(
            classify("get_cart", err),
            DataError::NotImplemented("get_cart")
        ));

        let err = RemoteError::from_response(500, r#"{"code":"XX000","message":"boom"}"#);
        assert!(matches!(classify("get_cart", err), DataError::Remote(_)));
    }

    #[tokio::test]
    async fn test_seed_is_not_implemented() {
        let engine = engine_for("https://abc.supabase.co");
        assert!(matches!(
            engine.seed_demo_data().await,
            Err(DataError::NotImplemented("seed_demo_data"))
        ));
        assert_eq!(engine.kind(), EngineKind::Remote);
    }
}
