//! Sellers and products over the REST interface.

use bazarlink_core::{
    NewProduct, NewSeller, Price, Product, ProductId, Seller, SellerId, SellerStatus, UserId,
};
use chrono::{DateTime, Utc};
use reqwest::Method;
use serde::Serialize;

use super::client::{empty_representation, eq, fetch, first};
use super::{RemoteEngine, classify};
use crate::error::{DataError, Result};

const NEWEST_FIRST: &str = "created_at.desc";

#[derive(Serialize)]
struct SellerStatusPatch {
    status: SellerStatus,
    updated_at: DateTime<Utc>,
}

/// Mutable product columns; id, owner and creation time never change.
#[derive(Serialize)]
struct ProductPatch<'a> {
    title: &'a str,
    description: &'a str,
    price: Price,
    category: &'a str,
    inventory: u32,
    image_urls: &'a [String],
    updated_at: DateTime<Utc>,
}

/// Operand of the PostgREST `or=` filter matching title or description.
///
/// The query is matched literally: `%`, `_` and `\\` are escaped for
/// `ILIKE`, then quotes and backslashes for PostgREST's quoted value. The
/// service turns every `*` into `%`, so a literal `*` is sent as `_` and
/// the over-match is removed by [`RemoteEngine::find_products`].
fn text_filter(query: &str) -> String {
    let mut escaped = String::with_capacity(query.len());
    for c in query.chars() {
        match c {
            '\\' => escaped.push_str(r"\\\\"),
            '%' => escaped.push_str(r"\\%"),
            '_' => escaped.push_str(r"\\_"),
            '*' => escaped.push('_'),
            '"' => escaped.push_str(r#"\""#),
            c => escaped.push(c),
        }
    }
    format!("(title.ilike.\"*{escaped}*\",description.ilike.\"*{escaped}*\")")
}

impl RemoteEngine {
    pub(super) async fn seller_by_user(&self, user_id: UserId) -> Result<Option<Seller>> {
        let builder = self.table(Method::GET, "sellers").await?.query(&[
            ("select", "*".to_string()),
            ("user_id", eq(user_id)),
            ("limit", "1".to_string()),
        ]);
        let rows: Vec<Seller> = fetch(builder)
            .await
            .map_err(|err| classify("get_seller_profile", err))?;
        Ok(first(rows))
    }

    pub(super) async fn insert_seller(&self, new: NewSeller) -> Result<Seller> {
        new.validate()?;
        let builder = self.table(Method::POST, "sellers").await?.json(&new);
        let rows: Vec<Seller> = fetch(builder)
            .await
            .map_err(|err| classify("create_seller_profile", err))?;
        let seller = first(rows).ok_or_else(|| empty_representation("sellers"))?;
        tracing::info!(seller_id = %seller.id, user_id = %seller.user_id, "Seller profile created");
        Ok(seller)
    }

    pub(super) async fn set_seller_status(
        &self,
        seller_id: SellerId,
        status: SellerStatus,
    ) -> Result<Seller> {
        let builder = self
            .table(Method::PATCH, "sellers")
            .await?
            .query(&[("id", eq(seller_id))])
            .json(&SellerStatusPatch {
                status,
                updated_at: Utc::now(),
            });
        let rows: Vec<Seller> = fetch(builder)
            .await
            .map_err(|err| classify("update_seller_status", err))?;
        let seller = first(rows).ok_or_else(|| DataError::not_found("Seller", seller_id))?;
        tracing::info!(seller_id = %seller_id, status = %status, "Seller status updated");
        Ok(seller)
    }

    pub(super) async fn insert_product(&self, new: NewProduct) -> Result<Product> {
        new.validate()?;
        let builder = self.table(Method::POST, "products").await?.json(&new);
        let rows: Vec<Product> = fetch(builder)
            .await
            .map_err(|err| classify("create_product", err))?;
        first(rows).ok_or_else(|| empty_representation("products"))
    }

    pub(super) async fn products_of(&self, seller_id: SellerId) -> Result<Vec<Product>> {
        let builder = self.table(Method::GET, "products").await?.query(&[
            ("select", "*".to_string()),
            ("seller_id", eq(seller_id)),
            ("order", NEWEST_FIRST.to_string()),
        ]);
        fetch(builder)
            .await
            .map_err(|err| classify("get_seller_products", err))
    }

    pub(super) async fn patch_product(&self, product: Product) -> Result<Product> {
        product.validate()?;
        let builder = self
            .table(Method::PATCH, "products")
            .await?
            .query(&[("id", eq(product.id))])
            .json(&ProductPatch {
                title: &product.title,
                description: &product.description,
                price: product.price,
                category: &product.category,
                inventory: product.inventory,
                image_urls: &product.image_urls,
                updated_at: Utc::now(),
            });
        let rows: Vec<Product> = fetch(builder)
            .await
            .map_err(|err| classify("update_product", err))?;
        first(rows).ok_or_else(|| DataError::not_found("Product", product.id))
    }

    pub(super) async fn remove_product(&self, product_id: ProductId) -> Result<()> {
        let builder = self
            .table(Method::DELETE, "products")
            .await?
            .query(&[("id", eq(product_id))]);
        let rows: Vec<Product> = fetch(builder)
            .await
            .map_err(|err| classify("delete_product", err))?;
        if rows.is_empty() {
            return Err(DataError::not_found("Product", product_id));
        }
        Ok(())
    }

    pub(super) async fn all_products(&self) -> Result<Vec<Product>> {
        let builder = self
            .table(Method::GET, "products")
            .await?
            .query(&[("select", "*"), ("order", NEWEST_FIRST)]);
        let products: Vec<Product> = fetch(builder)
            .await
            .map_err(|err| classify("get_products", err))?;
        tracing::debug!(count = products.len(), "Listed products");
        Ok(products)
    }

    pub(super) async fn product(&self, product_id: ProductId) -> Result<Product> {
        let builder = self.table(Method::GET, "products").await?.query(&[
            ("select", "*".to_string()),
            ("id", eq(product_id)),
            ("limit", "1".to_string()),
        ]);
        let rows: Vec<Product> = fetch(builder)
            .await
            .map_err(|err| classify("get_product_by_id", err))?;
        first(rows).ok_or_else(|| DataError::not_found("Product", product_id))
    }

    pub(super) async fn find_products(
        &self,
        query: &str,
        category: Option<&str>,
    ) -> Result<Vec<Product>> {
        let mut params = vec![
            ("select", "*".to_string()),
            ("order", NEWEST_FIRST.to_string()),
        ];
        if !query.is_empty() {
            params.push(("or", text_filter(query)));
        }
        if let Some(category) = category {
            params.push(("category", eq(category)));
        }

        let builder = self.table(Method::GET, "products").await?.query(&params);
        let mut products: Vec<Product> = fetch(builder)
            .await
            .map_err(|err| classify("search_products", err))?;
        if query.contains('*') {
            let lowered = query.to_lowercase();
            products.retain(|product| product.matches_text(&lowered));
        }
        tracing::debug!(query = %query, count = products.len(), "Searched products");
        Ok(products)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::engine::DataEngine;
    use crate::remote::tests::engine_for;

    const SELLER_ID: &str = "11111111-2222-4333-8444-555555555555";
    const PRODUCT_ID: &str = "aaaaaaaa-bbbb-4ccc-8ddd-eeeeeeeeeeee";

    fn product_json() -> serde_json::Value {
        json!({
            "id": PRODUCT_ID,
            "seller_id": SELLER_ID,
            "title": "Brass Lamp",
            "description": "Hand polished",
            "price": 19.99,
            "category": "Home",
            "inventory": 4,
            "image_urls": [],
            "created_at": "2026-03-01T10:00:00Z",
            "updated_at": null
        })
    }

    #[test]
    fn test_text_filter_escapes_quotes() {
        assert_eq!(
            text_filter(r#"say "hi""#),
            r#"(title.ilike."*say \"hi\"*",description.ilike."*say \"hi\"*")"#
        );
    }

    #[test]
    fn test_text_filter_escapes_like_wildcards() {
        assert_eq!(
            text_filter(r"50%_off\"),
            r#"(title.ilike."*50\\%\\_off\\\\*",description.ilike."*50\\%\\_off\\\\*")"#
        );
        assert_eq!(
            text_filter("a*b"),
            r#"(title.ilike."*a_b*",description.ilike."*a_b*")"#
        );
    }

    #[tokio::test]
    async fn test_search_keeps_literal_star_only() {
        let server = MockServer::start().await;
        let mut starred = product_json();
        starred["title"] = json!("A*B print");
        let mut lookalike = product_json();
        lookalike["id"] = json!("bbbbbbbb-bbbb-4ccc-8ddd-eeeeeeeeeeee");
        lookalike["title"] = json!("AxB print");
        Mock::given(method("GET"))
            .and(path("/rest/v1/products"))
            .and(query_param(
                "or",
                r#"(title.ilike."*a_b*",description.ilike."*a_b*")"#,
            ))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!([starred, lookalike])),
            )
            .mount(&server)
            .await;

        let engine = engine_for(&server.uri());
        let hits = engine.search_products("a*b", None).await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].title, "A*B print");
    }

    #[tokio::test]
    async fn test_get_products_newest_first() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rest/v1/products"))
            .and(query_param("order", "created_at.desc"))
            .and(header("authorization", "Bearer anon-test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([product_json()])))
            .mount(&server)
            .await;

        let engine = engine_for(&server.uri());
        let products = engine.get_products().await.unwrap();
        assert_eq!(products.len(), 1);
        assert_eq!(products[0].title, "Brass Lamp");
        assert_eq!(products[0].price.to_string(), "19.99");
    }

    #[tokio::test]
    async fn test_get_product_by_id_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rest/v1/products"))
            .and(query_param("id", format!("eq.{PRODUCT_ID}")))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .mount(&server)
            .await;

        let engine = engine_for(&server.uri());
        let err = engine
            .get_product_by_id(PRODUCT_ID.parse().unwrap())
            .await
            .unwrap_err();
        assert!(matches!(err, DataError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_search_sends_filters() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rest/v1/products"))
            .and(query_param(
                "or",
                r#"(title.ilike."*lamp*",description.ilike."*lamp*")"#,
            ))
            .and(query_param("category", "eq.Home & Garden"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([product_json()])))
            .expect(1)
            .mount(&server)
            .await;

        let engine = engine_for(&server.uri());
        let hits = engine
            .search_products("lamp", Some("Home & Garden"))
            .await
            .unwrap();
        assert_eq!(hits.len(), 1);
    }

    #[tokio::test]
    async fn test_create_product_returns_row() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/rest/v1/products"))
            .and(header("prefer", "return=representation"))
            .and(body_partial_json(json!({ "title": "Brass Lamp", "price": "19.99" })))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!([product_json()])))
            .mount(&server)
            .await;

        let engine = engine_for(&server.uri());
        let new = NewProduct::new(
            SELLER_ID.parse().unwrap(),
            "Brass Lamp",
            "Hand polished",
            Price::new(rust_decimal::Decimal::new(1999, 2)).unwrap(),
            "Home",
            4,
        )
        .unwrap();
        let product = engine.create_product(new).await.unwrap();
        assert_eq!(product.id.to_string(), PRODUCT_ID);
    }

    #[tokio::test]
    async fn test_update_missing_product() {
        let server = MockServer::start().await;
        Mock::given(method("PATCH"))
            .and(path("/rest/v1/products"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .mount(&server)
            .await;

        let engine = engine_for(&server.uri());
        let product: Product = serde_json::from_value(product_json()).unwrap();
        let err = engine.update_product(product).await.unwrap_err();
        assert!(matches!(err, DataError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_delete_unknown_product() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/rest/v1/products"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .mount(&server)
            .await;

        let engine = engine_for(&server.uri());
        let err = engine
            .delete_product(ProductId::generate())
            .await
            .unwrap_err();
        assert!(matches!(err, DataError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_seller_lookup_empty_is_none() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rest/v1/sellers"))
            .and(query_param("limit", "1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .mount(&server)
            .await;

        let engine = engine_for(&server.uri());
        assert!(
            engine
                .get_seller_profile(UserId::generate())
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn test_approve_seller() {
        let server = MockServer::start().await;
        Mock::given(method("PATCH"))
            .and(path("/rest/v1/sellers"))
            .and(query_param("id", format!("eq.{SELLER_ID}")))
            .and(body_partial_json(json!({ "status": "approved" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
                "id": SELLER_ID,
                "user_id": "4a5c2f0e-8a39-4c56-9d7b-0f5f5ef0d6a1",
                "business_name": "Chai Corner",
                "status": "approved",
                "created_at": "2026-03-01T10:00:00Z",
                "updated_at": "2026-03-02T10:00:00Z"
            }])))
            .mount(&server)
            .await;

        let engine = engine_for(&server.uri());
        let seller = engine
            .update_seller_status(SELLER_ID.parse().unwrap(), SellerStatus::Approved)
            .await
            .unwrap();
        assert_eq!(seller.status, SellerStatus::Approved);
        assert!(seller.description.is_none());
    }
}
