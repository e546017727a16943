//! Seller profiles and product listings.

use bazarlink_core::{
    NewProduct, NewSeller, Product, ProductId, Seller, SellerId, SellerStatus, UserId,
};
use chrono::Utc;

use super::{Tables, keys, newest_first};
use crate::error::{DataError, Result};

impl Tables {
    pub(super) fn get_seller_profile(&self, user_id: UserId) -> Result<Option<Seller>> {
        let sellers: Vec<Seller> = self.store.read(keys::SELLERS)?;
        Ok(sellers.into_iter().find(|seller| seller.user_id == user_id))
    }

    pub(super) fn create_seller_profile(&self, new: NewSeller) -> Result<Seller> {
        new.validate()?;

        let _guard = self.lock()?;
        let mut sellers: Vec<Seller> = self.store.read(keys::SELLERS)?;
        let seller = Seller::from_new(new);
        sellers.push(seller.clone());
        self.store.write(keys::SELLERS, &sellers)?;

        tracing::info!(seller_id = %seller.id, user_id = %seller.user_id, "Seller profile created");
        Ok(seller)
    }

    pub(super) fn update_seller_status(
        &self,
        seller_id: SellerId,
        status: SellerStatus,
    ) -> Result<Seller> {
        let _guard = self.lock()?;
        let mut sellers: Vec<Seller> = self.store.read(keys::SELLERS)?;
        let seller = sellers
            .iter_mut()
            .find(|seller| seller.id == seller_id)
            .ok_or_else(|| DataError::not_found("Seller", seller_id))?;

        seller.status = status;
        seller.updated_at = Some(Utc::now());
        let updated = seller.clone();
        self.store.write(keys::SELLERS, &sellers)?;

        tracing::info!(seller_id = %seller_id, status = %status, "Seller status updated");
        Ok(updated)
    }

    pub(super) fn create_product(&self, new: NewProduct) -> Result<Product> {
        new.validate()?;

        let _guard = self.lock()?;
        let mut products: Vec<Product> = self.store.read(keys::PRODUCTS)?;
        let product = Product::from_new(new);
        products.push(product.clone());
        self.store.write(keys::PRODUCTS, &products)?;

        tracing::debug!(product_id = %product.id, "Product created");
        Ok(product)
    }

    pub(super) fn get_seller_products(&self, seller_id: SellerId) -> Result<Vec<Product>> {
        let mut products: Vec<Product> = self.store.read(keys::PRODUCTS)?;
        products.retain(|product| product.seller_id == seller_id);
        newest_first(&mut products);
        Ok(products)
    }

    pub(super) fn update_product(&self, product: Product) -> Result<Product> {
        product.validate()?;

        let _guard = self.lock()?;
        let mut products: Vec<Product> = self.store.read(keys::PRODUCTS)?;
        let slot = products
            .iter_mut()
            .find(|existing| existing.id == product.id)
            .ok_or_else(|| DataError::not_found("Product", product.id))?;

        *slot = Product {
            created_at: slot.created_at,
            updated_at: Some(Utc::now()),
            ..product
        };
        let updated = slot.clone();
        self.store.write(keys::PRODUCTS, &products)?;

        tracing::debug!(product_id = %updated.id, "Product updated");
        Ok(updated)
    }

    pub(super) fn delete_product(&self, product_id: ProductId) -> Result<()> {
        let _guard = self.lock()?;
        let mut products: Vec<Product> = self.store.read(keys::PRODUCTS)?;
        let before = products.len();
        products.retain(|product| product.id != product_id);
        if products.len() == before {
            return Err(DataError::not_found("Product", product_id));
        }
        self.store.write(keys::PRODUCTS, &products)?;

        tracing::debug!(product_id = %product_id, "Product deleted");
        Ok(())
    }

    pub(super) fn get_products(&self) -> Result<Vec<Product>> {
        let mut products: Vec<Product> = self.store.read(keys::PRODUCTS)?;
        newest_first(&mut products);
        tracing::debug!(count = products.len(), "Listed products");
        Ok(products)
    }

    pub(super) fn get_product_by_id(&self, product_id: ProductId) -> Result<Product> {
        let products: Vec<Product> = self.store.read(keys::PRODUCTS)?;
        products
            .into_iter()
            .find(|product| product.id == product_id)
            .ok_or_else(|| DataError::not_found("Product", product_id))
    }

    pub(super) fn search_products(
        &self,
        query: &str,
        category: Option<&str>,
    ) -> Result<Vec<Product>> {
        let lowered = query.to_lowercase();
        let mut products: Vec<Product> = self.store.read(keys::PRODUCTS)?;
        products.retain(|product| {
            product.matches_text(&lowered) && category.is_none_or(|c| product.category == c)
        });
        newest_first(&mut products);
        tracing::debug!(query = %query, count = products.len(), "Searched products");
        Ok(products)
    }
}
