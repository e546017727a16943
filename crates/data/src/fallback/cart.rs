//! Shopping cart rows.

use bazarlink_core::{
    CartItem, CartLine, Product, ProductId, UserId, ValidationError, check_quantity,
};

use super::{Tables, keys};
use crate::error::{DataError, Result};

impl Tables {
    pub(super) fn add_to_cart(
        &self,
        user_id: UserId,
        product_id: ProductId,
        quantity: u32,
    ) -> Result<CartItem> {
        let quantity = check_quantity(quantity)?;

        let _guard = self.lock()?;
        let mut rows: Vec<CartItem> = self.store.read(keys::CART_ITEMS)?;
        let row = if let Some(row) = rows.iter_mut().find(|row| row.is_for(user_id, product_id)) {
            row.quantity = row
                .quantity
                .checked_add(quantity)
                .ok_or(ValidationError::QuantityTooLarge { max: u32::MAX })?;
            row.clone()
        } else {
            let row = CartItem::new(user_id, product_id, quantity);
            rows.push(row.clone());
            row
        };
        self.store.write(keys::CART_ITEMS, &rows)?;

        tracing::debug!(user_id = %user_id, product_id = %product_id, quantity = row.quantity, "Cart updated");
        Ok(row)
    }

    pub(super) fn get_cart(&self, user_id: UserId) -> Result<Vec<CartLine>> {
        let rows: Vec<CartItem> = self.store.read(keys::CART_ITEMS)?;
        let products: Vec<Product> = self.store.read(keys::PRODUCTS)?;

        let lines: Vec<CartLine> = rows
            .into_iter()
            .filter(|row| row.user_id == user_id)
            .map(|item| CartLine {
                product: products.iter().find(|p| p.id == item.product_id).cloned(),
                item,
            })
            .collect();
        tracing::debug!(user_id = %user_id, count = lines.len(), "Loaded cart");
        Ok(lines)
    }

    pub(super) fn update_cart_item(
        &self,
        user_id: UserId,
        product_id: ProductId,
        quantity: u32,
    ) -> Result<CartItem> {
        let quantity = check_quantity(quantity)?;

        let _guard = self.lock()?;
        let mut rows: Vec<CartItem> = self.store.read(keys::CART_ITEMS)?;
        let row = rows
            .iter_mut()
            .find(|row| row.is_for(user_id, product_id))
            .ok_or_else(|| DataError::not_found("Cart item for product", product_id))?;
        row.quantity = quantity;
        let updated = row.clone();
        self.store.write(keys::CART_ITEMS, &rows)?;
        Ok(updated)
    }

    pub(super) fn remove_cart_item(&self, user_id: UserId, product_id: ProductId) -> Result<()> {
        let _guard = self.lock()?;
        let mut rows: Vec<CartItem> = self.store.read(keys::CART_ITEMS)?;
        let before = rows.len();
        rows.retain(|row| !row.is_for(user_id, product_id));
        if rows.len() == before {
            return Err(DataError::not_found("Cart item for product", product_id));
        }
        self.store.write(keys::CART_ITEMS, &rows)?;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use bazarlink_core::{NewProduct, Price, SellerId};

    use super::*;
    use crate::engine::DataEngine;
    use crate::fallback::FallbackEngine;

    async fn engine_with_product() -> (FallbackEngine, Product) {
        let engine = FallbackEngine::in_memory();
        engine.init().await.unwrap();
        let product = engine
            .create_product(
                NewProduct::new(
                    SellerId::generate(),
                    "Tea Tin",
                    "Loose leaf",
                    Price::from_units(5),
                    "Grocery",
                    30,
                )
                .unwrap(),
            )
            .await
            .unwrap();
        (engine, product)
    }

    #[tokio::test]
    async fn test_add_merges_same_product() {
        let (engine, product) = engine_with_product().await;
        let user = UserId::generate();

        engine.add_to_cart(user, product.id, 2).await.unwrap();
        let merged = engine.add_to_cart(user, product.id, 3).await.unwrap();
        assert_eq!(merged.quantity, 5);

        let cart = engine.get_cart(user).await.unwrap();
        assert_eq!(cart.len(), 1);
        assert_eq!(cart[0].item.quantity, 5);
        assert_eq!(cart[0].product.as_ref().unwrap().id, product.id);
    }

    #[tokio::test]
    async fn test_carts_are_per_user() {
        let (engine, product) = engine_with_product().await;
        let ann = UserId::generate();
        let bob = UserId::generate();

        engine.add_to_cart(ann, product.id, 1).await.unwrap();
        engine.add_to_cart(bob, product.id, 4).await.unwrap();

        assert_eq!(engine.get_cart(ann).await.unwrap()[0].item.quantity, 1);
        assert_eq!(engine.get_cart(bob).await.unwrap()[0].item.quantity, 4);
    }

    #[tokio::test]
    async fn test_zero_quantity_rejected() {
        let (engine, product) = engine_with_product().await;
        let user = UserId::generate();
        let err = engine.add_to_cart(user, product.id, 0).await.unwrap_err();
        assert!(matches!(err, DataError::Validation(_)));

        engine.add_to_cart(user, product.id, 1).await.unwrap();
        let err = engine
            .update_cart_item(user, product.id, 0)
            .await
            .unwrap_err();
        assert!(matches!(err, DataError::Validation(_)));
    }

    #[tokio::test]
    async fn test_merge_past_max_quantity_rejected() {
        let (engine, product) = engine_with_product().await;
        let user = UserId::generate();
        engine.add_to_cart(user, product.id, u32::MAX - 1).await.unwrap();

        let err = engine.add_to_cart(user, product.id, 2).await.unwrap_err();
        assert!(matches!(
            err,
            DataError::Validation(ValidationError::QuantityTooLarge { max: u32::MAX })
        ));
        assert_eq!(
            engine.get_cart(user).await.unwrap()[0].item.quantity,
            u32::MAX - 1
        );

        let merged = engine.add_to_cart(user, product.id, 1).await.unwrap();
        assert_eq!(merged.quantity, u32::MAX);
    }

    #[tokio::test]
    async fn test_update_and_remove() {
        let (engine, product) = engine_with_product().await;
        let user = UserId::generate();
        engine.add_to_cart(user, product.id, 2).await.unwrap();

        let updated = engine.update_cart_item(user, product.id, 7).await.unwrap();
        assert_eq!(updated.quantity, 7);

        engine.remove_cart_item(user, product.id).await.unwrap();
        assert!(engine.get_cart(user).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_missing_row_is_not_found() {
        let (engine, product) = engine_with_product().await;
        let user = UserId::generate();

        let err = engine
            .update_cart_item(user, product.id, 1)
            .await
            .unwrap_err();
        assert!(matches!(err, DataError::NotFound(_)));

        let err = engine.remove_cart_item(user, product.id).await.unwrap_err();
        assert!(matches!(err, DataError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_deleted_product_joins_as_none() {
        let (engine, product) = engine_with_product().await;
        let user = UserId::generate();
        engine.add_to_cart(user, product.id, 1).await.unwrap();
        engine.delete_product(product.id).await.unwrap();

        let cart = engine.get_cart(user).await.unwrap();
        assert_eq!(cart.len(), 1);
        assert!(cart[0].product.is_none());
    }
}
