//! Order placement and history.

use bazarlink_core::{
    CartItem, Order, OrderDetails, OrderId, OrderItem, OrderLine, OrderRequest, Product, UserId,
    ValidationError,
};
use rust_decimal::Decimal;

use super::{Tables, keys};
use crate::error::{DataError, Result};
use crate::store::Batch;

impl Tables {
    /// Place an order from the user's cart.
    ///
    /// Cart rows whose product no longer exists are dropped without
    /// contributing to the total or producing an item. The new order, its
    /// items, the decremented inventory and the emptied cart are committed
    /// as one batch. A total too large for a decimal is a validation error
    /// and nothing is written.
    pub(super) fn create_order(&self, user_id: UserId, request: OrderRequest) -> Result<Order> {
        let _guard = self.lock()?;
        let mut cart: Vec<CartItem> = self.store.read(keys::CART_ITEMS)?;
        let mut products: Vec<Product> = self.store.read(keys::PRODUCTS)?;
        let mut orders: Vec<Order> = self.store.read(keys::ORDERS)?;
        let mut order_items: Vec<OrderItem> = self.store.read(keys::ORDER_ITEMS)?;

        let mut order = Order::new(user_id, Decimal::ZERO, request.shipping_address);
        let mut total = Decimal::ZERO;
        let mut placed = 0_usize;

        for row in cart.iter().filter(|row| row.user_id == user_id) {
            let Some(product) = products.iter_mut().find(|p| p.id == row.product_id) else {
                tracing::warn!(product_id = %row.product_id, "Skipping cart row for missing product");
                continue;
            };
            let item = OrderItem::snapshot(order.id, product, row.quantity);
            total = item
                .line_total()
                .and_then(|line| total.checked_add(line))
                .ok_or(ValidationError::TotalTooLarge)?;
            product.inventory = product.inventory.saturating_sub(row.quantity);
            order_items.push(item);
            placed += 1;
        }

        order.total = total;
        orders.push(order.clone());
        cart.retain(|row| row.user_id != user_id);

        let mut batch = Batch::new();
        batch.put(keys::ORDERS, &orders)?;
        batch.put(keys::ORDER_ITEMS, &order_items)?;
        batch.put(keys::PRODUCTS, &products)?;
        batch.put(keys::CART_ITEMS, &cart)?;
        self.store.commit(batch)?;

        tracing::info!(
            order_id = %order.id,
            user_id = %user_id,
            items = placed,
            total = %order.total,
            "Order placed"
        );
        Ok(order)
    }

    pub(super) fn get_orders(&self, user_id: UserId) -> Result<Vec<Order>> {
        let mut orders: Vec<Order> = self.store.read(keys::ORDERS)?;
        orders.retain(|order| order.user_id == user_id);
        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(orders)
    }

    pub(super) fn get_order_by_id(&self, order_id: OrderId) -> Result<OrderDetails> {
        let orders: Vec<Order> = self.store.read(keys::ORDERS)?;
        let order = orders
            .into_iter()
            .find(|order| order.id == order_id)
            .ok_or_else(|| DataError::not_found("Order", order_id))?;

        let order_items: Vec<OrderItem> = self.store.read(keys::ORDER_ITEMS)?;
        let products: Vec<Product> = self.store.read(keys::PRODUCTS)?;
        let items = order_items
            .into_iter()
            .filter(|item| item.order_id == order_id)
            .map(|item| OrderLine {
                product: products.iter().find(|p| p.id == item.product_id).cloned(),
                item,
            })
            .collect();

        Ok(OrderDetails { order, items })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use bazarlink_core::{NewProduct, OrderStatus, Price, SellerId};

    use super::*;
    use crate::engine::DataEngine;
    use crate::fallback::FallbackEngine;
    use crate::store::{KeyValueMedium, MemoryMedium, RecordStore, StoreError};

    /// Memory medium that fails writes to one key once armed.
    #[derive(Debug, Default)]
    struct FlakyMedium {
        inner: MemoryMedium,
        armed: std::sync::atomic::AtomicBool,
    }

    impl KeyValueMedium for std::sync::Arc<FlakyMedium> {
        fn get(&self, key: &str) -> std::result::Result<Option<String>, StoreError> {
            self.inner.get(key)
        }

        fn set(&self, key: &str, value: &str) -> std::result::Result<(), StoreError> {
            if key == keys::CART_ITEMS && self.armed.load(std::sync::atomic::Ordering::SeqCst) {
                return Err(StoreError::Io {
                    key: key.to_string(),
                    source: std::io::Error::other("disk full"),
                });
            }
            self.inner.set(key, value)
        }

        fn remove(&self, key: &str) -> std::result::Result<(), StoreError> {
            self.inner.remove(key)
        }
    }

    async fn stock(engine: &FallbackEngine, title: &str, units: u32, inventory: u32) -> Product {
        engine
            .create_product(
                NewProduct::new(
                    SellerId::generate(),
                    title,
                    "",
                    Price::from_units(units),
                    "General",
                    inventory,
                )
                .unwrap(),
            )
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_order_from_cart() {
        let engine = FallbackEngine::in_memory();
        engine.init().await.unwrap();
        let p = stock(&engine, "P", 100, 10).await;
        let q = stock(&engine, "Q", 50, 3).await;
        let user = UserId::generate();

        engine.add_to_cart(user, p.id, 2).await.unwrap();
        engine.add_to_cart(user, q.id, 1).await.unwrap();

        let order = engine
            .create_order(user, OrderRequest::ship_to("1 MG Road, Pune"))
            .await
            .unwrap();
        assert_eq!(order.total, Decimal::from(250));
        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.shipping_address, "1 MG Road, Pune");

        let details = engine.get_order_by_id(order.id).await.unwrap();
        assert_eq!(details.order, order);
        let mut prices: Vec<Decimal> = details
            .items
            .iter()
            .map(|line| line.item.price.amount())
            .collect();
        prices.sort();
        assert_eq!(prices, [Decimal::from(50), Decimal::from(100)]);

        assert_eq!(engine.get_product_by_id(p.id).await.unwrap().inventory, 8);
        assert_eq!(engine.get_product_by_id(q.id).await.unwrap().inventory, 2);
        assert!(engine.get_cart(user).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_order_leaves_other_carts() {
        let engine = FallbackEngine::in_memory();
        engine.init().await.unwrap();
        let p = stock(&engine, "P", 10, 10).await;
        let ann = UserId::generate();
        let bob = UserId::generate();
        engine.add_to_cart(ann, p.id, 1).await.unwrap();
        engine.add_to_cart(bob, p.id, 1).await.unwrap();

        engine
            .create_order(ann, OrderRequest::default())
            .await
            .unwrap();
        assert_eq!(engine.get_cart(bob).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_item_price_is_snapshot() {
        let engine = FallbackEngine::in_memory();
        engine.init().await.unwrap();
        let p = stock(&engine, "P", 100, 10).await;
        let user = UserId::generate();
        engine.add_to_cart(user, p.id, 1).await.unwrap();
        let order = engine
            .create_order(user, OrderRequest::default())
            .await
            .unwrap();

        let mut repriced = engine.get_product_by_id(p.id).await.unwrap();
        repriced.price = Price::from_units(999);
        engine.update_product(repriced).await.unwrap();

        let details = engine.get_order_by_id(order.id).await.unwrap();
        assert_eq!(details.items[0].item.price, Price::from_units(100));
        assert_eq!(
            details.items[0].product.as_ref().unwrap().price,
            Price::from_units(999)
        );
    }

    #[tokio::test]
    async fn test_inventory_saturates_at_zero() {
        let engine = FallbackEngine::in_memory();
        engine.init().await.unwrap();
        let p = stock(&engine, "P", 1, 2).await;
        let user = UserId::generate();
        engine.add_to_cart(user, p.id, 5).await.unwrap();
        engine
            .create_order(user, OrderRequest::default())
            .await
            .unwrap();
        assert_eq!(engine.get_product_by_id(p.id).await.unwrap().inventory, 0);
    }

    #[tokio::test]
    async fn test_missing_product_is_skipped() {
        let engine = FallbackEngine::in_memory();
        engine.init().await.unwrap();
        let p = stock(&engine, "P", 20, 5).await;
        let gone = stock(&engine, "Gone", 70, 5).await;
        let user = UserId::generate();
        engine.add_to_cart(user, p.id, 1).await.unwrap();
        engine.add_to_cart(user, gone.id, 1).await.unwrap();
        engine.delete_product(gone.id).await.unwrap();

        let order = engine
            .create_order(user, OrderRequest::default())
            .await
            .unwrap();
        assert_eq!(order.total, Decimal::from(20));
        assert_eq!(engine.get_order_by_id(order.id).await.unwrap().items.len(), 1);
        assert!(engine.get_cart(user).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_orders_newest_first_and_unknown_id() {
        let engine = FallbackEngine::in_memory();
        engine.init().await.unwrap();
        let p = stock(&engine, "P", 1, 50).await;
        let user = UserId::generate();

        engine.add_to_cart(user, p.id, 1).await.unwrap();
        let first = engine
            .create_order(user, OrderRequest::default())
            .await
            .unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        engine.add_to_cart(user, p.id, 1).await.unwrap();
        let second = engine
            .create_order(user, OrderRequest::default())
            .await
            .unwrap();

        let ids: Vec<OrderId> = engine
            .get_orders(user)
            .await
            .unwrap()
            .into_iter()
            .map(|o| o.id)
            .collect();
        assert_eq!(ids, [second.id, first.id]);

        let err = engine
            .get_order_by_id(OrderId::generate())
            .await
            .unwrap_err();
        assert!(matches!(err, DataError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_failed_commit_changes_nothing() {
        let medium = std::sync::Arc::new(FlakyMedium::default());
        let engine = FallbackEngine::new(RecordStore::new(medium.clone()));
        engine.init().await.unwrap();
        let p = stock(&engine, "P", 100, 10).await;
        let user = UserId::generate();
        engine.add_to_cart(user, p.id, 2).await.unwrap();

        medium
            .armed
            .store(true, std::sync::atomic::Ordering::SeqCst);
        let err = engine
            .create_order(user, OrderRequest::default())
            .await
            .unwrap_err();
        assert!(matches!(err, DataError::Storage(StoreError::Io { .. })));

        assert!(engine.get_orders(user).await.unwrap().is_empty());
        let items: Vec<OrderItem> = engine.store().read(keys::ORDER_ITEMS).unwrap();
        assert!(items.is_empty());
        assert_eq!(engine.get_product_by_id(p.id).await.unwrap().inventory, 10);
        assert_eq!(engine.get_cart(user).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_overflowing_total_is_rejected_and_engine_stays_usable() {
        let engine = FallbackEngine::in_memory();
        engine.init().await.unwrap();
        let priceless = engine
            .create_product(
                NewProduct::new(
                    SellerId::generate(),
                    "Crown Jewels",
                    "",
                    Price::new(Decimal::MAX).unwrap(),
                    "Fashion",
                    5,
                )
                .unwrap(),
            )
            .await
            .unwrap();
        let user = UserId::generate();
        engine.add_to_cart(user, priceless.id, 2).await.unwrap();

        let err = engine
            .create_order(user, OrderRequest::default())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            DataError::Validation(ValidationError::TotalTooLarge)
        ));

        // Nothing written, and the write lock is still usable
        assert!(engine.get_orders(user).await.unwrap().is_empty());
        assert_eq!(engine.get_cart(user).await.unwrap().len(), 1);
        assert_eq!(
            engine.get_product_by_id(priceless.id).await.unwrap().inventory,
            5
        );
        let other = UserId::generate();
        let p = stock(&engine, "P", 10, 10).await;
        engine.add_to_cart(other, p.id, 1).await.unwrap();
        let order = engine
            .create_order(other, OrderRequest::default())
            .await
            .unwrap();
        assert_eq!(order.total, Decimal::from(10));
    }

    #[tokio::test]
    async fn test_totals_summing_past_decimal_max_are_rejected() {
        let engine = FallbackEngine::in_memory();
        engine.init().await.unwrap();
        let near_max = Decimal::MAX - Decimal::from(10);
        let user = UserId::generate();
        for title in ["Left", "Right"] {
            let product = engine
                .create_product(
                    NewProduct::new(
                        SellerId::generate(),
                        title,
                        "",
                        Price::new(near_max).unwrap(),
                        "Art",
                        1,
                    )
                    .unwrap(),
                )
                .await
                .unwrap();
            engine.add_to_cart(user, product.id, 1).await.unwrap();
        }

        let err = engine
            .create_order(user, OrderRequest::default())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            DataError::Validation(ValidationError::TotalTooLarge)
        ));
    }
}
