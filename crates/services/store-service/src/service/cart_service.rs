//! Cart service.

use async_trait::async_trait;
use std::sync::Arc;

use common::{AppError, AppResult};
use domain::{normalize_lines, Cart, CartItem};

use crate::dao::{CartDao, ProductDao};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait CartService: Send + Sync {
    /// Stored cart of the user, or an empty one
    async fn get_cart(&self, user_id: i64) -> AppResult<Cart>;

    /// Replace the user's cart; every line must fit the available stock
    async fn update_cart(&self, user_id: i64, items: Vec<CartItem>) -> AppResult<Cart>;
}

pub struct CartManager {
    carts: Arc<dyn CartDao>,
    products: Arc<dyn ProductDao>,
}

impl CartManager {
    pub fn new(carts: Arc<dyn CartDao>, products: Arc<dyn ProductDao>) -> Self {
        Self { carts, products }
    }
}

#[async_trait]
impl CartService for CartManager {
    async fn get_cart(&self, user_id: i64) -> AppResult<Cart> {
        Ok(self
            .carts
            .get_object(user_id)
            .await?
            .unwrap_or_else(|| Cart::empty(user_id)))
    }

    async fn update_cart(&self, user_id: i64, items: Vec<CartItem>) -> AppResult<Cart> {
        let items = normalize_lines(items)?;

        for item in &items {
            let product = self.products.get_object(&item.code).await?.ok_or_else(|| {
                AppError::validation(format!("Product {} does not exist", item.code))
            })?;
            product.ensure_stock(item.quantity)?;
        }

        self.carts.upsert(user_id, items).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dao::{MockCartDao, MockProductDao};
    use chrono::Utc;
    use domain::Product;

    fn item(code: &str, quantity: i64) -> CartItem {
        CartItem {
            code: code.to_string(),
            quantity,
        }
    }

    #[tokio::test]
    async fn missing_cart_is_empty() {
        let mut carts = MockCartDao::new();
        carts.expect_get_object().returning(|_| Ok(None));

        let cart = CartManager::new(Arc::new(carts), Arc::new(MockProductDao::new()))
            .get_cart(4)
            .await
            .unwrap();

        assert!(cart.items.is_empty());
        assert_eq!(cart.user_id, 4);
    }

    #[tokio::test]
    async fn update_merges_lines_before_saving() {
        let mut products = MockProductDao::new();
        products.expect_get_object().returning(|code| {
            Ok(Some(Product {
                code: code.to_string(),
                description: String::new(),
                quantity_available: 10,
                image: vec![],
                price: 1.0,
                category: None,
                deleted_at: None,
            }))
        });

        let mut carts = MockCartDao::new();
        carts
            .expect_upsert()
            .withf(|user_id, items| *user_id == 4 && items == &vec![item("A", 3)])
            .returning(|user_id, items| {
                Ok(Cart {
                    user_id,
                    items,
                    updated_at: Utc::now(),
                })
            });

        let cart = CartManager::new(Arc::new(carts), Arc::new(products))
            .update_cart(4, vec![item("A", 1), item("B", 0), item("A", 2)])
            .await
            .unwrap();

        assert_eq!(cart.unit_count(), 3);
    }

    #[tokio::test]
    async fn update_rejects_unknown_products() {
        let mut products = MockProductDao::new();
        products.expect_get_object().returning(|_| Ok(None));

        let mut carts = MockCartDao::new();
        carts.expect_upsert().never();

        let result = CartManager::new(Arc::new(carts), Arc::new(products))
            .update_cart(4, vec![item("X", 1)])
            .await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }
}
