//! Cart DAO. One document per user, replaced on every save.

use async_trait::async_trait;
use chrono::Utc;
use mongodb::{bson::doc, Collection};

use common::AppResult;
use domain::{Cart, CartItem};

use super::{documents::CartDocument, WriteOutcome};
use crate::infra::{collections::CART_COLLECTION, Database};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait CartDao: Send + Sync {
    /// Stored cart of a user, if any
    async fn get_object(&self, user_id: i64) -> AppResult<Option<Cart>>;

    /// Replace the user's cart with the given lines
    async fn upsert(&self, user_id: i64, items: Vec<CartItem>) -> AppResult<Cart>;

    async fn delete(&self, user_id: i64) -> AppResult<WriteOutcome>;
}

pub struct CartStore {
    carts: Collection<CartDocument>,
}

impl CartStore {
    pub fn new(db: &Database) -> Self {
        Self {
            carts: db.collection(CART_COLLECTION),
        }
    }
}

#[async_trait]
impl CartDao for CartStore {
    async fn get_object(&self, user_id: i64) -> AppResult<Option<Cart>> {
        let cart = self.carts.find_one(doc! { "userId": user_id }).await?;
        Ok(cart.map(Cart::from))
    }

    async fn upsert(&self, user_id: i64, items: Vec<CartItem>) -> AppResult<Cart> {
        let cart = Cart {
            user_id,
            items,
            updated_at: Utc::now(),
        };

        self.carts
            .replace_one(doc! { "userId": user_id }, CartDocument::from(cart.clone()))
            .upsert(true)
            .await?;

        tracing::debug!("Saved cart of user {} ({} units)", user_id, cart.unit_count());
        Ok(cart)
    }

    async fn delete(&self, user_id: i64) -> AppResult<WriteOutcome> {
        let result = self.carts.delete_one(doc! { "userId": user_id }).await?;
        Ok(WriteOutcome::from(&result))
    }
}
