//! Purchase DAO.

use async_trait::async_trait;
use chrono::Utc;
use futures::TryStreamExt;
use mongodb::{
    bson::{doc, to_bson, Document},
    Collection,
};

use common::{AppError, AppResult};
use domain::{NewPurchase, Purchase, PurchaseChanges};

use super::{documents::PurchaseDocument, WriteOutcome};
use crate::infra::{
    collections::{PURCHASE_COLLECTION, PURCHASE_SEQUENCE},
    CounterStore, Database,
};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Purchase DAO trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait PurchaseDao: Send + Sync {
    /// List every purchase, newest first
    async fn get_all(&self) -> AppResult<Vec<Purchase>>;

    /// Find a purchase by id
    async fn get_object(&self, purchase_id: i64) -> AppResult<Option<Purchase>>;

    /// Purchase history of one user, newest first
    async fn get_by_user(&self, user_id: i64) -> AppResult<Vec<Purchase>>;

    /// Assign the next purchase id and insert
    async fn create(&self, purchase: NewPurchase) -> AppResult<Purchase>;

    /// Apply the given field changes to a purchase
    async fn update(&self, purchase_id: i64, changes: PurchaseChanges) -> AppResult<WriteOutcome>;

    /// Set the state of a purchase that belongs to `user_id`.
    ///
    /// `Missing` when no purchase with that id belongs to the user.
    async fn update_purchase_state(
        &self,
        user_id: i64,
        purchase_id: i64,
        state: String,
    ) -> AppResult<WriteOutcome>;

    /// Remove a purchase
    async fn delete(&self, purchase_id: i64) -> AppResult<WriteOutcome>;
}

/// Mongo-backed purchase DAO.
pub struct PurchaseStore {
    purchases: Collection<PurchaseDocument>,
    counters: CounterStore,
}

impl PurchaseStore {
    pub fn new(db: &Database) -> Self {
        Self {
            purchases: db.collection(PURCHASE_COLLECTION),
            counters: CounterStore::new(db),
        }
    }
}

/// Build the `$set` document applied by [`PurchaseDao::update`]; only given fields are set.
pub fn purchase_update(changes: &PurchaseChanges) -> AppResult<Document> {
    let mut set = Document::new();

    if let Some(details) = &changes.purchase_details {
        set.insert("purchaseDetails", details.as_str());
    }
    if let Some(products) = &changes.products {
        set.insert("products", to_bson(products)?);
    }
    if let Some(voucher_id) = &changes.voucher_id {
        set.insert("voucherId", voucher_id.as_str());
    }
    if let Some(date) = &changes.aprox_delivery_date {
        set.insert("aproxDeliveryDate", to_bson(date)?);
    }
    if let Some(address) = &changes.shipping_address {
        set.insert("shippingAddress", address.as_str());
    }
    if let Some(price) = changes.shipping_price {
        set.insert("shippingPrice", price);
    }

    Ok(doc! { "$set": set })
}

#[async_trait]
impl PurchaseDao for PurchaseStore {
    async fn get_all(&self) -> AppResult<Vec<Purchase>> {
        let purchases: Vec<Purchase> = self
            .purchases
            .find(doc! {})
            .sort(doc! { "purchaseId": -1 })
            .await?
            .map_ok(Purchase::from)
            .try_collect()
            .await?;

        Ok(purchases)
    }

    async fn get_object(&self, purchase_id: i64) -> AppResult<Option<Purchase>> {
        let purchase = self
            .purchases
            .find_one(doc! { "purchaseId": purchase_id })
            .await?
            .map(Purchase::from);

        if purchase.is_none() {
            tracing::debug!("No purchase found with id {}", purchase_id);
        }
        Ok(purchase)
    }

    async fn get_by_user(&self, user_id: i64) -> AppResult<Vec<Purchase>> {
        let purchases: Vec<Purchase> = self
            .purchases
            .find(doc! { "userId": user_id })
            .sort(doc! { "purchaseId": -1 })
            .await?
            .map_ok(Purchase::from)
            .try_collect()
            .await?;

        Ok(purchases)
    }

    async fn create(&self, purchase: NewPurchase) -> AppResult<Purchase> {
        let purchase_id = self.counters.next(PURCHASE_SEQUENCE).await?;

        let purchase = Purchase {
            purchase_id,
            purchase_details: purchase.purchase_details,
            products: purchase.products,
            voucher_id: purchase.voucher_id,
            aprox_delivery_date: purchase.aprox_delivery_date,
            shipping_address: purchase.shipping_address,
            shipping_price: purchase.shipping_price,
            user_id: purchase.user_id,
            state: purchase.state,
            created_at: Utc::now(),
        };

        self.purchases
            .insert_one(PurchaseDocument::from(purchase.clone()))
            .await
            .map_err(|e| AppError::from_write(e, format!("Purchase {}", purchase_id)))?;

        tracing::info!(
            "Inserted purchase {} for user {}",
            purchase.purchase_id,
            purchase.user_id
        );
        Ok(purchase)
    }

    async fn update(&self, purchase_id: i64, changes: PurchaseChanges) -> AppResult<WriteOutcome> {
        let update = purchase_update(&changes)?;
        let result = self
            .purchases
            .update_one(doc! { "purchaseId": purchase_id }, update)
            .await?;

        let outcome = WriteOutcome::from(&result);
        if outcome == WriteOutcome::Modified {
            tracing::info!("Updated purchase {}", purchase_id);
        }
        Ok(outcome)
    }

    async fn update_purchase_state(
        &self,
        user_id: i64,
        purchase_id: i64,
        state: String,
    ) -> AppResult<WriteOutcome> {
        let owned = self
            .purchases
            .find_one(doc! { "purchaseId": purchase_id, "userId": user_id })
            .await?;
        if owned.is_none() {
            tracing::debug!(
                "Purchase {} does not exist for user {}",
                purchase_id,
                user_id
            );
            return Ok(WriteOutcome::Missing);
        }

        let result = self
            .purchases
            .update_one(
                doc! { "purchaseId": purchase_id },
                doc! { "$set": { "state": state.as_str() } },
            )
            .await?;

        let outcome = WriteOutcome::from(&result);
        if outcome == WriteOutcome::Modified {
            tracing::info!("Purchase {} moved to state {}", purchase_id, state);
        }
        Ok(outcome)
    }

    async fn delete(&self, purchase_id: i64) -> AppResult<WriteOutcome> {
        if self.get_object(purchase_id).await?.is_none() {
            return Ok(WriteOutcome::Missing);
        }

        let result = self
            .purchases
            .delete_one(doc! { "purchaseId": purchase_id })
            .await?;

        let outcome = WriteOutcome::from(&result);
        if outcome == WriteOutcome::Modified {
            tracing::info!("Deleted purchase {}", purchase_id);
        }
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::PurchaseItem;

    #[test]
    fn update_only_sets_given_fields() {
        let changes = PurchaseChanges {
            voucher_id: Some("voucher-7".to_string()),
            shipping_price: Some(4.5),
            ..Default::default()
        };

        let update = purchase_update(&changes).unwrap();
        let set = update.get_document("$set").unwrap();

        assert_eq!(set.len(), 2);
        assert_eq!(set.get_str("voucherId").unwrap(), "voucher-7");
        assert_eq!(set.get_f64("shippingPrice").unwrap(), 4.5);
    }

    #[test]
    fn update_serializes_product_lines() {
        let changes = PurchaseChanges {
            products: Some(vec![PurchaseItem {
                code: "A".to_string(),
                quantity: 2,
                price: 1.5,
            }]),
            ..Default::default()
        };

        let update = purchase_update(&changes).unwrap();
        let lines = update
            .get_document("$set")
            .unwrap()
            .get_array("products")
            .unwrap();

        assert_eq!(lines.len(), 1);
        let line = lines[0].as_document().unwrap();
        assert_eq!(line.get_str("code").unwrap(), "A");
        assert_eq!(line.get_i64("quantity").unwrap(), 2);
    }
}
