//! Product DAO with soft delete support.

use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{
    bson::{doc, to_bson, DateTime, Document},
    Collection,
};

use common::{AppError, AppResult};
use domain::{Product, ProductInput};

use super::{documents::ProductDocument, WriteOutcome};
use crate::infra::{collections::PRODUCT_COLLECTION, Database};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Product DAO trait for dependency injection.
///
/// Queries exclude soft-deleted products, except the existence check in `create`
/// (codes are never reused).
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait ProductDao: Send + Sync {
    /// List listed products ordered by code, optionally within one category
    async fn get_all(&self, category: Option<String>) -> AppResult<Vec<Product>>;

    /// Find a listed product by code
    async fn get_object(&self, code: &str) -> AppResult<Option<Product>>;

    /// Insert a product; `Conflict` if the code was ever used
    async fn create(&self, product: Product) -> AppResult<Product>;

    /// Overwrite description, stock, images, price and category of a listed product
    async fn update(&self, changes: ProductInput) -> AppResult<WriteOutcome>;

    /// Soft delete a listed product (sets deletedAt)
    async fn delete(&self, code: &str) -> AppResult<WriteOutcome>;

    /// Add `delta` units to the stock of a product.
    ///
    /// A negative delta only applies to a listed product holding at least that many
    /// units; otherwise nothing is written and `Missing` is returned.
    async fn adjust_stock(&self, code: &str, delta: i64) -> AppResult<WriteOutcome>;
}

/// Mongo-backed product DAO.
pub struct ProductStore {
    products: Collection<ProductDocument>,
}

impl ProductStore {
    pub fn new(db: &Database) -> Self {
        Self {
            products: db.collection(PRODUCT_COLLECTION),
        }
    }
}

/// Filter matching the product whose stock `delta` may be applied to.
pub fn stock_filter(code: &str, delta: i64) -> Document {
    if delta < 0 {
        let needed = delta.saturating_neg();
        doc! {
            "code": code,
            "deletedAt": null,
            "cuantityAvailable": { "$gte": needed },
        }
    } else {
        doc! { "code": code }
    }
}

/// Update taking a listed product out of the catalogue.
pub fn removal_update() -> Document {
    doc! { "$set": { "deletedAt": DateTime::now() } }
}

/// Build the `$set` document applied by [`ProductDao::update`].
pub fn product_update(changes: &ProductInput) -> AppResult<Document> {
    Ok(doc! {
        "$set": {
            "description": changes.description.as_str(),
            "cuantityAvailable": changes.quantity_available,
            "image": to_bson(&changes.image)?,
            "price": changes.price,
            "category": to_bson(&changes.category)?,
        }
    })
}

#[async_trait]
impl ProductDao for ProductStore {
    async fn get_all(&self, category: Option<String>) -> AppResult<Vec<Product>> {
        let mut filter = doc! { "deletedAt": null };
        if let Some(category) = category {
            filter.insert("category", category);
        }

        let products: Vec<Product> = self
            .products
            .find(filter)
            .sort(doc! { "code": 1 })
            .await?
            .map_ok(Product::from)
            .try_collect()
            .await?;

        tracing::debug!("Loaded {} products", products.len());
        Ok(products)
    }

    async fn get_object(&self, code: &str) -> AppResult<Option<Product>> {
        let product = self
            .products
            .find_one(doc! { "code": code, "deletedAt": null })
            .await?
            .map(Product::from);

        if product.is_none() {
            tracing::debug!("No product found with code {}", code);
        }
        Ok(product)
    }

    async fn create(&self, product: Product) -> AppResult<Product> {
        let entity = format!("Product {}", product.code);

        if self
            .products
            .find_one(doc! { "code": product.code.as_str() })
            .await?
            .is_some()
        {
            tracing::info!("Product {} already exists", product.code);
            return Err(AppError::conflict(entity));
        }

        self.products
            .insert_one(ProductDocument::from(product.clone()))
            .await
            .map_err(|e| AppError::from_write(e, entity))?;

        tracing::info!("Inserted product {}", product.code);
        Ok(product)
    }

    async fn update(&self, changes: ProductInput) -> AppResult<WriteOutcome> {
        let update = product_update(&changes)?;
        let result = self
            .products
            .update_one(doc! { "code": changes.code.as_str(), "deletedAt": null }, update)
            .await?;

        let outcome = WriteOutcome::from(&result);
        match outcome {
            WriteOutcome::Modified => tracing::info!("Updated product {}", changes.code),
            WriteOutcome::Unchanged => tracing::debug!("Product {} already up to date", changes.code),
            WriteOutcome::Missing => tracing::debug!("No product to update with code {}", changes.code),
        }
        Ok(outcome)
    }

    async fn delete(&self, code: &str) -> AppResult<WriteOutcome> {
        let result = self
            .products
            .update_one(
                doc! { "code": code, "deletedAt": null },
                removal_update(),
            )
            .await?;

        let outcome = WriteOutcome::from(&result);
        if outcome == WriteOutcome::Modified {
            tracing::info!("Removed product {} from the catalogue", code);
        }
        Ok(outcome)
    }

    async fn adjust_stock(&self, code: &str, delta: i64) -> AppResult<WriteOutcome> {
        let result = self
            .products
            .update_one(
                stock_filter(code, delta),
                doc! { "$inc": { "cuantityAvailable": delta } },
            )
            .await?;

        let outcome = WriteOutcome::from(&result);
        if outcome.is_missing() {
            tracing::debug!("Stock of product {} not adjusted by {}", code, delta);
        } else {
            tracing::info!("Stock of product {} adjusted by {}", code, delta);
        }
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::Bson;

    #[test]
    fn update_sets_every_editable_field() {
        let changes = ProductInput {
            code: "P-1".to_string(),
            description: "Duende".to_string(),
            quantity_available: 3,
            image: vec!["a.png".to_string()],
            price: 9.99,
            category: None,
        };

        let update = product_update(&changes).unwrap();
        let set = update.get_document("$set").unwrap();

        assert_eq!(set.get_str("description").unwrap(), "Duende");
        assert_eq!(set.get_i64("cuantityAvailable").unwrap(), 3);
        assert_eq!(set.get_f64("price").unwrap(), 9.99);
        assert_eq!(set.get("category"), Some(&Bson::Null));
        assert!(!set.contains_key("code"));
    }

    #[test]
    fn removal_stamps_a_bson_date() {
        let update = removal_update();
        let set = update.get_document("$set").unwrap();
        assert!(matches!(set.get("deletedAt"), Some(Bson::DateTime(_))));
    }

    #[test]
    fn taking_stock_requires_enough_units() {
        let filter = stock_filter("P-1", -3);
        let stock = filter.get_document("cuantityAvailable").unwrap();
        assert_eq!(stock.get_i64("$gte").unwrap(), 3);
        assert_eq!(filter.get("deletedAt"), Some(&Bson::Null));

        let filter = stock_filter("P-1", 2);
        assert_eq!(filter, doc! { "code": "P-1" });
    }
}
