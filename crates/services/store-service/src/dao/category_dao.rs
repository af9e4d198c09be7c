//! Category DAO.

use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{bson::doc, Collection};

use common::{AppError, AppResult};
use domain::Category;

use crate::infra::{collections::CATEGORY_COLLECTION, Database};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait CategoryDao: Send + Sync {
    /// All categories ordered by name
    async fn get_all(&self) -> AppResult<Vec<Category>>;

    async fn get_object(&self, name: &str) -> AppResult<Option<Category>>;

    /// Insert a category; `Conflict` if the name is taken
    async fn create(&self, category: Category) -> AppResult<Category>;
}

pub struct CategoryStore {
    categories: Collection<Category>,
}

impl CategoryStore {
    pub fn new(db: &Database) -> Self {
        Self {
            categories: db.collection(CATEGORY_COLLECTION),
        }
    }
}

#[async_trait]
impl CategoryDao for CategoryStore {
    async fn get_all(&self) -> AppResult<Vec<Category>> {
        let categories: Vec<Category> = self
            .categories
            .find(doc! {})
            .sort(doc! { "name": 1 })
            .await?
            .try_collect()
            .await?;

        Ok(categories)
    }

    async fn get_object(&self, name: &str) -> AppResult<Option<Category>> {
        let category = self.categories.find_one(doc! { "name": name }).await?;
        Ok(category)
    }

    async fn create(&self, category: Category) -> AppResult<Category> {
        let entity = format!("Category {}", category.name);

        if self.get_object(&category.name).await?.is_some() {
            return Err(AppError::conflict(entity));
        }

        self.categories
            .insert_one(&category)
            .await
            .map_err(|e| AppError::from_write(e, entity))?;

        tracing::info!("Inserted category {}", category.name);
        Ok(category)
    }
}
