//! Catalogue service - products and their categories.

use async_trait::async_trait;
use std::sync::Arc;

use common::{AppError, AppResult, OptionExt};
use domain::{Category, Product, ProductInput};

use crate::dao::{CategoryDao, ProductDao};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Catalogue service trait for dependency injection.
///
/// Soft-deleted products are never returned.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait CatalogueService: Send + Sync {
    /// List listed products, optionally within one category
    async fn list_products(&self, category: Option<String>) -> AppResult<Vec<Product>>;

    /// Get listed product by code
    async fn get_product(&self, code: &str) -> AppResult<Product>;

    /// Add a product to the catalogue
    async fn add_product(&self, input: ProductInput) -> AppResult<Product>;

    /// Update a listed product and return its new state
    async fn update_product(&self, input: ProductInput) -> AppResult<Product>;

    /// Remove a product from the catalogue (soft delete)
    async fn delete_product(&self, code: &str) -> AppResult<()>;

    async fn list_categories(&self) -> AppResult<Vec<Category>>;

    async fn add_category(&self, category: Category) -> AppResult<Category>;
}

/// Concrete catalogue service backed by the product and category DAOs.
pub struct CatalogueManager {
    products: Arc<dyn ProductDao>,
    categories: Arc<dyn CategoryDao>,
}

impl CatalogueManager {
    pub fn new(products: Arc<dyn ProductDao>, categories: Arc<dyn CategoryDao>) -> Self {
        Self {
            products,
            categories,
        }
    }

    /// Validate the input and check its category exists
    async fn check_input(&self, input: &ProductInput) -> AppResult<()> {
        input.validate()?;

        if let Some(category) = &input.category {
            if self.categories.get_object(category).await?.is_none() {
                return Err(AppError::validation(format!(
                    "Category {} does not exist",
                    category
                )));
            }
        }
        Ok(())
    }
}

#[async_trait]
impl CatalogueService for CatalogueManager {
    async fn list_products(&self, category: Option<String>) -> AppResult<Vec<Product>> {
        let category = category
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty());
        self.products.get_all(category).await
    }

    async fn get_product(&self, code: &str) -> AppResult<Product> {
        self.products.get_object(code.trim()).await?.ok_or_not_found()
    }

    async fn add_product(&self, input: ProductInput) -> AppResult<Product> {
        self.check_input(&input).await?;
        self.products.create(Product::from(input)).await
    }

    async fn update_product(&self, mut input: ProductInput) -> AppResult<Product> {
        self.check_input(&input).await?;
        input.code = input.code.trim().to_string();
        let code = input.code.clone();

        if self.products.update(input).await?.is_missing() {
            return Err(AppError::NotFound);
        }

        self.products.get_object(&code).await?.ok_or_not_found()
    }

    async fn delete_product(&self, code: &str) -> AppResult<()> {
        if self.products.delete(code.trim()).await?.is_missing() {
            return Err(AppError::NotFound);
        }
        Ok(())
    }

    async fn list_categories(&self) -> AppResult<Vec<Category>> {
        self.categories.get_all().await
    }

    async fn add_category(&self, mut category: Category) -> AppResult<Category> {
        category.validate()?;
        category.name = category.name.trim().to_string();
        self.categories.create(category).await
    }
}
