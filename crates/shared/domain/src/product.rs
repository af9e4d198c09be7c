//! Product domain entity and related types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::MAX_PRODUCT_CODE_LENGTH;
use crate::error::{DomainError, DomainResult};

/// Catalogue product
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Product {
    /// Unique product code
    pub code: String,
    pub description: String,
    /// Units in stock
    #[serde(rename = "cuantityAvailable")]
    pub quantity_available: i64,
    /// Image URLs or storage ids
    #[serde(default)]
    pub image: Vec<String>,
    pub price: f64,
    /// Category name, if the product is filed under one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Soft delete timestamp (None = listed, Some = removed from the catalogue)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Product {
    /// Check if the product is still listed in the catalogue
    pub fn is_active(&self) -> bool {
        self.deleted_at.is_none()
    }

    /// Check that `requested` units can be taken from stock
    pub fn ensure_stock(&self, requested: i64) -> DomainResult<()> {
        if requested > self.quantity_available {
            return Err(DomainError::InsufficientStock {
                code: self.code.clone(),
                requested,
                available: self.quantity_available,
            });
        }
        Ok(())
    }
}

/// Product fields supplied on create and update
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductInput {
    pub code: String,
    pub description: String,
    #[serde(rename = "cuantityAvailable")]
    pub quantity_available: i64,
    #[serde(default)]
    pub image: Vec<String>,
    pub price: f64,
    #[serde(default)]
    pub category: Option<String>,
}

impl ProductInput {
    /// Validate business rules that the document shape alone cannot express
    pub fn validate(&self) -> DomainResult<()> {
        let code = self.code.trim();
        if code.is_empty() {
            return Err(DomainError::validation("Product code cannot be empty"));
        }
        if code.len() > MAX_PRODUCT_CODE_LENGTH {
            return Err(DomainError::validation(format!(
                "Product code cannot exceed {} characters",
                MAX_PRODUCT_CODE_LENGTH
            )));
        }
        if self.quantity_available < 0 {
            return Err(DomainError::validation("Available quantity cannot be negative"));
        }
        if !self.price.is_finite() || self.price < 0.0 {
            return Err(DomainError::validation("Price must be a non-negative number"));
        }
        Ok(())
    }
}

impl From<ProductInput> for Product {
    fn from(input: ProductInput) -> Self {
        Self {
            code: input.code.trim().to_string(),
            description: input.description,
            quantity_available: input.quantity_available,
            image: input.image,
            price: input.price,
            category: input.category,
            deleted_at: None,
        }
    }
}
