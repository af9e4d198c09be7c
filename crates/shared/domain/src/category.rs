//! Product category.

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};

/// Catalogue category with optional subcategories
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Category {
    /// Unique category name
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub subcategories: Vec<String>,
}

impl Category {
    pub fn validate(&self) -> DomainResult<()> {
        if self.name.trim().is_empty() {
            return Err(DomainError::validation("Category name cannot be empty"));
        }
        if self.subcategories.iter().any(|sub| sub.trim().is_empty()) {
            return Err(DomainError::validation("Subcategory names cannot be empty"));
        }
        Ok(())
    }
}
