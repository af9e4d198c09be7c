//! Shopping cart entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::MAX_LINE_QUANTITY;
use crate::error::{DomainError, DomainResult};

/// One product line in a cart or in a purchase order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct CartItem {
    /// Product code
    pub code: String,
    pub quantity: i64,
}

/// Cart of one user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Cart {
    pub user_id: i64,
    #[serde(default)]
    pub items: Vec<CartItem>,
    pub updated_at: DateTime<Utc>,
}

impl Cart {
    /// Empty cart for a user that has not stored one yet
    pub fn empty(user_id: i64) -> Self {
        Self {
            user_id,
            items: Vec::new(),
            updated_at: Utc::now(),
        }
    }

    /// Total number of units in the cart
    pub fn unit_count(&self) -> i64 {
        self.items.iter().map(|item| item.quantity).sum()
    }
}

/// Merge repeated codes, drop zero quantities and check the remaining lines.
///
/// Order of first appearance is kept.
pub fn normalize_lines(lines: Vec<CartItem>) -> DomainResult<Vec<CartItem>> {
    let mut merged: Vec<CartItem> = Vec::with_capacity(lines.len());

    for line in lines {
        let code = line.code.trim().to_string();
        if code.is_empty() {
            return Err(DomainError::validation("Product code cannot be empty"));
        }
        if line.quantity < 0 {
            return Err(DomainError::validation(format!(
                "Quantity for product {} cannot be negative",
                code
            )));
        }
        if line.quantity > MAX_LINE_QUANTITY {
            return Err(quantity_exceeded(&code));
        }

        match merged.iter_mut().find(|existing| existing.code == code) {
            Some(existing) => {
                existing.quantity = existing
                    .quantity
                    .checked_add(line.quantity)
                    .filter(|total| *total <= MAX_LINE_QUANTITY)
                    .ok_or_else(|| quantity_exceeded(&code))?;
            }
            None => merged.push(CartItem {
                code,
                quantity: line.quantity,
            }),
        }
    }

    merged.retain(|line| line.quantity > 0);
    Ok(merged)
}

fn quantity_exceeded(code: &str) -> DomainError {
    DomainError::validation(format!(
        "Quantity for product {} cannot exceed {}",
        code, MAX_LINE_QUANTITY
    ))
}
