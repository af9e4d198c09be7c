//! Purchase domain entity and related types.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::cart::CartItem;
use crate::constants::STATE_PENDING;
use crate::error::{DomainError, DomainResult};

/// Priced product line stored with a purchase
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct PurchaseItem {
    pub code: String,
    pub quantity: i64,
    /// Unit price at the time of purchase
    pub price: f64,
}

impl PurchaseItem {
    pub fn line_total(&self) -> f64 {
        self.price * self.quantity as f64
    }
}

/// Purchase placed by a user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Purchase {
    pub purchase_id: i64,
    #[serde(default)]
    pub purchase_details: String,
    #[serde(default)]
    pub products: Vec<PurchaseItem>,
    /// Image id of the payment voucher
    #[serde(default)]
    pub voucher_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aprox_delivery_date: Option<NaiveDate>,
    #[serde(default)]
    pub shipping_address: String,
    #[serde(default)]
    pub shipping_price: f64,
    pub user_id: i64,
    pub state: String,
    pub created_at: DateTime<Utc>,
}

impl Purchase {
    /// Sum of all product lines, without shipping
    pub fn subtotal(&self) -> f64 {
        self.products.iter().map(PurchaseItem::line_total).sum()
    }

    /// Amount charged to the customer
    pub fn total(&self) -> f64 {
        self.subtotal() + self.shipping_price
    }
}

/// Purchase ready to be stored (lines already priced)
#[derive(Debug, Clone, PartialEq)]
pub struct NewPurchase {
    pub purchase_details: String,
    pub products: Vec<PurchaseItem>,
    pub voucher_id: String,
    pub aprox_delivery_date: Option<NaiveDate>,
    pub shipping_address: String,
    pub shipping_price: f64,
    pub user_id: i64,
    pub state: String,
}

/// Order submitted by a customer at checkout
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseOrder {
    #[serde(default)]
    pub purchase_details: String,
    /// Requested lines; ignored when `from_cart` is set
    #[serde(default)]
    pub products: Vec<CartItem>,
    #[serde(default)]
    pub voucher_id: String,
    #[serde(default)]
    pub aprox_delivery_date: Option<NaiveDate>,
    pub shipping_address: String,
    #[serde(default)]
    pub shipping_price: f64,
    #[serde(default)]
    pub state: Option<String>,
    /// Take the lines from the user's stored cart and clear it afterwards
    #[serde(default)]
    pub from_cart: bool,
}

/// Purchase fields a client may edit; omitted fields are left untouched.
///
/// Lines are given as codes and quantities and are priced against the catalogue.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseEdit {
    pub purchase_details: Option<String>,
    pub products: Option<Vec<CartItem>>,
    pub voucher_id: Option<String>,
    pub aprox_delivery_date: Option<NaiveDate>,
    pub shipping_address: Option<String>,
    pub shipping_price: Option<f64>,
}

impl PurchaseEdit {
    /// Check if no field would be changed
    pub fn is_empty(&self) -> bool {
        self.purchase_details.is_none()
            && self.products.is_none()
            && self.voucher_id.is_none()
            && self.aprox_delivery_date.is_none()
            && self.shipping_address.is_none()
            && self.shipping_price.is_none()
    }

    pub fn validate(&self) -> DomainResult<()> {
        if let Some(price) = self.shipping_price {
            validate_shipping_price(price)?;
        }
        if let Some(address) = &self.shipping_address {
            if address.trim().is_empty() {
                return Err(DomainError::validation("Shipping address cannot be empty"));
            }
        }
        Ok(())
    }

    /// Stored changes, with `products` replaced by the priced lines
    pub fn into_changes(self, products: Option<Vec<PurchaseItem>>) -> PurchaseChanges {
        PurchaseChanges {
            purchase_details: self.purchase_details,
            products,
            voucher_id: self.voucher_id,
            aprox_delivery_date: self.aprox_delivery_date,
            shipping_address: self.shipping_address.map(|address| address.trim().to_string()),
            shipping_price: self.shipping_price,
        }
    }
}

/// Purchase fields written by an update, lines already priced
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PurchaseChanges {
    pub purchase_details: Option<String>,
    pub products: Option<Vec<PurchaseItem>>,
    pub voucher_id: Option<String>,
    pub aprox_delivery_date: Option<NaiveDate>,
    pub shipping_address: Option<String>,
    pub shipping_price: Option<f64>,
}

/// Units of each product to take from stock when `held` lines become `wanted`.
///
/// Negative values are units to put back. Codes with no change are left out.
pub fn stock_deltas(held: &[PurchaseItem], wanted: &[PurchaseItem]) -> Vec<(String, i64)> {
    let quantity = |lines: &[PurchaseItem], code: &str| -> i64 {
        lines
            .iter()
            .filter(|line| line.code == code)
            .map(|line| line.quantity)
            .sum()
    };

    let mut deltas: Vec<(String, i64)> = wanted
        .iter()
        .map(|line| (line.code.clone(), line.quantity - quantity(held, &line.code)))
        .collect();

    for line in held {
        if !wanted.iter().any(|w| w.code == line.code) {
            deltas.push((line.code.clone(), -line.quantity));
        }
    }

    deltas.retain(|(_, delta)| *delta != 0);
    deltas
}

/// Trim and lowercase a purchase state.
///
/// States are free-form; only an empty value is rejected.
pub fn normalize_state(state: &str) -> DomainResult<String> {
    let state = state.trim().to_lowercase();
    if state.is_empty() {
        return Err(DomainError::validation("Purchase state cannot be empty"));
    }
    Ok(state)
}

/// State for a new purchase, defaulting to pending
pub fn initial_state(state: Option<&str>) -> DomainResult<String> {
    match state {
        Some(state) => normalize_state(state),
        None => Ok(STATE_PENDING.to_string()),
    }
}

pub fn validate_shipping_price(price: f64) -> DomainResult<()> {
    if !price.is_finite() || price < 0.0 {
        return Err(DomainError::validation(
            "Shipping price must be a non-negative number",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn purchase() -> Purchase {
        Purchase {
            purchase_id: 1,
            purchase_details: String::new(),
            products: vec![
                PurchaseItem {
                    code: "A".to_string(),
                    quantity: 2,
                    price: 10.0,
                },
                PurchaseItem {
                    code: "B".to_string(),
                    quantity: 1,
                    price: 5.5,
                },
            ],
            voucher_id: String::new(),
            aprox_delivery_date: None,
            shipping_address: "San José".to_string(),
            shipping_price: 3.0,
            user_id: 9,
            state: STATE_PENDING.to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn totals_include_shipping() {
        let purchase = purchase();
        assert_eq!(purchase.subtotal(), 25.5);
        assert_eq!(purchase.total(), 28.5);
    }

    #[test]
    fn state_is_normalized_but_not_restricted() {
        assert_eq!(normalize_state("  Shipped ").unwrap(), "shipped");
        assert_eq!(normalize_state("Waiting for pickup").unwrap(), "waiting for pickup");
        assert!(normalize_state("   ").is_err());
    }

    #[test]
    fn initial_state_defaults_to_pending() {
        assert_eq!(initial_state(None).unwrap(), STATE_PENDING);
        assert_eq!(initial_state(Some("PAID")).unwrap(), "paid");
    }

    #[test]
    fn edit_detects_empty_and_invalid_values() {
        assert!(PurchaseEdit::default().is_empty());

        let edit = PurchaseEdit {
            shipping_price: Some(-2.0),
            ..Default::default()
        };
        assert!(!edit.is_empty());
        assert!(edit.validate().is_err());

        let blank_address = PurchaseEdit {
            shipping_address: Some("  ".to_string()),
            ..Default::default()
        };
        assert!(blank_address.validate().is_err());
    }

    fn priced(code: &str, quantity: i64) -> PurchaseItem {
        PurchaseItem {
            code: code.to_string(),
            quantity,
            price: 1.0,
        }
    }

    #[test]
    fn stock_deltas_take_new_units_and_return_dropped_ones() {
        let held = vec![priced("A", 2), priced("B", 3)];
        let wanted = vec![priced("A", 5), priced("C", 1)];

        let deltas = stock_deltas(&held, &wanted);

        assert_eq!(
            deltas,
            vec![
                ("A".to_string(), 3),
                ("C".to_string(), 1),
                ("B".to_string(), -3)
            ]
        );
        assert!(stock_deltas(&held, &held).is_empty());
    }
}
