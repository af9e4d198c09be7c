//! Stored shapes of the timestamped entities.
//!
//! Timestamps are written as BSON dates so they can be range-queried and
//! TTL-indexed. The domain types keep RFC 3339 strings for the HTTP API.

use bson::serde_helpers::{
    chrono_datetime_as_bson_datetime as bson_date,
    chrono_datetime_as_bson_datetime_optional as bson_date_optional,
};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use domain::{Cart, CartItem, Content, Product, Purchase, PurchaseItem, User};

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDocument {
    pub code: String,
    pub description: String,
    #[serde(rename = "cuantityAvailable")]
    pub quantity_available: i64,
    #[serde(default)]
    pub image: Vec<String>,
    pub price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "bson_date_optional")]
    pub deleted_at: Option<DateTime<Utc>>,
}

impl From<Product> for ProductDocument {
    fn from(product: Product) -> Self {
        Self {
            code: product.code,
            description: product.description,
            quantity_available: product.quantity_available,
            image: product.image,
            price: product.price,
            category: product.category,
            deleted_at: product.deleted_at,
        }
    }
}

impl From<ProductDocument> for Product {
    fn from(doc: ProductDocument) -> Self {
        Self {
            code: doc.code,
            description: doc.description,
            quantity_available: doc.quantity_available,
            image: doc.image,
            price: doc.price,
            category: doc.category,
            deleted_at: doc.deleted_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartDocument {
    pub user_id: i64,
    #[serde(default)]
    pub items: Vec<CartItem>,
    #[serde(with = "bson_date")]
    pub updated_at: DateTime<Utc>,
}

impl From<Cart> for CartDocument {
    fn from(cart: Cart) -> Self {
        Self {
            user_id: cart.user_id,
            items: cart.items,
            updated_at: cart.updated_at,
        }
    }
}

impl From<CartDocument> for Cart {
    fn from(doc: CartDocument) -> Self {
        Self {
            user_id: doc.user_id,
            items: doc.items,
            updated_at: doc.updated_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseDocument {
    pub purchase_id: i64,
    #[serde(default)]
    pub purchase_details: String,
    #[serde(default)]
    pub products: Vec<PurchaseItem>,
    #[serde(default)]
    pub voucher_id: String,
    /// Calendar date, kept as `YYYY-MM-DD`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aprox_delivery_date: Option<NaiveDate>,
    #[serde(default)]
    pub shipping_address: String,
    #[serde(default)]
    pub shipping_price: f64,
    pub user_id: i64,
    pub state: String,
    #[serde(with = "bson_date")]
    pub created_at: DateTime<Utc>,
}

impl From<Purchase> for PurchaseDocument {
    fn from(purchase: Purchase) -> Self {
        Self {
            purchase_id: purchase.purchase_id,
            purchase_details: purchase.purchase_details,
            products: purchase.products,
            voucher_id: purchase.voucher_id,
            aprox_delivery_date: purchase.aprox_delivery_date,
            shipping_address: purchase.shipping_address,
            shipping_price: purchase.shipping_price,
            user_id: purchase.user_id,
            state: purchase.state,
            created_at: purchase.created_at,
        }
    }
}

impl From<PurchaseDocument> for Purchase {
    fn from(doc: PurchaseDocument) -> Self {
        Self {
            purchase_id: doc.purchase_id,
            purchase_details: doc.purchase_details,
            products: doc.products,
            voucher_id: doc.voucher_id,
            aprox_delivery_date: doc.aprox_delivery_date,
            shipping_address: doc.shipping_address,
            shipping_price: doc.shipping_price,
            user_id: doc.user_id,
            state: doc.state,
            created_at: doc.created_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDocument {
    pub user_id: i64,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub firebase_uid: Option<String>,
    #[serde(default)]
    pub role_type: i32,
    #[serde(default)]
    pub shipping_addresses: Vec<String>,
    #[serde(default)]
    pub purchase_history: Vec<i64>,
    #[serde(with = "bson_date")]
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserDocument {
    fn from(user: User) -> Self {
        Self {
            user_id: user.user_id,
            email: user.email,
            firebase_uid: user.firebase_uid,
            role_type: user.role_type,
            shipping_addresses: user.shipping_addresses,
            purchase_history: user.purchase_history,
            created_at: user.created_at,
        }
    }
}

impl From<UserDocument> for User {
    fn from(doc: UserDocument) -> Self {
        Self {
            user_id: doc.user_id,
            email: doc.email,
            firebase_uid: doc.firebase_uid,
            role_type: doc.role_type,
            shipping_addresses: doc.shipping_addresses,
            purchase_history: doc.purchase_history,
            created_at: doc.created_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentDocument {
    pub content_id: String,
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub keywords: Vec<String>,
    pub image: String,
    #[serde(with = "bson_date")]
    pub created_at: DateTime<Utc>,
}

impl From<Content> for ContentDocument {
    fn from(content: Content) -> Self {
        Self {
            content_id: content.content_id,
            name: content.name,
            description: content.description,
            keywords: content.keywords,
            image: content.image,
            created_at: content.created_at,
        }
    }
}

impl From<ContentDocument> for Content {
    fn from(doc: ContentDocument) -> Self {
        Self {
            content_id: doc.content_id,
            name: doc.name,
            description: doc.description,
            keywords: doc.keywords,
            image: doc.image,
            created_at: doc.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use bson::{from_document, to_document, Bson};

    fn noon() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn removed_product_stores_a_bson_date() {
        let product = Product {
            code: "P-1".to_string(),
            description: "Duende".to_string(),
            quantity_available: 2,
            image: vec![],
            price: 5.0,
            category: None,
            deleted_at: Some(noon()),
        };

        let stored = to_document(&ProductDocument::from(product.clone())).unwrap();
        assert!(matches!(stored.get("deletedAt"), Some(Bson::DateTime(_))));
        assert!(stored.contains_key("cuantityAvailable"));

        let loaded: ProductDocument = from_document(stored).unwrap();
        assert_eq!(Product::from(loaded), product);
    }

    #[test]
    fn listed_product_has_no_deleted_at() {
        let stored = to_document(&ProductDocument {
            code: "P-2".to_string(),
            description: String::new(),
            quantity_available: 0,
            image: vec![],
            price: 1.0,
            category: None,
            deleted_at: None,
        })
        .unwrap();

        assert!(!stored.contains_key("deletedAt"));
        let loaded: ProductDocument = from_document(stored).unwrap();
        assert_eq!(loaded.deleted_at, None);
    }

    #[test]
    fn creation_times_are_bson_dates() {
        let mut user = User::new(1, "fio@gmail.com".to_string(), None);
        user.created_at = noon();

        let stored = to_document(&UserDocument::from(user)).unwrap();
        assert_eq!(
            stored.get_datetime("createdAt").unwrap().to_chrono(),
            noon()
        );

        let cart = CartDocument {
            user_id: 1,
            items: vec![],
            updated_at: noon(),
        };
        let stored = to_document(&cart).unwrap();
        assert!(stored.get_datetime("updatedAt").is_ok());
    }
}
