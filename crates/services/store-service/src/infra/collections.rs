//! Collection names and the indexes declared on them.

use mongodb::bson::{doc, Document};

pub const PRODUCT_COLLECTION: &str = "products";
pub const PURCHASE_COLLECTION: &str = "purchases";
pub const USER_COLLECTION: &str = "users";
pub const CART_COLLECTION: &str = "carts";
pub const CONTENT_COLLECTION: &str = "content";
pub const CATEGORY_COLLECTION: &str = "categories";
pub const COUNTER_COLLECTION: &str = "counters";

/// Counter sequence used for purchase ids
pub const PURCHASE_SEQUENCE: &str = "purchaseId";

/// Counter sequence used for user ids
pub const USER_SEQUENCE: &str = "userId";

/// Unique index declaration.
#[derive(Debug, Clone)]
pub struct IndexSpec {
    pub collection: &'static str,
    pub name: &'static str,
    pub keys: Document,
}

/// Unique indexes on the natural key of each collection.
pub fn unique_indexes() -> Vec<IndexSpec> {
    vec![
        IndexSpec {
            collection: PRODUCT_COLLECTION,
            name: "uniq_product_code",
            keys: doc! { "code": 1 },
        },
        IndexSpec {
            collection: PURCHASE_COLLECTION,
            name: "uniq_purchase_id",
            keys: doc! { "purchaseId": 1 },
        },
        IndexSpec {
            collection: USER_COLLECTION,
            name: "uniq_user_id",
            keys: doc! { "userId": 1 },
        },
        IndexSpec {
            collection: USER_COLLECTION,
            name: "uniq_user_email",
            keys: doc! { "email": 1 },
        },
        IndexSpec {
            collection: CART_COLLECTION,
            name: "uniq_cart_user",
            keys: doc! { "userId": 1 },
        },
        IndexSpec {
            collection: CONTENT_COLLECTION,
            name: "uniq_content_id",
            keys: doc! { "contentId": 1 },
        },
        IndexSpec {
            collection: CATEGORY_COLLECTION,
            name: "uniq_category_name",
            keys: doc! { "name": 1 },
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_names_are_unique() {
        let specs = unique_indexes();
        let mut names: Vec<_> = specs.iter().map(|spec| spec.name).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), specs.len());
    }

    #[test]
    fn product_code_is_indexed() {
        assert!(unique_indexes()
            .iter()
            .any(|spec| spec.collection == PRODUCT_COLLECTION && spec.keys.contains_key("code")));
    }
}
