//! User domain entity and related types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::ROLE_TYPE_CUSTOMER;

/// Store customer, linked to a Firebase account by email
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct User {
    pub user_id: i64,
    pub email: String,
    /// Firebase account id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub firebase_uid: Option<String>,
    #[serde(default)]
    pub role_type: i32,
    #[serde(default)]
    pub shipping_addresses: Vec<String>,
    /// Ids of the purchases placed by this user
    #[serde(default)]
    pub purchase_history: Vec<i64>,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Create a new customer
    pub fn new(user_id: i64, email: String, firebase_uid: Option<String>) -> Self {
        Self {
            user_id,
            email,
            firebase_uid,
            role_type: ROLE_TYPE_CUSTOMER,
            shipping_addresses: Vec::new(),
            purchase_history: Vec::new(),
            created_at: Utc::now(),
        }
    }
}

/// User creation data transfer object
#[derive(Debug, Clone, PartialEq)]
pub struct NewUser {
    pub email: String,
    pub firebase_uid: Option<String>,
}

impl NewUser {
    /// Emails are compared lowercase
    pub fn new(email: &str, firebase_uid: Option<String>) -> Self {
        Self {
            email: normalize_email(email),
            firebase_uid,
        }
    }
}

/// Lowercase and trim an email for storage and lookups
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_user_is_a_customer_without_history() {
        let user = User::new(1, "hola@gmail.com".to_string(), None);
        assert_eq!(user.role_type, ROLE_TYPE_CUSTOMER);
        assert!(user.purchase_history.is_empty());
        assert!(user.shipping_addresses.is_empty());
    }

    #[test]
    fn new_user_dto_normalizes_email() {
        let dto = NewUser::new("  Fio@Gmail.com ", Some("uid-1".to_string()));
        assert_eq!(dto.email, "fio@gmail.com");
    }
}
