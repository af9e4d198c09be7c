//! User service - Handles customer documents linked to Firebase accounts.

use async_trait::async_trait;
use std::sync::Arc;

use common::{AppError, AppResult, OptionExt};
use domain::{normalize_email, NewUser, User};

use crate::dao::UserDao;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// User service trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait UserService: Send + Sync {
    /// Get user by numeric id
    async fn get_user(&self, user_id: i64) -> AppResult<User>;

    /// Get user by email (case insensitive)
    async fn get_user_by_email(&self, email: &str) -> AppResult<User>;

    /// Create the user document once the Firebase account exists
    async fn register(&self, user: NewUser) -> AppResult<User>;

    /// Replace shipping addresses and return the updated user
    async fn update_shipping_addresses(
        &self,
        user_id: i64,
        addresses: Vec<String>,
    ) -> AppResult<User>;
}

/// Concrete implementation of UserService using the user DAO.
pub struct UserManager {
    users: Arc<dyn UserDao>,
}

impl UserManager {
    pub fn new(users: Arc<dyn UserDao>) -> Self {
        Self { users }
    }
}

#[async_trait]
impl UserService for UserManager {
    async fn get_user(&self, user_id: i64) -> AppResult<User> {
        self.users.get_object(user_id).await?.ok_or_not_found()
    }

    async fn get_user_by_email(&self, email: &str) -> AppResult<User> {
        self.users
            .get_by_email(&normalize_email(email))
            .await?
            .ok_or_not_found()
    }

    async fn register(&self, user: NewUser) -> AppResult<User> {
        if user.email.is_empty() {
            return Err(AppError::validation("Email cannot be empty"));
        }

        // Check if email already exists
        if self.users.get_by_email(&user.email).await?.is_some() {
            return Err(AppError::conflict("Email"));
        }

        self.users.create(user).await
    }

    async fn update_shipping_addresses(
        &self,
        user_id: i64,
        addresses: Vec<String>,
    ) -> AppResult<User> {
        let addresses: Vec<String> = addresses
            .into_iter()
            .map(|address| address.trim().to_string())
            .filter(|address| !address.is_empty())
            .collect();

        if self
            .users
            .update_shipping_addresses(user_id, addresses)
            .await?
            .is_missing()
        {
            return Err(AppError::NotFound);
        }

        self.get_user(user_id).await
    }
}
