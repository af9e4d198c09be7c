//! User DAO.

use async_trait::async_trait;
use mongodb::{bson::doc, Collection};

use common::{AppError, AppResult};
use domain::{NewUser, User};

use super::{documents::UserDocument, WriteOutcome};
use crate::infra::{
    collections::{USER_COLLECTION, USER_SEQUENCE},
    CounterStore, Database,
};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// User DAO trait for dependency injection
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait UserDao: Send + Sync {
    /// Find user by numeric id
    async fn get_object(&self, user_id: i64) -> AppResult<Option<User>>;

    /// Find user by (normalized) email
    async fn get_by_email(&self, email: &str) -> AppResult<Option<User>>;

    /// Create a new user with the next user id
    async fn create(&self, user: NewUser) -> AppResult<User>;

    /// Record a purchase in the user's history
    async fn add_purchase(&self, user_id: i64, purchase_id: i64) -> AppResult<WriteOutcome>;

    /// Replace the stored shipping addresses
    async fn update_shipping_addresses(
        &self,
        user_id: i64,
        addresses: Vec<String>,
    ) -> AppResult<WriteOutcome>;
}

/// Mongo-backed user DAO
pub struct UserStore {
    users: Collection<UserDocument>,
    counters: CounterStore,
}

impl UserStore {
    pub fn new(db: &Database) -> Self {
        Self {
            users: db.collection(USER_COLLECTION),
            counters: CounterStore::new(db),
        }
    }
}

#[async_trait]
impl UserDao for UserStore {
    async fn get_object(&self, user_id: i64) -> AppResult<Option<User>> {
        let user = self.users.find_one(doc! { "userId": user_id }).await?;
        Ok(user.map(User::from))
    }

    async fn get_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let user = self
            .users
            .find_one(doc! { "email": email })
            .await?
            .map(User::from);

        if user.is_none() {
            tracing::debug!("No user found with email {}", email);
        }
        Ok(user)
    }

    async fn create(&self, user: NewUser) -> AppResult<User> {
        let entity = format!("User {}", user.email);

        if self.get_by_email(&user.email).await?.is_some() {
            tracing::info!("User {} already registered", user.email);
            return Err(AppError::conflict(entity));
        }

        let user_id = self.counters.next(USER_SEQUENCE).await?;
        let user = User::new(user_id, user.email, user.firebase_uid);

        self.users
            .insert_one(UserDocument::from(user.clone()))
            .await
            .map_err(|e| AppError::from_write(e, entity))?;

        tracing::info!("Created user {} ({})", user.user_id, user.email);
        Ok(user)
    }

    async fn add_purchase(&self, user_id: i64, purchase_id: i64) -> AppResult<WriteOutcome> {
        let result = self
            .users
            .update_one(
                doc! { "userId": user_id },
                doc! { "$addToSet": { "purchaseHistory": purchase_id } },
            )
            .await?;

        let outcome = WriteOutcome::from(&result);
        if outcome.is_missing() {
            tracing::warn!(
                "Purchase {} not recorded, user {} does not exist",
                purchase_id,
                user_id
            );
        }
        Ok(outcome)
    }

    async fn update_shipping_addresses(
        &self,
        user_id: i64,
        addresses: Vec<String>,
    ) -> AppResult<WriteOutcome> {
        let result = self
            .users
            .update_one(
                doc! { "userId": user_id },
                doc! { "$set": { "shippingAddresses": addresses } },
            )
            .await?;

        Ok(WriteOutcome::from(&result))
    }
}
