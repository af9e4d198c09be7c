//! Data access objects, one per MongoDB collection.
//!
//! Each DAO is a trait (for dependency injection and mocking) with a
//! Mongo-backed `*Store` implementation.

mod cart_dao;
mod category_dao;
mod content_dao;
mod documents;
mod product_dao;
mod purchase_dao;
mod user_dao;

use mongodb::results::{DeleteResult, UpdateResult};

pub use cart_dao::{CartDao, CartStore};
pub use category_dao::{CategoryDao, CategoryStore};
pub use content_dao::{ContentDao, ContentStore};
pub use product_dao::{product_update, removal_update, stock_filter, ProductDao, ProductStore};
pub use purchase_dao::{purchase_update, PurchaseDao, PurchaseStore};
pub use user_dao::{UserDao, UserStore};

#[cfg(any(test, feature = "test-utils"))]
pub use cart_dao::MockCartDao;
#[cfg(any(test, feature = "test-utils"))]
pub use category_dao::MockCategoryDao;
#[cfg(any(test, feature = "test-utils"))]
pub use content_dao::MockContentDao;
#[cfg(any(test, feature = "test-utils"))]
pub use product_dao::MockProductDao;
#[cfg(any(test, feature = "test-utils"))]
pub use purchase_dao::MockPurchaseDao;
#[cfg(any(test, feature = "test-utils"))]
pub use user_dao::MockUserDao;

/// Result of a single-document write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    /// The document was found and changed
    Modified,
    /// The document was found but already held the written values
    Unchanged,
    /// No document matched the filter
    Missing,
}

impl WriteOutcome {
    pub fn is_missing(self) -> bool {
        matches!(self, WriteOutcome::Missing)
    }
}

impl From<&UpdateResult> for WriteOutcome {
    fn from(result: &UpdateResult) -> Self {
        if result.modified_count > 0 {
            WriteOutcome::Modified
        } else if result.matched_count > 0 {
            WriteOutcome::Unchanged
        } else {
            WriteOutcome::Missing
        }
    }
}

impl From<&DeleteResult> for WriteOutcome {
    fn from(result: &DeleteResult) -> Self {
        if result.deleted_count > 0 {
            WriteOutcome::Modified
        } else {
            WriteOutcome::Missing
        }
    }
}
