//! Business logic, one service per storefront area.

mod cart_service;
mod catalogue_service;
mod content_service;
mod purchase_service;
mod user_service;

pub use cart_service::{CartManager, CartService};
pub use catalogue_service::{CatalogueManager, CatalogueService};
pub use content_service::{ContentManager, ContentService};
pub use purchase_service::{PurchaseManager, PurchaseService, StateUpdate};
pub use user_service::{UserManager, UserService};

#[cfg(any(test, feature = "test-utils"))]
pub use cart_service::MockCartService;
#[cfg(any(test, feature = "test-utils"))]
pub use catalogue_service::MockCatalogueService;
#[cfg(any(test, feature = "test-utils"))]
pub use content_service::MockContentService;
#[cfg(any(test, feature = "test-utils"))]
pub use purchase_service::MockPurchaseService;
#[cfg(any(test, feature = "test-utils"))]
pub use user_service::MockUserService;
