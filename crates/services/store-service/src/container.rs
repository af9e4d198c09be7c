//! Service container shared by every request handler.

use std::sync::Arc;

use crate::dao::{CartStore, CategoryStore, ContentStore, ProductStore, PurchaseStore, UserStore};
use crate::infra::{Database, HealthCheck};
use crate::service::{
    CartManager, CartService, CatalogueManager, CatalogueService, ContentManager, ContentService,
    PurchaseManager, PurchaseService, UserManager, UserService,
};

/// Every store service behind a trait object, cheap to clone.
#[derive(Clone)]
pub struct StoreServices {
    pub catalogue: Arc<dyn CatalogueService>,
    pub purchases: Arc<dyn PurchaseService>,
    pub carts: Arc<dyn CartService>,
    pub content: Arc<dyn ContentService>,
    pub users: Arc<dyn UserService>,
    pub health: Arc<dyn HealthCheck>,
}

impl StoreServices {
    /// Wire DAOs and services over one shared database handle.
    pub fn new(db: &Database) -> Self {
        let products = Arc::new(ProductStore::new(db));
        let categories = Arc::new(CategoryStore::new(db));
        let purchases = Arc::new(PurchaseStore::new(db));
        let users = Arc::new(UserStore::new(db));
        let carts = Arc::new(CartStore::new(db));
        let content = Arc::new(ContentStore::new(db));

        Self {
            catalogue: Arc::new(CatalogueManager::new(products.clone(), categories)),
            purchases: Arc::new(PurchaseManager::new(
                purchases,
                products.clone(),
                users.clone(),
                carts.clone(),
            )),
            carts: Arc::new(CartManager::new(carts, products)),
            content: Arc::new(ContentManager::new(content)),
            users: Arc::new(UserManager::new(users)),
            health: Arc::new(db.clone()),
        }
    }
}
