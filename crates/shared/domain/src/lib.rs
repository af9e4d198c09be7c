//! Domain layer - Core storefront entities and data transfer objects.
//!
//! This crate contains pure domain logic with no infrastructure dependencies.
//! The types mirror the stored document shapes and are shared by the
//! store service and the HTTP gateway.

pub mod cart;
pub mod category;
pub mod constants;
pub mod content;
pub mod error;
pub mod product;
pub mod purchase;
pub mod user;

pub use cart::{normalize_lines, Cart, CartItem};
pub use category::Category;
pub use constants::*;
pub use content::{split_keywords, Content, ContentInput};
pub use error::{DomainError, DomainResult};
pub use product::{Product, ProductInput};
pub use purchase::{
    initial_state, normalize_state, stock_deltas, validate_shipping_price, NewPurchase, Purchase,
    PurchaseChanges, PurchaseEdit, PurchaseItem, PurchaseOrder,
};
pub use user::{normalize_email, NewUser, User};
