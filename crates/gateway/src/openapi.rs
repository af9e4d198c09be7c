//! OpenAPI documentation.

use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};

use crate::clients::TokenResponse;
use crate::handlers::auth_handler::{LoginRequest, RegisterRequest, RegisterResponse};
use crate::handlers::cart_handler::UpdateCartRequest;
use crate::handlers::content_handler::{ContentRequest, UpdateContentRequest};
use crate::handlers::product_handler::{CategoryRequest, ProductRequest};
use crate::handlers::purchase_handler::{
    PurchaseRequest, UpdatePurchaseRequest, UpdatePurchaseStateRequest,
};
use crate::handlers::user_handler::UpdateAddressesRequest;
use crate::handlers::MessageResponse;
use domain::{Cart, CartItem, Category, Content, Product, Purchase, PurchaseItem, User};

/// API documentation struct.
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::auth_handler::register,
        crate::handlers::auth_handler::login,
        crate::handlers::product_handler::get_catalogue,
        crate::handlers::product_handler::get_product,
        crate::handlers::product_handler::add_product,
        crate::handlers::product_handler::update_product,
        crate::handlers::product_handler::delete_product,
        crate::handlers::product_handler::get_categories,
        crate::handlers::product_handler::add_category,
        crate::handlers::content_handler::get_all_content,
        crate::handlers::content_handler::get_content,
        crate::handlers::content_handler::add_content,
        crate::handlers::content_handler::update_content,
        crate::handlers::user_handler::info_user,
        crate::handlers::user_handler::update_shipping_addresses,
        crate::handlers::cart_handler::get_cart,
        crate::handlers::cart_handler::update_cart,
        crate::handlers::purchase_handler::get_purchase_history,
        crate::handlers::purchase_handler::add_purchase,
        crate::handlers::purchase_handler::get_purchases,
        crate::handlers::purchase_handler::get_purchase,
        crate::handlers::purchase_handler::update_purchase,
        crate::handlers::purchase_handler::update_purchase_state,
        crate::handlers::purchase_handler::delete_purchase,
    ),
    components(
        schemas(
            RegisterRequest,
            LoginRequest,
            RegisterResponse,
            TokenResponse,
            ProductRequest,
            CategoryRequest,
            ContentRequest,
            UpdateContentRequest,
            UpdateAddressesRequest,
            UpdateCartRequest,
            PurchaseRequest,
            UpdatePurchaseRequest,
            UpdatePurchaseStateRequest,
            MessageResponse,
            Product,
            Category,
            Content,
            User,
            Cart,
            CartItem,
            Purchase,
            PurchaseItem,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "Firebase sign-up and sign-in"),
        (name = "Catalogue", description = "Products and categories"),
        (name = "Gallery", description = "Storefront gallery content"),
        (name = "Users", description = "Store user of the signed-in account"),
        (name = "Cart", description = "Shopping cart"),
        (name = "Purchases", description = "Checkout and order management"),
    )
)]
pub struct ApiDoc;

/// Security scheme modifier.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("Firebase ID token")
                        .build(),
                ),
            );
        }
    }
}
