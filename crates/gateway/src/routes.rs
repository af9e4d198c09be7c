//! Route configuration.

use axum::{
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        HeaderValue, Method,
    },
    middleware, Router,
};
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::handlers::{
    auth_routes, cart_routes, content_admin_routes, content_routes, health_routes,
    product_admin_routes, product_routes, purchase_routes, user_routes,
};
use crate::middleware::auth_middleware;
use crate::openapi::ApiDoc;
use crate::state::AppState;

/// Create the main router with all routes.
pub fn create_router(state: AppState) -> Router {
    let protected = Router::new()
        .merge(product_admin_routes())
        .merge(content_admin_routes())
        .merge(user_routes())
        .merge(cart_routes())
        .merge(purchase_routes())
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    let router = Router::new()
        // Health check (no auth)
        .merge(health_routes())
        // Swagger UI
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // Public routes
        .merge(auth_routes())
        .merge(product_routes())
        .merge(content_routes())
        // Routes that need a Firebase ID token
        .merge(protected);

    let router = match cors_layer(&state.config.cors_allowed_origin) {
        Some(cors) => router.layer(cors),
        None => router,
    };

    router.with_state(state)
}

/// CORS for the storefront frontend; `None` when the origin is not a valid header value.
fn cors_layer(origin: &str) -> Option<CorsLayer> {
    match HeaderValue::from_str(origin) {
        Ok(origin) => Some(
            CorsLayer::new()
                .allow_origin(origin)
                .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
                .allow_headers([AUTHORIZATION, CONTENT_TYPE]),
        ),
        Err(_) => {
            tracing::warn!("Ignoring invalid CORS origin {:?}", origin);
            None
        }
    }
}
