//! Cart handlers.

use axum::{
    extract::{Extension, State},
    response::Json,
    routing::{get, put},
    Router,
};
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use common::AppResult;
use domain::{Cart, CartItem};

use super::store_user;
use crate::extractors::ValidatedJson;
use crate::middleware::CurrentUser;
use crate::state::AppState;

/// Cart replacement request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateCartRequest {
    /// Lines of the new cart; repeated codes are merged
    #[validate(length(max = 100, message = "A cart holds at most 100 lines"))]
    pub items: Vec<CartItem>,
}

/// Create cart routes (auth required)
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/getCart", get(get_cart))
        .route("/updateCart", put(update_cart))
}

/// Get the caller's cart
#[utoipa::path(
    get,
    path = "/getCart",
    tag = "Cart",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Stored cart, empty when none was saved", body = Cart),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn get_cart(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
) -> AppResult<Json<Cart>> {
    let user = store_user(&state, &current_user).await?;
    let cart = state.services.carts.get_cart(user.user_id).await?;
    Ok(Json(cart))
}

/// Replace the caller's cart
#[utoipa::path(
    put,
    path = "/updateCart",
    tag = "Cart",
    security(("bearer_auth" = [])),
    request_body = UpdateCartRequest,
    responses(
        (status = 200, description = "Saved cart", body = Cart),
        (status = 400, description = "Unknown product or not enough stock"),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn update_cart(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<UpdateCartRequest>,
) -> AppResult<Json<Cart>> {
    let user = store_user(&state, &current_user).await?;
    let cart = state
        .services
        .carts
        .update_cart(user.user_id, payload.items)
        .await?;
    Ok(Json(cart))
}
