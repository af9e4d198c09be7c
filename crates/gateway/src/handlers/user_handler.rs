//! User handlers.

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
use domain::User;

use super::store_user;
use crate::extractors::ValidatedJson;
use crate::middleware::CurrentUser;
use crate::state::AppState;

/// Shipping addresses update request
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAddressesRequest {
    /// Addresses in order of preference; the first is the checkout default
    #[validate(length(max = 10, message = "At most 10 shipping addresses can be stored"))]
    #[schema(example = json!(["Heredia, 100m norte del parque"]))]
    pub shipping_addresses: Vec<String>,
}

/// Create user routes (auth required)
pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/infoUser", get(info_user))
        .route("/updateShippingAddresses", put(update_shipping_addresses))
}

/// Get the store user of the authenticated caller
#[utoipa::path(
    get,
    path = "/infoUser",
    tag = "Users",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Current user", body = User),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "No store user for this account")
    )
)]
pub async fn info_user(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
) -> AppResult<Json<User>> {
    let user = store_user(&state, &current_user).await?;
    Ok(Json(user))
}

/// Replace the caller's shipping addresses
#[utoipa::path(
    put,
    path = "/updateShippingAddresses",
    tag = "Users",
    security(("bearer_auth" = [])),
    request_body = UpdateAddressesRequest,
    responses(
        (status = 200, description = "User updated", body = User),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn update_shipping_addresses(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<UpdateAddressesRequest>,
) -> AppResult<Json<User>> {
    let user = store_user(&state, &current_user).await?;

    let user = state
        .services
        .users
        .update_shipping_addresses(user.user_id, payload.shipping_addresses)
        .await?;

    Ok(Json(user))
}
