//! Purchase handlers.

use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    response::Json,
    routing::{delete, get, post, put},
    Router,
};
use chrono::NaiveDate;
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use common::AppResult;
use domain::{CartItem, Purchase, PurchaseEdit, PurchaseOrder};

use super::{store_user, MessageResponse};
use crate::extractors::ValidatedJson;
use crate::middleware::CurrentUser;
use crate::state::AppState;

/// Checkout request
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseRequest {
    #[serde(default)]
    #[schema(example = "Envolver para regalo")]
    pub purchase_details: String,
    /// Requested lines; ignored when `fromCart` is set
    #[serde(default)]
    pub products: Vec<CartItem>,
    /// Image id of the payment voucher
    #[serde(default)]
    pub voucher_id: String,
    #[serde(default)]
    pub aprox_delivery_date: Option<NaiveDate>,
    #[validate(length(min = 1, message = "Shipping address is required"))]
    #[schema(example = "Heredia, 100m norte del parque")]
    pub shipping_address: String,
    #[serde(default)]
    #[validate(range(min = 0.0, message = "Shipping price cannot be negative"))]
    pub shipping_price: f64,
    /// Initial state, `pending` when omitted
    #[serde(default)]
    pub state: Option<String>,
    /// Buy the stored cart and clear it
    #[serde(default)]
    pub from_cart: bool,
}

impl From<PurchaseRequest> for PurchaseOrder {
    fn from(request: PurchaseRequest) -> Self {
        Self {
            purchase_details: request.purchase_details,
            products: request.products,
            voucher_id: request.voucher_id,
            aprox_delivery_date: request.aprox_delivery_date,
            shipping_address: request.shipping_address,
            shipping_price: request.shipping_price,
            state: request.state,
            from_cart: request.from_cart,
        }
    }
}

/// Purchase update request; omitted fields are left untouched
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePurchaseRequest {
    pub purchase_id: i64,
    pub purchase_details: Option<String>,
    /// Replacement lines, priced against the catalogue
    pub products: Option<Vec<CartItem>>,
    pub voucher_id: Option<String>,
    pub aprox_delivery_date: Option<NaiveDate>,
    pub shipping_address: Option<String>,
    #[validate(range(min = 0.0, message = "Shipping price cannot be negative"))]
    pub shipping_price: Option<f64>,
}

impl UpdatePurchaseRequest {
    fn into_edit(self) -> (i64, PurchaseEdit) {
        (
            self.purchase_id,
            PurchaseEdit {
                purchase_details: self.purchase_details,
                products: self.products,
                voucher_id: self.voucher_id,
                aprox_delivery_date: self.aprox_delivery_date,
                shipping_address: self.shipping_address,
                shipping_price: self.shipping_price,
            },
        )
    }
}

/// Purchase state change request
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePurchaseStateRequest {
    /// Owner of the purchase
    pub user_id: i64,
    pub purchase_id: i64,
    #[validate(length(min = 1, message = "State is required"))]
    #[schema(example = "shipped")]
    pub state: String,
}

/// Create purchase routes (auth required)
pub fn purchase_routes() -> Router<AppState> {
    Router::new()
        .route("/getPurchaseHistory", get(get_purchase_history))
        .route("/addPurchase", post(add_purchase))
        .route("/getPurchases", get(get_purchases))
        .route("/getPurchase/:id", get(get_purchase))
        .route("/updatePurchase", put(update_purchase))
        .route("/updatePurchaseState", put(update_purchase_state))
        .route("/deletePurchase/:id", delete(delete_purchase))
}

/// Purchases of the authenticated caller
#[utoipa::path(
    get,
    path = "/getPurchaseHistory",
    tag = "Purchases",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Caller's purchases, newest first", body = Vec<Purchase>),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn get_purchase_history(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
) -> AppResult<Json<Vec<Purchase>>> {
    let user = store_user(&state, &current_user).await?;
    let purchases = state.services.purchases.purchase_history(user.user_id).await?;
    Ok(Json(purchases))
}

/// Place a purchase for the authenticated caller
#[utoipa::path(
    post,
    path = "/addPurchase",
    tag = "Purchases",
    security(("bearer_auth" = [])),
    request_body = PurchaseRequest,
    responses(
        (status = 201, description = "Purchase placed", body = Purchase),
        (status = 400, description = "Validation error or not enough stock"),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn add_purchase(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<PurchaseRequest>,
) -> AppResult<(StatusCode, Json<Purchase>)> {
    let user = store_user(&state, &current_user).await?;
    let purchase = state
        .services
        .purchases
        .place_purchase(user.user_id, PurchaseOrder::from(payload))
        .await?;

    Ok((StatusCode::CREATED, Json(purchase)))
}

/// List every purchase
#[utoipa::path(
    get,
    path = "/getPurchases",
    tag = "Purchases",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "All purchases, newest first", body = Vec<Purchase>),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn get_purchases(State(state): State<AppState>) -> AppResult<Json<Vec<Purchase>>> {
    let purchases = state.services.purchases.list_purchases().await?;
    Ok(Json(purchases))
}

/// Get purchase by id
#[utoipa::path(
    get,
    path = "/getPurchase/{id}",
    tag = "Purchases",
    security(("bearer_auth" = [])),
    params(
        ("id" = i64, Path, description = "Purchase id")
    ),
    responses(
        (status = 200, description = "Purchase", body = Purchase),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Purchase not found")
    )
)]
pub async fn get_purchase(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Purchase>> {
    let purchase = state.services.purchases.get_purchase(id).await?;
    Ok(Json(purchase))
}

/// Update purchase fields
#[utoipa::path(
    put,
    path = "/updatePurchase",
    tag = "Purchases",
    security(("bearer_auth" = [])),
    request_body = UpdatePurchaseRequest,
    responses(
        (status = 200, description = "Purchase updated", body = Purchase),
        (status = 400, description = "Validation error, unknown product or not enough stock"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Purchase not found")
    )
)]
pub async fn update_purchase(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<UpdatePurchaseRequest>,
) -> AppResult<Json<Purchase>> {
    let (purchase_id, edit) = payload.into_edit();
    let purchase = state
        .services
        .purchases
        .update_purchase(purchase_id, edit)
        .await?;
    Ok(Json(purchase))
}

/// Change the state of a user's purchase
#[utoipa::path(
    put,
    path = "/updatePurchaseState",
    tag = "Purchases",
    security(("bearer_auth" = [])),
    request_body = UpdatePurchaseStateRequest,
    responses(
        (status = 200, description = "State updated or already set", body = MessageResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Purchase does not exist for that user")
    )
)]
pub async fn update_purchase_state(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<UpdatePurchaseStateRequest>,
) -> AppResult<Json<MessageResponse>> {
    let update = state
        .services
        .purchases
        .update_state(payload.user_id, payload.purchase_id, payload.state)
        .await?;

    Ok(Json(MessageResponse::new(update.message())))
}

/// Delete a purchase
#[utoipa::path(
    delete,
    path = "/deletePurchase/{id}",
    tag = "Purchases",
    security(("bearer_auth" = [])),
    params(
        ("id" = i64, Path, description = "Purchase id")
    ),
    responses(
        (status = 204, description = "Purchase deleted"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Purchase not found")
    )
)]
pub async fn delete_purchase(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<StatusCode> {
    state.services.purchases.delete_purchase(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
