//! Catalogue handlers: products and categories.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
    routing::{delete, get, post, put},
    Router,
};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use common::AppResult;
use domain::{Category, Product, ProductInput};

use crate::extractors::ValidatedJson;
use crate::state::AppState;

/// Product create/update request with validation
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductRequest {
    /// Unique product code
    #[validate(length(min = 1, max = 64, message = "Product code must be 1 to 64 characters"))]
    #[schema(example = "DUE-001")]
    pub code: String,
    #[serde(default)]
    #[schema(example = "Duende de cerámica pintado a mano")]
    pub description: String,
    /// Units in stock
    #[serde(rename = "cuantityAvailable")]
    #[validate(range(min = 0, message = "Available quantity cannot be negative"))]
    #[schema(example = 12)]
    pub quantity_available: i64,
    /// Image URLs or storage ids
    #[serde(default)]
    pub image: Vec<String>,
    #[validate(range(min = 0.0, message = "Price cannot be negative"))]
    #[schema(example = 15000.0)]
    pub price: f64,
    #[serde(default)]
    #[schema(example = "duendes")]
    pub category: Option<String>,
}

impl From<ProductRequest> for ProductInput {
    fn from(request: ProductRequest) -> Self {
        Self {
            code: request.code,
            description: request.description,
            quantity_available: request.quantity_available,
            image: request.image,
            price: request.price,
            category: request.category,
        }
    }
}

/// Category create request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CategoryRequest {
    #[validate(length(min = 1, message = "Category name is required"))]
    #[schema(example = "duendes")]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub subcategories: Vec<String>,
}

/// Catalogue filter
#[derive(Debug, Deserialize, IntoParams)]
pub struct CatalogueQuery {
    /// Only products of this category
    pub category: Option<String>,
}

/// Public catalogue routes
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/getCatalogue", get(get_catalogue))
        .route("/getProduct/:code", get(get_product))
        .route("/getCategories", get(get_categories))
}

/// Catalogue management routes (auth required)
pub fn product_admin_routes() -> Router<AppState> {
    Router::new()
        .route("/addProduct", post(add_product))
        .route("/updateProduct", put(update_product))
        .route("/deleteProduct/:code", delete(delete_product))
        .route("/addCategory", post(add_category))
}

/// List the catalogue
#[utoipa::path(
    get,
    path = "/getCatalogue",
    tag = "Catalogue",
    params(CatalogueQuery),
    responses(
        (status = 200, description = "Listed products ordered by code", body = Vec<Product>)
    )
)]
pub async fn get_catalogue(
    State(state): State<AppState>,
    Query(query): Query<CatalogueQuery>,
) -> AppResult<Json<Vec<Product>>> {
    let products = state.services.catalogue.list_products(query.category).await?;
    Ok(Json(products))
}

/// Get product by code
#[utoipa::path(
    get,
    path = "/getProduct/{code}",
    tag = "Catalogue",
    params(
        ("code" = String, Path, description = "Product code")
    ),
    responses(
        (status = 200, description = "Product", body = Product),
        (status = 404, description = "Product not found")
    )
)]
pub async fn get_product(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> AppResult<Json<Product>> {
    let product = state.services.catalogue.get_product(&code).await?;
    Ok(Json(product))
}

/// Add a product to the catalogue
#[utoipa::path(
    post,
    path = "/addProduct",
    tag = "Catalogue",
    security(("bearer_auth" = [])),
    request_body = ProductRequest,
    responses(
        (status = 201, description = "Product created", body = Product),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 409, description = "Product code already used")
    )
)]
pub async fn add_product(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<ProductRequest>,
) -> AppResult<(StatusCode, Json<Product>)> {
    let product = state
        .services
        .catalogue
        .add_product(ProductInput::from(payload))
        .await?;

    Ok((StatusCode::CREATED, Json(product)))
}

/// Update a product
#[utoipa::path(
    put,
    path = "/updateProduct",
    tag = "Catalogue",
    security(("bearer_auth" = [])),
    request_body = ProductRequest,
    responses(
        (status = 200, description = "Product updated", body = Product),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Product not found")
    )
)]
pub async fn update_product(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<ProductRequest>,
) -> AppResult<Json<Product>> {
    let product = state
        .services
        .catalogue
        .update_product(ProductInput::from(payload))
        .await?;

    Ok(Json(product))
}

/// Remove a product from the catalogue (soft delete)
#[utoipa::path(
    delete,
    path = "/deleteProduct/{code}",
    tag = "Catalogue",
    security(("bearer_auth" = [])),
    params(
        ("code" = String, Path, description = "Product code")
    ),
    responses(
        (status = 204, description = "Product removed"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Product not found")
    )
)]
pub async fn delete_product(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> AppResult<StatusCode> {
    state.services.catalogue.delete_product(&code).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// List categories
#[utoipa::path(
    get,
    path = "/getCategories",
    tag = "Catalogue",
    responses(
        (status = 200, description = "Categories ordered by name", body = Vec<Category>)
    )
)]
pub async fn get_categories(State(state): State<AppState>) -> AppResult<Json<Vec<Category>>> {
    let categories = state.services.catalogue.list_categories().await?;
    Ok(Json(categories))
}

/// Add a category
#[utoipa::path(
    post,
    path = "/addCategory",
    tag = "Catalogue",
    security(("bearer_auth" = [])),
    request_body = CategoryRequest,
    responses(
        (status = 201, description = "Category created", body = Category),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 409, description = "Category already exists")
    )
)]
pub async fn add_category(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CategoryRequest>,
) -> AppResult<(StatusCode, Json<Category>)> {
    let category = state
        .services
        .catalogue
        .add_category(Category {
            name: payload.name,
            description: payload.description,
            subcategories: payload.subcategories,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(category)))
}
