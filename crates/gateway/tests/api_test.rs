//! Integration tests for API endpoints.
//!
//! These tests drive the real router with mocked store services and a stub
//! identity provider, so no MongoDB or Firebase project is needed.

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use chrono::Utc;
use mockall::predicate::eq;
use serde_json::{json, Value};
use tower::ServiceExt;

use common::{AppError, AppResult};
use domain::{Cart, CartItem, Product, Purchase, PurchaseItem, User};
use gateway_lib::clients::{IdentityProvider, TokenResponse, VerifiedIdentity};
use gateway_lib::config::GatewayConfig;
use gateway_lib::routes::create_router;
use gateway_lib::state::AppState;
use store_service_lib::infra::MockHealthCheck;
use store_service_lib::service::{
    MockCartService, MockCatalogueService, MockContentService, MockPurchaseService,
    MockUserService, StateUpdate,
};
use store_service_lib::StoreServices;

const VALID_TOKEN: &str = "valid-test-token";
const ACCOUNT_EMAIL: &str = "fio@gmail.com";
/// Firebase account creation fails loudly for this email
const TAKEN_EMAIL: &str = "taken@gmail.com";

// =============================================================================
// Stub Identity Provider
// =============================================================================

/// Identity provider that accepts one password and one token
struct StubIdentity;

fn token(uid: &str, email: &str) -> TokenResponse {
    TokenResponse {
        access_token: VALID_TOKEN.to_string(),
        refresh_token: "refresh".to_string(),
        token_type: "Bearer".to_string(),
        expires_in: 3600,
        uid: uid.to_string(),
        email: email.to_string(),
    }
}

#[async_trait]
impl IdentityProvider for StubIdentity {
    async fn sign_in(&self, email: &str, password: &str) -> AppResult<TokenResponse> {
        if password == "fio123" {
            Ok(token("uid-1", email))
        } else {
            Err(AppError::InvalidCredentials)
        }
    }

    async fn sign_up(&self, email: &str, _password: &str) -> AppResult<TokenResponse> {
        if email == TAKEN_EMAIL {
            return Err(AppError::Internal("sign_up reached for a known email".to_string()));
        }
        Ok(token("uid-new", email))
    }

    async fn verify(&self, id_token: &str) -> AppResult<VerifiedIdentity> {
        if id_token == VALID_TOKEN {
            Ok(VerifiedIdentity {
                uid: "uid-1".to_string(),
                email: ACCOUNT_EMAIL.to_string(),
            })
        } else {
            Err(AppError::Unauthorized)
        }
    }
}

// =============================================================================
// Test Helpers
// =============================================================================

#[derive(Default)]
struct Mocks {
    catalogue: MockCatalogueService,
    purchases: MockPurchaseService,
    carts: MockCartService,
    content: MockContentService,
    users: MockUserService,
    health: MockHealthCheck,
}

impl Mocks {
    fn into_app(self) -> Router {
        let services = StoreServices {
            catalogue: Arc::new(self.catalogue),
            purchases: Arc::new(self.purchases),
            carts: Arc::new(self.carts),
            content: Arc::new(self.content),
            users: Arc::new(self.users),
            health: Arc::new(self.health),
        };

        create_router(AppState::new(
            services,
            Arc::new(StubIdentity),
            GatewayConfig::default(),
        ))
    }
}

fn product(code: &str) -> Product {
    Product {
        code: code.to_string(),
        description: "Duende de jardín".to_string(),
        quantity_available: 4,
        image: vec!["duende.png".to_string()],
        price: 15000.0,
        category: Some("duendes".to_string()),
        deleted_at: None,
    }
}

fn product_body(code: &str, price: f64) -> Value {
    json!({
        "code": code,
        "description": "Duende de jardín",
        "cuantityAvailable": 4,
        "image": ["duende.png"],
        "price": price,
        "category": "duendes"
    })
}

fn request(method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }

    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

// =============================================================================
// Health
// =============================================================================

#[tokio::test]
async fn test_health_reports_healthy_database() {
    let mut mocks = Mocks::default();
    mocks.health.expect_ping().returning(|| Ok(()));

    let (status, body) = send(mocks.into_app(), request(Method::GET, "/health", None, None)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["services"]["mongodb"]["status"], "healthy");
}

#[tokio::test]
async fn test_health_reports_unreachable_database() {
    let mut mocks = Mocks::default();
    mocks
        .health
        .expect_ping()
        .returning(|| Err(AppError::service_unavailable("mongodb")));

    let (status, body) = send(mocks.into_app(), request(Method::GET, "/health", None, None)).await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["status"], "degraded");
}

// =============================================================================
// Authentication
// =============================================================================

#[tokio::test]
async fn test_login_with_bad_credentials_is_unauthorized() {
    let body = json!({ "email": ACCOUNT_EMAIL, "password": "wrong" });

    let (status, body) = send(
        Mocks::default().into_app(),
        request(Method::POST, "/login", None, Some(body)),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], "INVALID_CREDENTIALS");
}

#[tokio::test]
async fn test_login_returns_token() {
    let body = json!({ "email": ACCOUNT_EMAIL, "password": "fio123" });

    let (status, body) = send(
        Mocks::default().into_app(),
        request(Method::POST, "/login", None, Some(body)),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["accessToken"], VALID_TOKEN);
    assert_eq!(body["tokenType"], "Bearer");
}

#[tokio::test]
async fn test_register_creates_store_user() {
    let mut mocks = Mocks::default();
    mocks
        .users
        .expect_get_user_by_email()
        .returning(|_| Err(AppError::NotFound));
    mocks
        .users
        .expect_register()
        .withf(|user| user.email == "nuevo@gmail.com" && user.firebase_uid.as_deref() == Some("uid-new"))
        .returning(|user| Ok(User::new(12, user.email, user.firebase_uid)));

    let body = json!({ "email": "Nuevo@gmail.com", "password": "secreto" });
    let (status, body) = send(
        mocks.into_app(),
        request(Method::POST, "/register", None, Some(body)),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["user"]["userId"], 12);
    assert_eq!(body["token"]["uid"], "uid-new");
}

#[tokio::test]
async fn test_register_known_email_is_conflict_before_firebase() {
    let mut mocks = Mocks::default();
    mocks
        .users
        .expect_get_user_by_email()
        .withf(|email| email == TAKEN_EMAIL)
        .returning(|email| Ok(User::new(3, email.to_string(), Some("uid-3".to_string()))));
    mocks.users.expect_register().never();

    let body = json!({ "email": TAKEN_EMAIL, "password": "secreto" });
    let (status, body) = send(
        mocks.into_app(),
        request(Method::POST, "/register", None, Some(body)),
    )
    .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["message"], "Email already exists");
}

#[tokio::test]
async fn test_register_rejects_short_password() {
    let mut mocks = Mocks::default();
    mocks.users.expect_register().never();

    let body = json!({ "email": "nuevo@gmail.com", "password": "abc" });
    let (status, body) = send(
        mocks.into_app(),
        request(Method::POST, "/register", None, Some(body)),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
}

// =============================================================================
// Catalogue
// =============================================================================

#[tokio::test]
async fn test_catalogue_lists_products_of_category() {
    let mut mocks = Mocks::default();
    mocks
        .catalogue
        .expect_list_products()
        .withf(|category| category.as_deref() == Some("duendes"))
        .returning(|_| Ok(vec![product("DUE-001")]));

    let (status, body) = send(
        mocks.into_app(),
        request(Method::GET, "/getCatalogue?category=duendes", None, None),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["code"], "DUE-001");
    assert_eq!(body[0]["cuantityAvailable"], 4);
}

#[tokio::test]
async fn test_get_missing_product_is_not_found() {
    let mut mocks = Mocks::default();
    mocks
        .catalogue
        .expect_get_product()
        .withf(|code| code == "NOPE")
        .returning(|_| Err(AppError::NotFound));

    let (status, body) = send(
        mocks.into_app(),
        request(Method::GET, "/getProduct/NOPE", None, None),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_add_product_requires_token() {
    let mut mocks = Mocks::default();
    mocks.catalogue.expect_add_product().never();

    let (status, _) = send(
        mocks.into_app(),
        request(Method::POST, "/addProduct", None, Some(product_body("DUE-001", 10.0))),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_add_product_rejects_invalid_token() {
    let mut mocks = Mocks::default();
    mocks.catalogue.expect_add_product().never();

    let (status, _) = send(
        mocks.into_app(),
        request(
            Method::POST,
            "/addProduct",
            Some("expired-token"),
            Some(product_body("DUE-001", 10.0)),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_add_product_created() {
    let mut mocks = Mocks::default();
    mocks
        .catalogue
        .expect_add_product()
        .withf(|input| input.code == "DUE-001" && input.quantity_available == 4)
        .returning(|input| Ok(Product::from(input)));

    let (status, body) = send(
        mocks.into_app(),
        request(
            Method::POST,
            "/addProduct",
            Some(VALID_TOKEN),
            Some(product_body("DUE-001", 10.0)),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["code"], "DUE-001");
}

#[tokio::test]
async fn test_add_existing_product_is_conflict() {
    let mut mocks = Mocks::default();
    mocks
        .catalogue
        .expect_add_product()
        .returning(|input| Err(AppError::conflict(format!("Product {}", input.code))));

    let (status, body) = send(
        mocks.into_app(),
        request(
            Method::POST,
            "/addProduct",
            Some(VALID_TOKEN),
            Some(product_body("DUE-001", 10.0)),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["code"], "CONFLICT");
    assert_eq!(body["error"]["message"], "Product DUE-001 already exists");
}

#[tokio::test]
async fn test_add_product_with_negative_price_is_rejected() {
    let mut mocks = Mocks::default();
    mocks.catalogue.expect_add_product().never();

    let (status, body) = send(
        mocks.into_app(),
        request(
            Method::POST,
            "/addProduct",
            Some(VALID_TOKEN),
            Some(product_body("DUE-001", -1.0)),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["message"], "Price cannot be negative");
}

#[tokio::test]
async fn test_delete_product_returns_no_content() {
    let mut mocks = Mocks::default();
    mocks
        .catalogue
        .expect_delete_product()
        .withf(|code| code == "DUE-001")
        .returning(|_| Ok(()));

    let (status, _) = send(
        mocks.into_app(),
        request(Method::DELETE, "/deleteProduct/DUE-001", Some(VALID_TOKEN), None),
    )
    .await;

    assert_eq!(status, StatusCode::NO_CONTENT);
}

// =============================================================================
// Cart
// =============================================================================

#[tokio::test]
async fn test_get_cart_uses_store_user_of_token() {
    let mut mocks = Mocks::default();
    mocks
        .users
        .expect_get_user_by_email()
        .withf(|email| email == ACCOUNT_EMAIL)
        .returning(|email| Ok(User::new(5, email.to_string(), Some("uid-1".to_string()))));
    mocks
        .carts
        .expect_get_cart()
        .with(eq(5))
        .returning(|user_id| Ok(Cart::empty(user_id)));

    let (status, body) = send(
        mocks.into_app(),
        request(Method::GET, "/getCart", Some(VALID_TOKEN), None),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["userId"], 5);
    assert_eq!(body["items"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_account_without_store_user_gets_one_on_first_use() {
    let mut mocks = Mocks::default();
    mocks
        .users
        .expect_get_user_by_email()
        .times(1)
        .returning(|_| Err(AppError::NotFound));
    mocks
        .users
        .expect_register()
        .withf(|user| user.email == ACCOUNT_EMAIL && user.firebase_uid.as_deref() == Some("uid-1"))
        .times(1)
        .returning(|user| Ok(User::new(9, user.email, user.firebase_uid)));
    mocks
        .carts
        .expect_get_cart()
        .with(eq(9))
        .returning(|user_id| Ok(Cart::empty(user_id)));

    let (status, body) = send(
        mocks.into_app(),
        request(Method::GET, "/getCart", Some(VALID_TOKEN), None),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["userId"], 9);
}

// =============================================================================
// Purchases
// =============================================================================

#[tokio::test]
async fn test_add_purchase_for_current_user() {
    let mut mocks = Mocks::default();
    mocks
        .users
        .expect_get_user_by_email()
        .returning(|email| Ok(User::new(5, email.to_string(), None)));
    mocks
        .purchases
        .expect_place_purchase()
        .withf(|user_id, order| *user_id == 5 && order.products.len() == 1 && !order.from_cart)
        .returning(|user_id, order| {
            Ok(Purchase {
                purchase_id: 1,
                purchase_details: order.purchase_details,
                products: vec![PurchaseItem {
                    code: "DUE-001".to_string(),
                    quantity: 2,
                    price: 15000.0,
                }],
                voucher_id: order.voucher_id,
                aprox_delivery_date: order.aprox_delivery_date,
                shipping_address: order.shipping_address,
                shipping_price: order.shipping_price,
                user_id,
                state: "pending".to_string(),
                created_at: Utc::now(),
            })
        });

    let body = json!({
        "products": [{ "code": "DUE-001", "quantity": 2 }],
        "shippingAddress": "Heredia",
        "shippingPrice": 2500.0,
        "voucherId": "img-voucher"
    });
    let (status, body) = send(
        mocks.into_app(),
        request(Method::POST, "/addPurchase", Some(VALID_TOKEN), Some(body)),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["purchaseId"], 1);
    assert_eq!(body["state"], "pending");
}

#[tokio::test]
async fn test_update_state_of_unknown_purchase_is_not_found() {
    let mut mocks = Mocks::default();
    mocks
        .purchases
        .expect_update_state()
        .withf(|user_id, purchase_id, state| {
            *user_id == 1 && *purchase_id == 999 && state == "shipped"
        })
        .returning(|_, _, _| Err(AppError::NotFound));

    let body = json!({ "userId": 1, "purchaseId": 999, "state": "shipped" });
    let (status, body) = send(
        mocks.into_app(),
        request(Method::PUT, "/updatePurchaseState", Some(VALID_TOKEN), Some(body)),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_update_state_returns_message() {
    let mut mocks = Mocks::default();
    mocks
        .purchases
        .expect_update_state()
        .returning(|_, _, _| Ok(StateUpdate::Updated));

    let body = json!({ "userId": 1, "purchaseId": 3, "state": "paid" });
    let (status, body) = send(
        mocks.into_app(),
        request(Method::PUT, "/updatePurchaseState", Some(VALID_TOKEN), Some(body)),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], StateUpdate::Updated.message());
}

#[tokio::test]
async fn test_update_state_requires_state() {
    let mut mocks = Mocks::default();
    mocks.purchases.expect_update_state().never();

    let body = json!({ "userId": 1, "purchaseId": 3, "state": "" });
    let (status, _) = send(
        mocks.into_app(),
        request(Method::PUT, "/updatePurchaseState", Some(VALID_TOKEN), Some(body)),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_update_purchase_passes_lines_without_client_prices() {
    let mut mocks = Mocks::default();
    mocks
        .purchases
        .expect_update_purchase()
        .withf(|purchase_id, edit| {
            *purchase_id == 7
                && edit.products
                    == Some(vec![CartItem {
                        code: "ghost".to_string(),
                        quantity: 500,
                    }])
        })
        .returning(|_, _| Err(AppError::validation("Product ghost does not exist")));

    let body = json!({
        "purchaseId": 7,
        "products": [{ "code": "ghost", "quantity": 500, "price": 0.01 }]
    });
    let (status, body) = send(
        mocks.into_app(),
        request(Method::PUT, "/updatePurchase", Some(VALID_TOKEN), Some(body)),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["message"], "Product ghost does not exist");
}

#[tokio::test]
async fn test_delete_purchase_returns_no_content() {
    let mut mocks = Mocks::default();
    mocks
        .purchases
        .expect_delete_purchase()
        .with(eq(7))
        .returning(|_| Ok(()));

    let (status, _) = send(
        mocks.into_app(),
        request(Method::DELETE, "/deletePurchase/7", Some(VALID_TOKEN), None),
    )
    .await;

    assert_eq!(status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn test_purchase_list_is_empty_array() {
    let mut mocks = Mocks::default();
    mocks
        .purchases
        .expect_list_purchases()
        .returning(|| Ok(vec![]));

    let (status, body) = send(
        mocks.into_app(),
        request(Method::GET, "/getPurchases", Some(VALID_TOKEN), None),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}
