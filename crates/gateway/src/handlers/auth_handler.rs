//! Authentication handlers.

use axum::{extract::State, http::StatusCode, response::Json, routing::post, Router};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use common::{AppError, AppResult};
use domain::{NewUser, User, MIN_PASSWORD_LENGTH};

use crate::clients::TokenResponse;
use crate::extractors::ValidatedJson;
use crate::state::AppState;

/// User registration request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterRequest {
    /// User email address
    #[validate(email(message = "Invalid email format"))]
    #[schema(example = "fio@gmail.com")]
    pub email: String,
    /// User password (minimum 6 characters)
    #[validate(custom(function = "validate_password"))]
    #[schema(example = "fio123", min_length = 6)]
    pub password: String,
}

/// User login request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    /// User email address
    #[validate(email(message = "Invalid email format"))]
    #[schema(example = "fio@gmail.com")]
    pub email: String,
    /// User password
    #[validate(length(min = 1, message = "Password is required"))]
    #[schema(example = "fio123")]
    pub password: String,
}

/// Registration result: the store user and a session token
#[derive(Debug, Serialize, ToSchema)]
pub struct RegisterResponse {
    pub user: User,
    pub token: TokenResponse,
}

fn validate_password(password: &str) -> Result<(), ValidationError> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        let mut error = ValidationError::new("password_length");
        error.message = Some("Password must be at least 6 characters".into());
        return Err(error);
    }
    Ok(())
}

/// Create authentication routes
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
}

/// Register a Firebase account and its store user.
///
/// A known store email is refused before any Firebase account is created.
#[utoipa::path(
    post,
    path = "/register",
    tag = "Authentication",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User registered successfully", body = RegisterResponse),
        (status = 400, description = "Validation error"),
        (status = 409, description = "User already exists")
    )
)]
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<RegisterRequest>,
) -> AppResult<(StatusCode, Json<RegisterResponse>)> {
    match state.services.users.get_user_by_email(&payload.email).await {
        Ok(_) => return Err(AppError::conflict("Email")),
        Err(AppError::NotFound) => {}
        Err(e) => return Err(e),
    }

    let token = state
        .identity
        .sign_up(&payload.email, &payload.password)
        .await?;

    let user = state
        .services
        .users
        .register(NewUser::new(&payload.email, Some(token.uid.clone())))
        .await?;

    Ok((StatusCode::CREATED, Json(RegisterResponse { user, token })))
}

/// Login and get a Firebase ID token
#[utoipa::path(
    post,
    path = "/login",
    tag = "Authentication",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = TokenResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<LoginRequest>,
) -> AppResult<Json<TokenResponse>> {
    let token = state
        .identity
        .sign_in(&payload.email, &payload.password)
        .await?;

    Ok(Json(token))
}
