//! Firebase Authentication client over the Identity Toolkit REST API.
//!
//! - `accounts:signInWithPassword` for login
//! - `accounts:signUp` for registration
//! - `accounts:lookup` to check an ID token sent by the frontend
//!
//! The base URL is configurable so the Auth emulator can be used locally.

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::debug;
use utoipa::ToSchema;

use common::{AppError, AppResult, FirebaseConfig};
use domain::TOKEN_TYPE_BEARER;

/// Carries the Web API key so it never appears in a request URL
const API_KEY_HEADER: &str = "x-goog-api-key";

/// Token response returned to the frontend after sign-in or sign-up.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TokenResponse {
    /// Firebase ID token, sent back as `Authorization: Bearer <token>`
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    /// Seconds until the ID token expires
    pub expires_in: i64,
    /// Firebase account id
    pub uid: String,
    pub email: String,
}

/// Account behind a verified ID token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedIdentity {
    pub uid: String,
    pub email: String,
}

/// Identity provider used for sign-in, sign-up and token checks.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn sign_in(&self, email: &str, password: &str) -> AppResult<TokenResponse>;

    async fn sign_up(&self, email: &str, password: &str) -> AppResult<TokenResponse>;

    /// Resolve an ID token to its account; `Unauthorized` when invalid or expired
    async fn verify(&self, id_token: &str) -> AppResult<VerifiedIdentity>;
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PasswordRequest<'a> {
    email: &'a str,
    password: &'a str,
    return_secure_token: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct LookupRequest<'a> {
    id_token: &'a str,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AuthResponse {
    id_token: String,
    #[serde(default)]
    refresh_token: String,
    /// Seconds, sent as a string
    #[serde(default)]
    expires_in: String,
    local_id: String,
    #[serde(default)]
    email: String,
}

impl From<AuthResponse> for TokenResponse {
    fn from(response: AuthResponse) -> Self {
        Self {
            access_token: response.id_token,
            refresh_token: response.refresh_token,
            token_type: TOKEN_TYPE_BEARER.to_string(),
            expires_in: response.expires_in.parse().unwrap_or(3600),
            uid: response.local_id,
            email: response.email,
        }
    }
}

#[derive(Deserialize)]
struct LookupResponse {
    #[serde(default)]
    users: Vec<LookupUser>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct LookupUser {
    local_id: String,
    #[serde(default)]
    email: Option<String>,
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Deserialize)]
struct ErrorDetail {
    #[serde(default)]
    message: String,
}

/// Map an Identity Toolkit error message onto an application error.
///
/// Messages look like `EMAIL_EXISTS` or `WEAK_PASSWORD : Password should be ...`.
pub fn map_firebase_error(message: &str) -> AppError {
    let code = message.split(':').next().unwrap_or_default().trim();

    match code {
        "EMAIL_NOT_FOUND" | "INVALID_PASSWORD" | "INVALID_LOGIN_CREDENTIALS"
        | "USER_DISABLED" => AppError::InvalidCredentials,
        "EMAIL_EXISTS" => AppError::conflict("Email"),
        "WEAK_PASSWORD" => AppError::validation("Password should be at least 6 characters"),
        "INVALID_EMAIL" | "MISSING_EMAIL" => AppError::validation("Invalid email format"),
        "INVALID_ID_TOKEN" | "TOKEN_EXPIRED" | "USER_NOT_FOUND" => AppError::Unauthorized,
        "TOO_MANY_ATTEMPTS_TRY_LATER" => AppError::TooManyRequests,
        _ => AppError::internal(format!("Firebase error: {}", message)),
    }
}

/// Identity Toolkit client. Cheap to clone; the HTTP pool is shared.
#[derive(Clone)]
pub struct FirebaseAuthClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl FirebaseAuthClient {
    /// Create a new client.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(config: &FirebaseConfig) -> AppResult<Self> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| AppError::internal(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.auth_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        })
    }

    fn request<B: Serialize>(&self, endpoint: &str, body: &B) -> reqwest::RequestBuilder {
        self.client
            .post(format!("{}/v1/accounts:{}", self.base_url, endpoint))
            .header(API_KEY_HEADER, self.api_key.as_str())
            .json(body)
    }

    /// POST to `accounts:<endpoint>` and decode the JSON answer.
    async fn post<B, T>(&self, endpoint: &str, body: &B) -> AppResult<T>
    where
        B: Serialize + Sync,
        T: DeserializeOwned,
    {
        let response = self.request(endpoint, body).send().await.map_err(|e| {
            tracing::error!("Firebase request to {} failed: {}", endpoint, e.without_url());
            AppError::service_unavailable("firebase")
        })?;

        let status = response.status();
        if status.is_success() {
            return response.json().await.map_err(|e| {
                AppError::internal(format!("Invalid Firebase response: {}", e.without_url()))
            });
        }

        let error = match response.json::<ErrorResponse>().await {
            Ok(body) => map_firebase_error(&body.error.message),
            Err(_) => AppError::internal(format!("Firebase answered HTTP {}", status)),
        };
        debug!("Firebase {} rejected: {}", endpoint, error);
        Err(error)
    }
}

#[async_trait]
impl IdentityProvider for FirebaseAuthClient {
    async fn sign_in(&self, email: &str, password: &str) -> AppResult<TokenResponse> {
        let request = PasswordRequest {
            email,
            password,
            return_secure_token: true,
        };

        let response: AuthResponse = self.post("signInWithPassword", &request).await?;
        Ok(TokenResponse::from(response))
    }

    async fn sign_up(&self, email: &str, password: &str) -> AppResult<TokenResponse> {
        let request = PasswordRequest {
            email,
            password,
            return_secure_token: true,
        };

        let response: AuthResponse = self.post("signUp", &request).await?;
        tracing::info!("Created Firebase account {}", response.local_id);
        Ok(TokenResponse::from(response))
    }

    async fn verify(&self, id_token: &str) -> AppResult<VerifiedIdentity> {
        let response: LookupResponse = self.post("lookup", &LookupRequest { id_token }).await?;

        let user = response
            .users
            .into_iter()
            .next()
            .ok_or(AppError::Unauthorized)?;
        let email = user.email.ok_or(AppError::Unauthorized)?;

        Ok(VerifiedIdentity {
            uid: user.local_id,
            email,
        })
    }
}
