//! Authentication middleware.

use axum::{
    body::Body,
    extract::State,
    http::{header::AUTHORIZATION, HeaderMap, Request},
    middleware::Next,
    response::Response,
};

use common::{AppError, AppResult};
use domain::BEARER_TOKEN_PREFIX;

use crate::state::AppState;

/// Firebase account of the caller, verified from the ID token.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub uid: String,
    pub email: String,
}

/// Authentication middleware that verifies Firebase ID tokens.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    // Extract token from Authorization header
    let token = extract_token(request.headers())?;

    // Verify token with the identity provider
    let identity = state.identity.verify(&token).await?;

    // Insert current user into request extensions
    request.extensions_mut().insert(CurrentUser {
        uid: identity.uid,
        email: identity.email,
    });

    Ok(next.run(request).await)
}

/// Extract bearer token from Authorization header.
fn extract_token(headers: &HeaderMap) -> AppResult<String> {
    let auth_header = headers
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or(AppError::Unauthorized)?;

    let token = auth_header
        .strip_prefix(BEARER_TOKEN_PREFIX)
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or(AppError::Unauthorized)?;

    Ok(token.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn bearer_token_is_extracted() {
        assert_eq!(extract_token(&headers("Bearer abc.def")).unwrap(), "abc.def");
    }

    #[test]
    fn missing_or_malformed_header_is_unauthorized() {
        assert!(matches!(
            extract_token(&HeaderMap::new()),
            Err(AppError::Unauthorized)
        ));
        assert!(matches!(
            extract_token(&headers("Basic dXNlcjpwYXNz")),
            Err(AppError::Unauthorized)
        ));
        assert!(matches!(
            extract_token(&headers("Bearer ")),
            Err(AppError::Unauthorized)
        ));
    }
}
