//! Gateway configuration.

use std::env;

use common::{FirebaseConfig, ServiceConfig};

/// Gateway configuration.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Bind address
    pub server: ServiceConfig,
    /// Identity Toolkit settings
    pub firebase: FirebaseConfig,
    /// Frontend origin allowed by CORS
    pub cors_allowed_origin: String,
}

impl GatewayConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let api_key = env::var("FIREBASE_API_KEY").unwrap_or_default();
        if api_key.is_empty() {
            tracing::warn!("FIREBASE_API_KEY is not set, sign-in and token checks will fail");
        }

        Self {
            server: ServiceConfig {
                service_name: defaults.server.service_name,
                host: env::var("GATEWAY_HOST").unwrap_or(defaults.server.host),
                port: env::var("GATEWAY_PORT")
                    .ok()
                    .and_then(|p| p.parse().ok())
                    .unwrap_or(defaults.server.port),
            },
            firebase: FirebaseConfig {
                api_key,
                auth_url: env::var("FIREBASE_AUTH_URL").unwrap_or(defaults.firebase.auth_url),
            },
            cors_allowed_origin: env::var("CORS_ALLOWED_ORIGIN")
                .unwrap_or(defaults.cors_allowed_origin),
        }
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            server: ServiceConfig::default(),
            firebase: FirebaseConfig::default(),
            cors_allowed_origin: "http://localhost:3000".to_string(),
        }
    }
}
