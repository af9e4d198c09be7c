//! Shared configuration structures.

use serde::{Deserialize, Serialize};

/// Base service configuration shared by all services.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServiceConfig {
    /// Service name for logging and tracing
    pub service_name: String,
    /// Host address to bind
    pub host: String,
    /// Port to listen on
    pub port: u16,
}

impl ServiceConfig {
    /// Get the full bind address.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            service_name: "gateway".to_string(),
            host: "0.0.0.0".to_string(),
            port: 3001,
        }
    }
}

/// MongoDB configuration.
#[derive(Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    /// Connection string (may embed credentials)
    #[serde(skip_serializing)]
    pub uri: String,
    /// Database holding every storefront collection
    pub database_name: String,
    /// Application name reported to the server
    pub app_name: String,
    pub max_pool_size: u32,
    pub min_pool_size: u32,
}

impl std::fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("uri", &"[REDACTED]")
            .field("database_name", &self.database_name)
            .field("app_name", &self.app_name)
            .field("max_pool_size", &self.max_pool_size)
            .field("min_pool_size", &self.min_pool_size)
            .finish()
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            uri: "mongodb://localhost:27017".to_string(),
            database_name: "tienda_duende".to_string(),
            app_name: "tienda-duende".to_string(),
            max_pool_size: 10,
            min_pool_size: 1,
        }
    }
}

/// Firebase Authentication configuration.
#[derive(Clone, Deserialize, Serialize)]
pub struct FirebaseConfig {
    /// Web API key of the Firebase project
    #[serde(skip_serializing)]
    pub api_key: String,
    /// Identity Toolkit base URL (point at the emulator for local work)
    pub auth_url: String,
}

impl std::fmt::Debug for FirebaseConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FirebaseConfig")
            .field("api_key", &"[REDACTED]")
            .field("auth_url", &self.auth_url)
            .finish()
    }
}

impl Default for FirebaseConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            auth_url: "https://identitytoolkit.googleapis.com".to_string(),
        }
    }
}
