//! Store service configuration.

use std::env;

use common::DatabaseConfig;

/// Store service configuration.
#[derive(Debug, Clone, Default)]
pub struct StoreServiceConfig {
    /// MongoDB connection settings
    pub database: DatabaseConfig,
}

impl StoreServiceConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let defaults = DatabaseConfig::default();

        Self {
            database: DatabaseConfig {
                uri: env::var("MONGODB_URI").unwrap_or(defaults.uri),
                database_name: env::var("DATABASE_NAME").unwrap_or(defaults.database_name),
                app_name: env::var("MONGODB_APP_NAME").unwrap_or(defaults.app_name),
                max_pool_size: env::var("MONGODB_MAX_POOL_SIZE")
                    .ok()
                    .and_then(|p| p.parse().ok())
                    .unwrap_or(defaults.max_pool_size),
                min_pool_size: env::var("MONGODB_MIN_POOL_SIZE")
                    .ok()
                    .and_then(|p| p.parse().ok())
                    .unwrap_or(defaults.min_pool_size),
            },
        }
    }
}
