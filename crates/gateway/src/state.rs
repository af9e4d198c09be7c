//! Application state for dependency injection.

use std::sync::Arc;

use store_service_lib::StoreServices;

use crate::clients::IdentityProvider;
use crate::config::GatewayConfig;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub services: StoreServices,
    pub identity: Arc<dyn IdentityProvider>,
    pub config: GatewayConfig,
}

impl AppState {
    /// Create new app state.
    pub fn new(
        services: StoreServices,
        identity: Arc<dyn IdentityProvider>,
        config: GatewayConfig,
    ) -> Self {
        Self {
            services,
            identity,
            config,
        }
    }
}
