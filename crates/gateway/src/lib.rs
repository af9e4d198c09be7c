//! API Gateway Library
//!
//! HTTP REST API of the storefront. Requests are served by the store services
//! running in-process; accounts and tokens are delegated to Firebase Authentication.

pub mod clients;
pub mod config;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod openapi;
pub mod routes;
pub mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use tower_http::trace::TraceLayer;
use tracing::info;

use crate::clients::FirebaseAuthClient;
use crate::config::GatewayConfig;
use crate::routes::create_router;
use crate::state::AppState;

/// Run the gateway on the given address.
pub async fn run_server(host: &str, port: u16) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = GatewayConfig::from_env();
    config.server.host = host.to_string();
    config.server.port = port;

    run_server_with_config(config).await
}

/// Run the HTTP server with the given configuration.
async fn run_server_with_config(config: GatewayConfig) -> Result<(), Box<dyn std::error::Error>> {
    // Connect to MongoDB and build the store services
    let services = store_service_lib::connect_services().await?;

    // Create identity provider
    let identity = Arc::new(FirebaseAuthClient::new(&config.firebase)?);

    // Build address
    let addr: SocketAddr = config.server.addr().parse()?;

    // Create app state
    let state = AppState::new(services, identity, config);

    // Build router
    let app = create_router(state).layer(TraceLayer::new_for_http());

    info!("Gateway listening on {}", addr);

    // Run server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
