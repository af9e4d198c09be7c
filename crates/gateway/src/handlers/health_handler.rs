//! Health check handler.

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use serde::Serialize;

use common::AppResult;

use crate::state::AppState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Health {
    Healthy,
    Unhealthy,
    Degraded,
}

/// Health of one backing dependency.
#[derive(Debug, Serialize)]
pub struct DependencyHealth {
    pub status: Health,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<AppResult<()>> for DependencyHealth {
    fn from(result: AppResult<()>) -> Self {
        match result {
            Ok(()) => Self {
                status: Health::Healthy,
                error: None,
            },
            Err(e) => Self {
                status: Health::Unhealthy,
                error: Some(e.user_message()),
            },
        }
    }
}

#[derive(Debug, Serialize)]
pub struct Dependencies {
    pub mongodb: DependencyHealth,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: Health,
    pub services: Dependencies,
}

pub fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}

/// Ping MongoDB; 503 with `degraded` when it does not answer.
pub async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let mongodb = DependencyHealth::from(state.services.health.ping().await);

    let (code, status) = match mongodb.status {
        Health::Healthy => (StatusCode::OK, Health::Healthy),
        _ => (StatusCode::SERVICE_UNAVAILABLE, Health::Degraded),
    };

    (
        code,
        Json(HealthResponse {
            status,
            services: Dependencies { mongodb },
        }),
    )
}
