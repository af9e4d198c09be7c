//! HTTP request handlers.

pub mod auth_handler;
pub mod cart_handler;
pub mod content_handler;
pub mod health_handler;
pub mod product_handler;
pub mod purchase_handler;
pub mod user_handler;

use serde::Serialize;
use utoipa::ToSchema;

use common::{AppError, AppResult};
use domain::{NewUser, User};

use crate::middleware::CurrentUser;
use crate::state::AppState;

pub use auth_handler::auth_routes;
pub use cart_handler::cart_routes;
pub use content_handler::{content_admin_routes, content_routes};
pub use health_handler::health_routes;
pub use product_handler::{product_admin_routes, product_routes};
pub use purchase_handler::purchase_routes;
pub use user_handler::user_routes;

/// Plain confirmation message.
#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Store user document of the authenticated caller.
///
/// A verified Firebase account without a store user gets one on first use.
pub(crate) async fn store_user(state: &AppState, current_user: &CurrentUser) -> AppResult<User> {
    let users = &state.services.users;
    match users.get_user_by_email(&current_user.email).await {
        Err(AppError::NotFound) => {}
        found => return found,
    }

    tracing::warn!(
        "Firebase account {} has no store user, creating it",
        current_user.uid
    );
    match users
        .register(NewUser::new(
            &current_user.email,
            Some(current_user.uid.clone()),
        ))
        .await
    {
        // Another request created it first
        Err(AppError::Conflict(_)) => users.get_user_by_email(&current_user.email).await,
        created => created,
    }
}
