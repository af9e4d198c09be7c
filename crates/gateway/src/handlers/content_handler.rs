//! Gallery content handlers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::{get, post, put},
    Router,
};
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use common::AppResult;
use domain::{split_keywords, Content, ContentInput};

use crate::extractors::ValidatedJson;
use crate::state::AppState;

/// Gallery entry request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ContentRequest {
    #[validate(length(min = 1, message = "Name is required"))]
    #[schema(example = "Hada del bosque")]
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Keywords; entries may hold several comma separated values
    #[serde(default)]
    #[schema(example = json!(["hadas, bosque"]))]
    pub keywords: Vec<String>,
    #[validate(length(min = 1, message = "Image is required"))]
    pub image: String,
}

impl From<ContentRequest> for ContentInput {
    fn from(request: ContentRequest) -> Self {
        Self {
            name: request.name,
            description: request.description,
            keywords: request
                .keywords
                .iter()
                .map(String::as_str)
                .flat_map(split_keywords)
                .collect(),
            image: request.image,
        }
    }
}

/// Gallery entry update request
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateContentRequest {
    #[validate(length(min = 1, message = "Content id is required"))]
    pub content_id: String,
    #[serde(flatten)]
    #[validate(nested)]
    pub content: ContentRequest,
}

/// Public gallery routes
pub fn content_routes() -> Router<AppState> {
    Router::new()
        .route("/getAllContent", get(get_all_content))
        .route("/getContent/:id", get(get_content))
}

/// Gallery management routes (auth required)
pub fn content_admin_routes() -> Router<AppState> {
    Router::new()
        .route("/addContent", post(add_content))
        .route("/updateContent", put(update_content))
}

/// List gallery entries
#[utoipa::path(
    get,
    path = "/getAllContent",
    tag = "Gallery",
    responses(
        (status = 200, description = "Gallery entries, newest first", body = Vec<Content>)
    )
)]
pub async fn get_all_content(State(state): State<AppState>) -> AppResult<Json<Vec<Content>>> {
    let content = state.services.content.list_content().await?;
    Ok(Json(content))
}

/// Get gallery entry by id
#[utoipa::path(
    get,
    path = "/getContent/{id}",
    tag = "Gallery",
    params(
        ("id" = String, Path, description = "Content id")
    ),
    responses(
        (status = 200, description = "Gallery entry", body = Content),
        (status = 404, description = "Content not found")
    )
)]
pub async fn get_content(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Content>> {
    let content = state.services.content.get_content(&id).await?;
    Ok(Json(content))
}

/// Add a gallery entry
#[utoipa::path(
    post,
    path = "/addContent",
    tag = "Gallery",
    security(("bearer_auth" = [])),
    request_body = ContentRequest,
    responses(
        (status = 201, description = "Gallery entry created", body = Content),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn add_content(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<ContentRequest>,
) -> AppResult<(StatusCode, Json<Content>)> {
    let content = state
        .services
        .content
        .add_content(ContentInput::from(payload))
        .await?;

    Ok((StatusCode::CREATED, Json(content)))
}

/// Update a gallery entry
#[utoipa::path(
    put,
    path = "/updateContent",
    tag = "Gallery",
    security(("bearer_auth" = [])),
    request_body = UpdateContentRequest,
    responses(
        (status = 200, description = "Gallery entry updated", body = Content),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Content not found")
    )
)]
pub async fn update_content(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<UpdateContentRequest>,
) -> AppResult<Json<Content>> {
    let content = state
        .services
        .content
        .update_content(payload.content_id, ContentInput::from(payload.content))
        .await?;

    Ok(Json(content))
}
