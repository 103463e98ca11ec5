//! Prompt Routes - Submission and record management
//!
//! HTTP handlers that delegate to PromptService.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Extension, Json, Router,
};

use promptgen::{DomainError, PromptRecord};

use crate::application::SubmitError;
use crate::auth::Caller;
use crate::models::{CreatePromptRequest, CreatePromptResponse};
use crate::AppState;

fn internal_error(e: DomainError) -> (StatusCode, String) {
    tracing::error!("Store operation failed: {}", e);
    (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
}

/// Start prompt generation
#[utoipa::path(
    post,
    path = "/createPrompt",
    request_body = CreatePromptRequest,
    responses(
        (status = 202, description = "Generation started", body = CreatePromptResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "No such prompt owned by the caller"),
        (status = 500, description = "Record could not be created"),
        (status = 502, description = "Workflow could not be started")
    ),
    tag = "Prompt"
)]
pub async fn create_prompt(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    Json(payload): Json<CreatePromptRequest>,
) -> Result<(StatusCode, Json<CreatePromptResponse>), (StatusCode, String)> {
    let response = state
        .prompt_service
        .create_prompt(&caller.sub, payload)
        .await
        .map_err(|e| {
            tracing::error!("{}", e);
            match e {
                SubmitError::NotFound(_) => (StatusCode::NOT_FOUND, e.to_string()),
                SubmitError::Record(_) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
                SubmitError::Workflow(_) => (StatusCode::BAD_GATEWAY, e.to_string()),
            }
        })?;

    Ok((StatusCode::ACCEPTED, Json(response)))
}

/// List the caller's prompts
#[utoipa::path(
    get,
    path = "/prompts",
    responses(
        (status = 200, description = "Caller's prompts, newest first", body = Vec<PromptRecord>),
        (status = 500, description = "Internal server error")
    ),
    tag = "Prompt"
)]
pub async fn list_prompts(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
) -> Result<Json<Vec<PromptRecord>>, (StatusCode, String)> {
    let records = state
        .prompt_service
        .list(&caller.sub)
        .await
        .map_err(internal_error)?;

    Ok(Json(records))
}

/// List every prompt in the store
#[utoipa::path(
    get,
    path = "/prompts/all",
    responses(
        (status = 200, description = "All prompts", body = Vec<PromptRecord>),
        (status = 500, description = "Internal server error")
    ),
    tag = "Prompt"
)]
pub async fn list_all_prompts(
    State(state): State<AppState>,
) -> Result<Json<Vec<PromptRecord>>, (StatusCode, String)> {
    let records = state
        .prompt_service
        .list_all()
        .await
        .map_err(internal_error)?;

    Ok(Json(records))
}

/// Get a prompt by ID
#[utoipa::path(
    get,
    path = "/prompts/{id}",
    params(
        ("id" = String, Path, description = "Prompt ID")
    ),
    responses(
        (status = 200, description = "Prompt found", body = PromptRecord),
        (status = 404, description = "Prompt not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Prompt"
)]
pub async fn get_prompt(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    Path(id): Path<String>,
) -> Result<Json<PromptRecord>, (StatusCode, String)> {
    let record = state
        .prompt_service
        .get(&caller.sub, &id)
        .await
        .map_err(internal_error)?
        .ok_or((StatusCode::NOT_FOUND, "Prompt not found".to_string()))?;

    Ok(Json(record))
}

/// Delete a prompt
#[utoipa::path(
    delete,
    path = "/prompts/{id}",
    params(
        ("id" = String, Path, description = "Prompt ID")
    ),
    responses(
        (status = 204, description = "Prompt deleted"),
        (status = 404, description = "Prompt not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Prompt"
)]
pub async fn delete_prompt(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    Path(id): Path<String>,
) -> Result<StatusCode, (StatusCode, String)> {
    let deleted = state
        .prompt_service
        .delete(&caller.sub, &id)
        .await
        .map_err(internal_error)?;

    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err((StatusCode::NOT_FOUND, "Prompt not found".to_string()))
    }
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/createPrompt", post(create_prompt))
        .route("/prompts", get(list_prompts))
        .route("/prompts/all", get(list_all_prompts))
        .route("/prompts/:id", get(get_prompt).delete(delete_prompt))
}
