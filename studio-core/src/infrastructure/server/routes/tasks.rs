//! One POST endpoint per task. Bodies are taken as raw JSON and validated by
//! the classifier so every field error maps to the same 400 shape.

use super::super::dto::{
    ChatRequest, ErrorResponse, GamedevRequest, GenerateIdeasRequest, GenerateImageRequest,
    RefineContentRequest, SummarizeRequest, TaskResponse,
};
use super::super::error::{ApiError, ApiResult, api_error, router_error};
use super::super::state::ServerState;
use crate::domain::TaskKind;
use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use serde_json::Value;
use std::sync::Arc;
use tracing::{info, warn};

pub(super) type Body = Result<Json<Value>, JsonRejection>;

pub(super) fn payload(kind: TaskKind, body: Body) -> Result<Value, ApiError> {
    let Json(payload) = body.map_err(|rejection| {
        warn!(
            task = kind.as_str(),
            reason = rejection.body_text().as_str(),
            "Rejecting malformed request body"
        );
        api_error(StatusCode::BAD_REQUEST, "Invalid request data.")
    })?;
    Ok(payload)
}

/// `story`, `dialogue`, ... to the matching gamedev task; anything else is 404.
pub(super) fn gamedev_task(kind: &str) -> Result<TaskKind, ApiError> {
    TaskKind::from_tool(&format!("gamedev/{kind}"))
        .filter(|task| task.as_str().starts_with("gamedev-"))
        .ok_or_else(|| {
            api_error(
                StatusCode::NOT_FOUND,
                format!("Unknown gamedev tool '{kind}'."),
            )
        })
}

async fn run_task(state: &ServerState, kind: TaskKind, body: Body) -> ApiResult<TaskResponse> {
    let payload = payload(kind, body)?;

    info!(task = kind.as_str(), "Received task request");
    match state.router().handle(kind.as_str(), &payload).await {
        Ok(result) => Ok(Json(TaskResponse::from(result))),
        Err(err) => Err(router_error(&err)),
    }
}

#[utoipa::path(
    post,
    path = "/api/summarize",
    tag = "tasks",
    request_body = SummarizeRequest,
    responses(
        (status = 200, description = "Summary generated", body = TaskResponse),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 429, description = "Rate limit exceeded", body = ErrorResponse),
        (status = 500, description = "Upstream or internal failure", body = ErrorResponse),
        (status = 504, description = "Upstream timeout", body = ErrorResponse)
    )
)]
pub async fn summarize_handler(
    State(state): State<Arc<ServerState>>,
    body: Body,
) -> ApiResult<TaskResponse> {
    run_task(&state, TaskKind::Summarize, body).await
}

#[utoipa::path(
    post,
    path = "/api/generate-ideas",
    tag = "tasks",
    request_body = GenerateIdeasRequest,
    responses(
        (status = 200, description = "Ideas generated", body = TaskResponse),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 500, description = "Upstream or internal failure", body = ErrorResponse),
        (status = 504, description = "Upstream timeout", body = ErrorResponse)
    )
)]
pub async fn generate_ideas_handler(
    State(state): State<Arc<ServerState>>,
    body: Body,
) -> ApiResult<TaskResponse> {
    run_task(&state, TaskKind::GenerateIdeas, body).await
}

#[utoipa::path(
    post,
    path = "/api/refine-content",
    tag = "tasks",
    request_body = RefineContentRequest,
    responses(
        (status = 200, description = "Content refined", body = TaskResponse),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 500, description = "Upstream or internal failure", body = ErrorResponse),
        (status = 504, description = "Upstream timeout", body = ErrorResponse)
    )
)]
pub async fn refine_content_handler(
    State(state): State<Arc<ServerState>>,
    body: Body,
) -> ApiResult<TaskResponse> {
    run_task(&state, TaskKind::RefineContent, body).await
}

#[utoipa::path(
    post,
    path = "/api/chat",
    tag = "tasks",
    request_body = ChatRequest,
    responses(
        (status = 200, description = "Chat reply generated", body = TaskResponse),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 500, description = "Upstream or internal failure", body = ErrorResponse),
        (status = 504, description = "Upstream timeout", body = ErrorResponse)
    )
)]
pub async fn chat_handler(
    State(state): State<Arc<ServerState>>,
    body: Body,
) -> ApiResult<TaskResponse> {
    run_task(&state, TaskKind::Chat, body).await
}

#[utoipa::path(
    post,
    path = "/api/generate-image",
    tag = "tasks",
    request_body = GenerateImageRequest,
    responses(
        (status = 200, description = "Image URL generated", body = TaskResponse),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 500, description = "Upstream or internal failure", body = ErrorResponse),
        (status = 503, description = "No image provider available", body = ErrorResponse),
        (status = 504, description = "Upstream timeout", body = ErrorResponse)
    )
)]
pub async fn generate_image_handler(
    State(state): State<Arc<ServerState>>,
    body: Body,
) -> ApiResult<TaskResponse> {
    run_task(&state, TaskKind::GenerateImage, body).await
}

#[utoipa::path(
    post,
    path = "/api/gamedev/{kind}",
    tag = "gamedev",
    params(("kind" = String, Path, description = "story | dialogue | mechanics | code | explain")),
    request_body = GamedevRequest,
    responses(
        (status = 200, description = "Game development content generated", body = TaskResponse),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 404, description = "Unknown gamedev tool", body = ErrorResponse),
        (status = 500, description = "Upstream or internal failure", body = ErrorResponse),
        (status = 504, description = "Upstream timeout", body = ErrorResponse)
    )
)]
pub async fn gamedev_handler(
    State(state): State<Arc<ServerState>>,
    Path(kind): Path<String>,
    body: Body,
) -> ApiResult<TaskResponse> {
    let task = gamedev_task(&kind)?;
    run_task(&state, task, body).await
}
