//! Server-sent-event variants of the text task endpoints.
//!
//! Every chunk is sent as `data: {"chunk": ...}`. A complete stream ends with
//! `data: {"done": true, ...}`; one that breaks off ends with
//! `data: {"error": ...}` instead. Failures before the first chunk are
//! ordinary JSON error responses.

use super::super::dto::{
    ChatRequest, ErrorResponse, GamedevRequest, GenerateIdeasRequest, RefineContentRequest,
    StreamFrame, SummarizeRequest,
};
use super::super::error::{ApiError, router_error};
use super::super::state::ServerState;
use super::tasks::{Body, gamedev_task, payload};
use crate::application::router::StreamingReply;
use crate::domain::TaskKind;
use axum::extract::{Path, State};
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::response::{IntoResponse, Response};
use futures::StreamExt;
use futures::stream;
use std::sync::Arc;
use tracing::{info, warn};

/// Stops nginx-style proxies from buffering the event stream.
const ACCEL_BUFFERING_HEADER: &str = "x-accel-buffering";

async fn run_stream(state: &ServerState, kind: TaskKind, body: Body) -> Result<Response, ApiError> {
    let payload = payload(kind, body)?;

    info!(task = kind.as_str(), "Received streamed task request");
    match state.router().handle_stream(kind.as_str(), &payload).await {
        Ok(reply) => Ok(sse_response(reply)),
        Err(err) => Err(router_error(&err)),
    }
}

fn sse_response(reply: StreamingReply) -> Response {
    let StreamingReply {
        task,
        provider,
        model_used,
        attempts,
        chunks,
    } = reply;
    let done = StreamFrame::Done {
        done: true,
        provider,
        model_used,
        attempts,
    };

    let frames = stream::unfold(Some((chunks, done)), move |state| async move {
        let (mut chunks, done) = state?;
        match chunks.next().await {
            Some(Ok(chunk)) => Some((StreamFrame::Chunk { chunk }, Some((chunks, done)))),
            Some(Err(err)) => {
                warn!(task = task.as_str(), error = %err, "Streamed response interrupted");
                let error = StreamFrame::Error {
                    error: err.user_message(),
                };
                Some((error, None))
            }
            None => Some((done, None)),
        }
    });
    let events = frames.map(|frame| Event::default().json_data(frame));

    (
        [(ACCEL_BUFFERING_HEADER, "no")],
        Sse::new(events).keep_alive(KeepAlive::default()),
    )
        .into_response()
}

#[utoipa::path(
    post,
    path = "/api/summarize/stream",
    tag = "streaming",
    request_body = SummarizeRequest,
    responses(
        (status = 200, description = "Summary streamed as server-sent events", content_type = "text/event-stream", body = String),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 429, description = "Rate limit exceeded", body = ErrorResponse),
        (status = 500, description = "No provider could start the stream", body = ErrorResponse),
        (status = 504, description = "Upstream timeout", body = ErrorResponse)
    )
)]
pub async fn summarize_stream_handler(
    State(state): State<Arc<ServerState>>,
    body: Body,
) -> Result<Response, ApiError> {
    run_stream(&state, TaskKind::Summarize, body).await
}

#[utoipa::path(
    post,
    path = "/api/generate-ideas/stream",
    tag = "streaming",
    request_body = GenerateIdeasRequest,
    responses(
        (status = 200, description = "Ideas streamed as server-sent events", content_type = "text/event-stream", body = String),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 500, description = "No provider could start the stream", body = ErrorResponse)
    )
)]
pub async fn generate_ideas_stream_handler(
    State(state): State<Arc<ServerState>>,
    body: Body,
) -> Result<Response, ApiError> {
    run_stream(&state, TaskKind::GenerateIdeas, body).await
}

#[utoipa::path(
    post,
    path = "/api/refine-content/stream",
    tag = "streaming",
    request_body = RefineContentRequest,
    responses(
        (status = 200, description = "Refined content streamed as server-sent events", content_type = "text/event-stream", body = String),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 500, description = "No provider could start the stream", body = ErrorResponse)
    )
)]
pub async fn refine_content_stream_handler(
    State(state): State<Arc<ServerState>>,
    body: Body,
) -> Result<Response, ApiError> {
    run_stream(&state, TaskKind::RefineContent, body).await
}

#[utoipa::path(
    post,
    path = "/api/chat/stream",
    tag = "streaming",
    request_body = ChatRequest,
    responses(
        (status = 200, description = "Chat reply streamed as server-sent events", content_type = "text/event-stream", body = String),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 500, description = "No provider could start the stream", body = ErrorResponse)
    )
)]
pub async fn chat_stream_handler(
    State(state): State<Arc<ServerState>>,
    body: Body,
) -> Result<Response, ApiError> {
    run_stream(&state, TaskKind::Chat, body).await
}

#[utoipa::path(
    post,
    path = "/api/gamedev/{kind}/stream",
    tag = "streaming",
    params(("kind" = String, Path, description = "story | dialogue | mechanics | code | explain")),
    request_body = GamedevRequest,
    responses(
        (status = 200, description = "Game development content streamed as server-sent events", content_type = "text/event-stream", body = String),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 404, description = "Unknown gamedev tool", body = ErrorResponse),
        (status = 500, description = "No provider could start the stream", body = ErrorResponse)
    )
)]
pub async fn gamedev_stream_handler(
    State(state): State<Arc<ServerState>>,
    Path(kind): Path<String>,
    body: Body,
) -> Result<Response, ApiError> {
    let task = gamedev_task(&kind)?;
    run_stream(&state, task, body).await
}
