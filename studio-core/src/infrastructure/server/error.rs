use super::dto::ErrorResponse;
use crate::application::router::RouterError;
use axum::Json;
use axum::http::StatusCode;
use std::net::SocketAddr;
use thiserror::Error;
use tracing::{error, warn};

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("failed to bind HTTP listener on {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },
    #[error("HTTP server error: {0}")]
    Serve(#[from] std::io::Error),
}

pub(crate) type ApiError = (StatusCode, Json<ErrorResponse>);
pub(crate) type ApiResult<T> = Result<Json<T>, ApiError>;

pub(crate) fn api_error(status: StatusCode, message: impl Into<String>) -> ApiError {
    (status, Json(ErrorResponse::new(message)))
}

/// HTTP status for a routing failure.
///
/// Only an upstream rejection of the request content is the caller's fault;
/// credential and throttling rejections are ours.
pub fn status_for(err: &RouterError) -> StatusCode {
    match err {
        RouterError::Validation(_) => StatusCode::BAD_REQUEST,
        RouterError::UnsupportedTask { .. } => StatusCode::SERVICE_UNAVAILABLE,
        RouterError::TransientUpstream { .. } if err.is_timeout() => StatusCode::GATEWAY_TIMEOUT,
        RouterError::TransientUpstream { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        RouterError::PermanentUpstream { .. } if err.is_rejected_input() => StatusCode::BAD_REQUEST,
        RouterError::PermanentUpstream { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        RouterError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

pub(crate) fn router_error(err: &RouterError) -> ApiError {
    let status = status_for(err);
    if status.is_server_error() {
        error!(status = status.as_u16(), error = %err, "Task request failed");
    } else {
        warn!(status = status.as_u16(), error = %err, "Task request rejected");
    }
    api_error(status, err.user_message())
}
