//! Fixed-window request limiting per client address.

use super::dto::ErrorResponse;
use super::state::ServerState;
use crate::config::RateLimitSettings;
use axum::Json;
use axum::extract::{ConnectInfo, Request, State};
use axum::http::{HeaderMap, HeaderValue, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::warn;

pub(crate) const LIMIT_HEADER: &str = "x-ratelimit-limit";
pub(crate) const REMAINING_HEADER: &str = "x-ratelimit-remaining";
pub(crate) const RESET_HEADER: &str = "x-ratelimit-reset";

/// Windows are swept once the table grows past this many clients.
const SWEEP_THRESHOLD: usize = 10_000;

#[derive(Debug, Clone, Copy)]
struct Window {
    count: u32,
    reset_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateDecision {
    pub allowed: bool,
    pub limit: u32,
    pub remaining: u32,
    pub reset_at: DateTime<Utc>,
}

impl RateDecision {
    fn apply(&self, headers: &mut HeaderMap) {
        headers.insert(LIMIT_HEADER, HeaderValue::from(self.limit));
        headers.insert(REMAINING_HEADER, HeaderValue::from(self.remaining));
        if let Ok(reset) = HeaderValue::from_str(&self.reset_at.to_rfc3339()) {
            headers.insert(RESET_HEADER, reset);
        }
    }
}

pub struct RateLimiter {
    settings: RateLimitSettings,
    windows: Mutex<HashMap<IpAddr, Window>>,
}

impl RateLimiter {
    pub fn new(settings: RateLimitSettings) -> Self {
        Self {
            settings,
            windows: Mutex::new(HashMap::new()),
        }
    }

    pub async fn check(&self, client: IpAddr) -> RateDecision {
        self.check_at(client, Utc::now()).await
    }

    pub async fn check_at(&self, client: IpAddr, now: DateTime<Utc>) -> RateDecision {
        let limit = self.settings.requests;
        let window_len = chrono::Duration::from_std(self.settings.window)
            .unwrap_or_else(|_| chrono::Duration::seconds(60));

        let mut windows = self.windows.lock().await;
        if windows.len() > SWEEP_THRESHOLD {
            windows.retain(|_, window| window.reset_at > now);
        }

        let window = windows.entry(client).or_insert(Window {
            count: 0,
            reset_at: now + window_len,
        });
        if now >= window.reset_at {
            window.count = 0;
            window.reset_at = now + window_len;
        }

        if window.count >= limit {
            return RateDecision {
                allowed: false,
                limit,
                remaining: 0,
                reset_at: window.reset_at,
            };
        }

        window.count += 1;
        RateDecision {
            allowed: true,
            limit,
            remaining: limit - window.count,
            reset_at: window.reset_at,
        }
    }
}

/// Middleware for task routes.
pub(super) async fn enforce(
    State(state): State<Arc<ServerState>>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    request: Request,
    next: Next,
) -> Response {
    let decision = state.limiter().check(addr.ip()).await;
    if !decision.allowed {
        warn!(client = %addr.ip(), limit = decision.limit, "Rate limit exceeded");
        let mut response = (
            StatusCode::TOO_MANY_REQUESTS,
            Json(ErrorResponse::new(
                "Rate limit exceeded. Please try again later.",
            )),
        )
            .into_response();
        decision.apply(response.headers_mut());
        return response;
    }

    let mut response = next.run(request).await;
    decision.apply(response.headers_mut());
    response
}
