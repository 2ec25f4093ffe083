use crate::constants::{DEFAULT_RATE_LIMIT_REQUESTS, DEFAULT_RATE_LIMIT_WINDOW_SECS};
use serde::Deserialize;
use std::net::SocketAddr;
use std::time::Duration;

/// Fixed-window request allowance per client address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitSettings {
    pub requests: u32,
    pub window: Duration,
}

impl Default for RateLimitSettings {
    fn default() -> Self {
        Self {
            requests: DEFAULT_RATE_LIMIT_REQUESTS,
            window: Duration::from_secs(DEFAULT_RATE_LIMIT_WINDOW_SECS),
        }
    }
}

/// REST surface settings from the `[server]` table.
#[derive(Debug, Clone, PartialEq)]
pub struct ServerSettings {
    pub bind: SocketAddr,
    pub allowed_origins: Vec<String>,
    pub rate_limit: RateLimitSettings,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            allowed_origins: default_allowed_origins(),
            rate_limit: RateLimitSettings::default(),
        }
    }
}

pub(super) fn default_bind() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 8000))
}

/// Local front-end dev servers.
pub fn default_allowed_origins() -> Vec<String> {
    ["localhost", "127.0.0.1"]
        .iter()
        .flat_map(|host| (3000..=3002).map(move |port| format!("http://{host}:{port}")))
        .collect()
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub(super) struct RawServerSettings {
    #[serde(default)]
    pub(super) bind: Option<String>,
    #[serde(default)]
    pub(super) allowed_origins: Option<Vec<String>>,
    #[serde(default)]
    pub(super) rate_limit_requests: Option<u32>,
    #[serde(default)]
    pub(super) rate_limit_window_secs: Option<u64>,
}
