//! Application constants
//!
//! Single source of truth for paths, limits and built-in defaults.

/// Default configuration file path
pub const CONFIG_PATH: &str = "config/router.toml";

/// Default environment file path
pub const ENV_PATH: &str = "config/.env";

/// Default REST bind address
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8000";

/// Per-attempt upstream timeout when neither the profile nor the environment sets one
pub const DEFAULT_ATTEMPT_TIMEOUT_SECS: u64 = 30;

/// Overall budget shared by every attempt of one request
pub const DEFAULT_DEADLINE_SECS: u64 = 90;

/// Fixed-window rate limit defaults
pub const DEFAULT_RATE_LIMIT_REQUESTS: u32 = 60;
pub const DEFAULT_RATE_LIMIT_WINDOW_SECS: u64 = 60;

pub const DEFAULT_PRIORITY: u32 = 100;

/// Default Gemini API path (fallback when not specified in config)
pub const DEFAULT_GEMINI_API_PATH: &str = "v1beta/models";
pub const DEFAULT_OPENAI_CHAT_PATH: &str = "/v1/chat/completions";
pub const DEFAULT_OPENAI_IMAGE_PATH: &str = "/v1/images/generations";

/// Temperature forwarded for text tasks that do not expose a creativity control
pub const DEFAULT_TEMPERATURE: f64 = 0.7;

pub const SERVICE_NAME: &str = "Content Studio Router";

/// Upstream error bodies are cut to this many characters before logging
pub const MAX_LOGGED_BODY_CHARS: usize = 512;
