pub mod app;
pub mod defaults;
pub mod error;
pub mod loader;
pub mod provider;
pub mod routing;
pub mod server;

pub use app::AppConfig;
pub use error::ConfigError;
pub use loader::{ensure_env_loaded, override_var};
pub use provider::{CostTier, ProviderKind, ProviderProfile};
pub use routing::RoutingConfig;
pub use server::{RateLimitSettings, ServerSettings};
