use super::error::ConfigError;
use super::provider::ProviderProfile;
use super::routing::RoutingConfig;
use super::server::ServerSettings;
use crate::domain::TaskKind;
use std::path::Path;

/// Immutable router configuration, built once at start-up and handed to the
/// router and server by value.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server: ServerSettings,
    pub routing: RoutingConfig,
    pub providers: Vec<ProviderProfile>,
}

impl AppConfig {
    /// Load configuration from a file path (or the default path / built-ins if None)
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        super::loader::load_config(path)
    }

    pub fn builtin() -> Result<Self, ConfigError> {
        super::loader::builtin_config()
    }

    /// Parse TOML text, reading overrides from the process environment.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        super::loader::parse_config(content, Path::new("<inline>"), &|name| {
            std::env::var(name).ok()
        })
    }

    pub fn provider(&self, id: &str) -> Option<&ProviderProfile> {
        self.providers.iter().find(|provider| provider.id == id)
    }

    /// Profiles declaring support for `task`, in declaration order.
    pub fn capable_of(&self, task: TaskKind) -> impl Iterator<Item = &ProviderProfile> {
        self.providers
            .iter()
            .filter(move |provider| provider.supports(task))
    }
}
