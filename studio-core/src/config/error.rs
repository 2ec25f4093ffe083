use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur when loading or validating configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("configuration file not found at {path:?}")]
    NotFound { path: PathBuf },

    #[error("failed to read config from {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse config {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("no providers configured - at least one [[providers]] entry is required")]
    NoProvidersConfigured,

    #[error("provider id '{provider}' is defined more than once")]
    DuplicateProvider { provider: String },

    #[error("provider '{provider}' is missing required field 'endpoint'")]
    MissingEndpoint { provider: String },

    #[error("provider '{provider}' has unknown type '{provider_type}'")]
    UnknownProviderType {
        provider: String,
        provider_type: String,
    },

    #[error("provider '{provider}' lists unknown capability '{capability}'")]
    UnknownCapability { provider: String, capability: String },

    #[error("provider '{provider}' has unknown cost tier '{cost_tier}'")]
    UnknownCostTier { provider: String, cost_tier: String },

    #[error("'{field}' must be greater than zero")]
    NotPositive { field: String },

    #[error("routing chain key '{task}' is not a known task")]
    UnknownChainTask { task: String },

    #[error("image tier '{tier}' is not one of fast, balanced, high, ultra")]
    UnknownQualityTier { tier: String },

    #[error("routing for '{scope}' references unknown provider '{provider}'")]
    UnknownChainProvider { scope: String, provider: String },

    #[error("invalid bind address '{value}'")]
    InvalidBindAddress { value: String },
}
