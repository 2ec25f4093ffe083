use super::app::AppConfig;
use super::defaults::DEFAULT_ROUTER_TOML;
use super::error::ConfigError;
use super::provider::{
    CostTier, ProviderKind, ProviderProfile, RawProviderConfig, expand_capability,
};
use super::routing::{RawRouting, RoutingConfig};
use super::server::{
    RateLimitSettings, RawServerSettings, ServerSettings, default_allowed_origins, default_bind,
};
use crate::constants::{CONFIG_PATH, DEFAULT_PRIORITY, ENV_PATH};
use crate::domain::{QualityTier, TaskKind};
use dotenvy::from_filename;
use serde::Deserialize;
use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::fs;
use std::io;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Once;
use std::time::Duration;
use tracing::{debug, info, warn};

static ENV_LOADER: Once = Once::new();

/// Raw configuration structure for deserialization from TOML
#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub(super) struct RawConfig {
    #[serde(default)]
    pub server: RawServerSettings,
    #[serde(default)]
    pub routing: RawRouting,
    #[serde(default)]
    pub providers: Vec<RawProviderConfig>,
}

/// Ensures environment variables are loaded from config/.env
pub fn ensure_env_loaded() {
    ENV_LOADER.call_once(|| {
        let _ = from_filename(ENV_PATH);
    });
}

/// Load and validate configuration.
///
/// An explicit path must exist. Without one, `config/router.toml` is used when
/// present and the built-in defaults otherwise.
pub fn load_config(path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    ensure_env_loaded();
    match path {
        Some(path) => read_config(path),
        None => {
            let default_path = Path::new(CONFIG_PATH);
            if default_path.exists() {
                read_config(default_path)
            } else {
                info!(
                    path = CONFIG_PATH,
                    "No router configuration file found, using built-in providers"
                );
                builtin_config()
            }
        }
    }
}

/// Built-in provider set, with environment overrides applied.
pub fn builtin_config() -> Result<AppConfig, ConfigError> {
    parse_config(DEFAULT_ROUTER_TOML, Path::new("<built-in>"), &process_env)
}

fn read_config(path: &Path) -> Result<AppConfig, ConfigError> {
    debug!(path = %path.display(), "Reading router configuration file");

    let content = fs::read_to_string(path).map_err(|source| {
        if source.kind() == io::ErrorKind::NotFound {
            ConfigError::NotFound {
                path: path.to_path_buf(),
            }
        } else {
            ConfigError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;

    parse_config(&content, path, &process_env)
}

fn process_env(name: &str) -> Option<String> {
    std::env::var(name).ok()
}

/// Parse TOML text and validate it, resolving overrides through `env`.
pub fn parse_config(
    content: &str,
    path: &Path,
    env: &dyn Fn(&str) -> Option<String>,
) -> Result<AppConfig, ConfigError> {
    let parsed: RawConfig = toml::from_str(content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    validate_and_build(parsed, env)
}

fn validate_and_build(
    parsed: RawConfig,
    env: &dyn Fn(&str) -> Option<String>,
) -> Result<AppConfig, ConfigError> {
    if parsed.providers.is_empty() {
        return Err(ConfigError::NoProvidersConfigured);
    }

    let mut seen = HashSet::new();
    let mut providers = Vec::with_capacity(parsed.providers.len());
    for raw_provider in parsed.providers {
        let profile = build_profile(raw_provider, env)?;
        if !seen.insert(profile.id.clone()) {
            return Err(ConfigError::DuplicateProvider {
                provider: profile.id,
            });
        }
        providers.push(profile);
    }

    let routing = build_routing(parsed.routing, &seen, env)?;
    let server = build_server(parsed.server)?;

    Ok(AppConfig {
        server,
        routing,
        providers,
    })
}

/// `STUDIO_<ID>_<SUFFIX>` with the id upper-cased and dashes replaced.
pub fn override_var(provider_id: &str, suffix: &str) -> String {
    format!(
        "STUDIO_{}_{}",
        provider_id.to_uppercase().replace(['-', '.'], "_"),
        suffix
    )
}

fn env_secs(env: &dyn Fn(&str) -> Option<String>, name: &str) -> Option<u64> {
    let value = env(name)?;
    match value.trim().parse::<u64>() {
        Ok(secs) => Some(secs),
        Err(_) => {
            warn!(variable = name, value = %value, "Ignoring non-numeric timeout override");
            None
        }
    }
}

fn positive(secs: u64, field: impl Into<String>) -> Result<Duration, ConfigError> {
    if secs == 0 {
        return Err(ConfigError::NotPositive {
            field: field.into(),
        });
    }
    Ok(Duration::from_secs(secs))
}

fn build_profile(
    raw: RawProviderConfig,
    env: &dyn Fn(&str) -> Option<String>,
) -> Result<ProviderProfile, ConfigError> {
    let id = raw.id.trim().to_lowercase();

    let kind = if raw.provider_type.trim().is_empty() {
        ProviderKind::parse(&id)
    } else {
        ProviderKind::parse(&raw.provider_type)
    }
    .ok_or_else(|| ConfigError::UnknownProviderType {
        provider: id.clone(),
        provider_type: raw.provider_type.clone(),
    })?;

    let endpoint_override = env(&override_var(&id, "ENDPOINT"));
    if let Some(endpoint) = &endpoint_override {
        debug!(provider = %id, endpoint = %endpoint, "Endpoint overridden from environment");
    }
    let endpoint = endpoint_override
        .or(raw.endpoint)
        .filter(|value| !value.trim().is_empty())
        .ok_or_else(|| ConfigError::MissingEndpoint {
            provider: id.clone(),
        })?;
    let endpoint = shellexpand::env_with_context_no_errors(&endpoint, |var: &str| env(var))
        .trim_end_matches('/')
        .to_string();

    let mut capabilities = BTreeSet::new();
    for capability in &raw.capabilities {
        let kinds =
            expand_capability(capability).ok_or_else(|| ConfigError::UnknownCapability {
                provider: id.clone(),
                capability: capability.clone(),
            })?;
        capabilities.extend(kinds);
    }
    if capabilities.is_empty() {
        match kind {
            ProviderKind::Pollinations => {
                capabilities.insert(TaskKind::GenerateImage);
            }
            _ => capabilities.extend(TaskKind::text_kinds()),
        }
    }

    let cost_tier = match raw.cost_tier.as_deref() {
        None => CostTier::default(),
        Some(value) => CostTier::parse(value).ok_or_else(|| ConfigError::UnknownCostTier {
            provider: id.clone(),
            cost_tier: value.to_string(),
        })?,
    };

    let timeout_secs = env_secs(env, &override_var(&id, "TIMEOUT_SECS")).or(raw.timeout_secs);
    let timeout = timeout_secs
        .map(|secs| positive(secs, format!("providers.{id}.timeout_secs")))
        .transpose()?;

    let model = raw
        .model
        .map(|model| model.trim().to_string())
        .filter(|model| !model.is_empty())
        .unwrap_or_else(|| id.clone());

    Ok(ProviderProfile {
        kind,
        endpoint,
        api_key: raw.api_key.filter(|name| !name.trim().is_empty()),
        api_path: raw.api_path,
        image_path: raw.image_path,
        model,
        capabilities,
        priority: raw.priority.unwrap_or(DEFAULT_PRIORITY),
        cost_tier,
        timeout,
        system_prompt: raw.system_prompt,
        id,
    })
}

fn resolve_provider(
    scope: &str,
    entry: String,
    known: &HashSet<String>,
) -> Result<String, ConfigError> {
    let id = entry.trim().to_lowercase();
    if !known.contains(&id) {
        return Err(ConfigError::UnknownChainProvider {
            scope: scope.to_string(),
            provider: entry,
        });
    }
    Ok(id)
}

fn resolve_chain(
    scope: &str,
    chain: Vec<String>,
    known: &HashSet<String>,
) -> Result<Vec<String>, ConfigError> {
    let mut resolved: Vec<String> = Vec::with_capacity(chain.len());
    for entry in chain {
        let id = resolve_provider(scope, entry, known)?;
        if !resolved.contains(&id) {
            resolved.push(id);
        }
    }
    Ok(resolved)
}

fn build_routing(
    raw: RawRouting,
    known: &HashSet<String>,
    env: &dyn Fn(&str) -> Option<String>,
) -> Result<RoutingConfig, ConfigError> {
    let defaults = RoutingConfig::default();

    let deadline = match raw.deadline_secs {
        Some(secs) => positive(secs, "routing.deadline_secs")?,
        None => defaults.deadline,
    };
    let default_timeout = match env_secs(env, "STUDIO_TIMEOUT_SECS").or(raw.default_timeout_secs) {
        Some(secs) => positive(secs, "routing.default_timeout_secs")?,
        None => defaults.default_timeout,
    };

    let mut chains = BTreeMap::new();
    for (task, chain) in raw.chains {
        let kind =
            TaskKind::from_tool(&task).ok_or_else(|| ConfigError::UnknownChainTask {
                task: task.clone(),
            })?;
        chains.insert(kind, resolve_chain(kind.as_str(), chain, known)?);
    }

    let mut image_tiers = BTreeMap::new();
    for (tier, chain) in raw.image_tiers {
        let quality = QualityTier::parse(&tier)
            .ok_or_else(|| ConfigError::UnknownQualityTier { tier: tier.clone() })?;
        let scope = format!("image tier {}", quality.as_str());
        image_tiers.insert(quality, resolve_chain(&scope, chain, known)?);
    }

    let mut hints = BTreeMap::new();
    for (task, aliases) in raw.hints {
        let kind =
            TaskKind::from_tool(&task).ok_or_else(|| ConfigError::UnknownChainTask {
                task: task.clone(),
            })?;
        let scope = format!("hints for {}", kind.as_str());
        let mut resolved = BTreeMap::new();
        for (alias, target) in aliases {
            let target = resolve_provider(&scope, target, known)?;
            resolved.insert(alias.trim().to_lowercase(), target);
        }
        hints.insert(kind, resolved);
    }

    Ok(RoutingConfig {
        deadline,
        default_timeout,
        chains,
        image_tiers,
        hints,
    })
}

fn build_server(raw: RawServerSettings) -> Result<ServerSettings, ConfigError> {
    let bind = match raw.bind {
        Some(value) => value
            .trim()
            .parse::<SocketAddr>()
            .map_err(|_| ConfigError::InvalidBindAddress { value })?,
        None => default_bind(),
    };

    let defaults = RateLimitSettings::default();
    let requests = raw.rate_limit_requests.unwrap_or(defaults.requests);
    if requests == 0 {
        return Err(ConfigError::NotPositive {
            field: "server.rate_limit_requests".to_string(),
        });
    }
    let window = match raw.rate_limit_window_secs {
        Some(secs) => positive(secs, "server.rate_limit_window_secs")?,
        None => defaults.window,
    };

    Ok(ServerSettings {
        bind,
        allowed_origins: raw.allowed_origins.unwrap_or_else(default_allowed_origins),
        rate_limit: RateLimitSettings { requests, window },
    })
}
