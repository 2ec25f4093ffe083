// Configuration Loading Tests
//
// Router configuration files on disk, built-in defaults and environment
// overrides.

use serial_test::serial;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use studio_core::config::{CostTier, ProviderKind};
use studio_core::domain::QualityTier;
use studio_core::{AppConfig, ConfigError, TaskKind};
use tempfile::TempDir;

fn write_config(dir: &Path, content: &str) -> PathBuf {
    let path = dir.join("router.toml");
    fs::write(&path, content).expect("write config");
    path
}

const MINIMAL: &str = r#"
[[providers]]
id = "local"
type = "openai"
endpoint = "http://localhost:11434/"
model = "llama3"
"#;

#[test]
fn loads_minimal_file_with_defaults() {
    let dir = TempDir::new().expect("tempdir");
    let path = write_config(dir.path(), MINIMAL);

    let config = AppConfig::load(Some(&path)).expect("config");
    assert_eq!(config.providers.len(), 1);

    let local = config.provider("local").expect("local provider");
    assert_eq!(local.kind, ProviderKind::OpenAi);
    assert_eq!(local.endpoint, "http://localhost:11434");
    assert_eq!(local.cost_tier, CostTier::default());
    assert!(local.api_key.is_none());
    assert!(local.supports(TaskKind::Chat));
    assert!(!local.supports(TaskKind::GenerateImage));

    assert_eq!(config.routing.deadline, Duration::from_secs(90));
    assert_eq!(config.routing.default_timeout, Duration::from_secs(30));
    assert_eq!(config.server.bind.to_string(), "127.0.0.1:8000");
    assert_eq!(config.server.rate_limit.requests, 60);
}

#[test]
fn explicit_missing_path_is_an_error() {
    let dir = TempDir::new().expect("tempdir");
    let result = AppConfig::load(Some(&dir.path().join("absent.toml")));
    assert!(matches!(result, Err(ConfigError::NotFound { .. })));
}

#[test]
fn invalid_toml_reports_path() {
    let dir = TempDir::new().expect("tempdir");
    let path = write_config(dir.path(), "[[providers]\nid = ");
    match AppConfig::load(Some(&path)) {
        Err(ConfigError::Parse { path: reported, .. }) => assert_eq!(reported, path),
        other => panic!("expected parse error, got {other:?}"),
    }
}

#[test]
fn empty_provider_list_is_rejected() {
    let dir = TempDir::new().expect("tempdir");
    let path = write_config(dir.path(), "[routing]\ndeadline_secs = 10\n");
    assert!(matches!(
        AppConfig::load(Some(&path)),
        Err(ConfigError::NoProvidersConfigured)
    ));
}

#[test]
fn duplicate_ids_are_rejected_case_insensitively() {
    let dir = TempDir::new().expect("tempdir");
    let path = write_config(
        dir.path(),
        r#"
[[providers]]
id = "Gemini"
endpoint = "https://a.example"

[[providers]]
id = "gemini"
endpoint = "https://b.example"
"#,
    );
    match AppConfig::load(Some(&path)) {
        Err(ConfigError::DuplicateProvider { provider }) => assert_eq!(provider, "gemini"),
        other => panic!("expected duplicate error, got {other:?}"),
    }
}

#[test]
fn chains_must_name_known_providers() {
    let dir = TempDir::new().expect("tempdir");
    let path = write_config(
        dir.path(),
        &format!("{MINIMAL}\n[routing.chains]\nchat = [\"local\", \"missing\"]\n"),
    );
    assert!(matches!(
        AppConfig::load(Some(&path)),
        Err(ConfigError::UnknownChainProvider { .. })
    ));
}

#[test]
fn zero_timeouts_are_rejected() {
    let dir = TempDir::new().expect("tempdir");
    let path = write_config(
        dir.path(),
        &format!("[routing]\ndefault_timeout_secs = 0\n{MINIMAL}"),
    );
    assert!(matches!(
        AppConfig::load(Some(&path)),
        Err(ConfigError::NotPositive { .. })
    ));
}

#[test]
fn full_file_round_trips_routing_tables() {
    let dir = TempDir::new().expect("tempdir");
    let path = write_config(
        dir.path(),
        r#"
[server]
bind = "0.0.0.0:9100"
allowed_origins = ["https://studio.example"]
rate_limit_requests = 5
rate_limit_window_secs = 10

[routing]
deadline_secs = 40
default_timeout_secs = 12

[routing.chains]
summarize = ["grok", "gemini"]

[routing.image_tiers]
ultra = ["art", "gemini"]

[[providers]]
id = "gemini"
type = "gemini"
endpoint = "https://generativelanguage.googleapis.com"
api_key = "GEMINI_API_KEY"
capabilities = ["text", "generate-image"]
priority = 1
cost_tier = "free-tier"

[[providers]]
id = "grok"
type = "xai"
endpoint = "https://api.x.ai"
api_key = "GROK_API_KEY"
capabilities = ["summarize", "chat"]
priority = 2
cost_tier = "paid"
timeout_secs = 20

[[providers]]
id = "art"
type = "pollinations"
endpoint = "https://image.pollinations.ai"
"#,
    );

    let config = AppConfig::load(Some(&path)).expect("config");
    assert_eq!(config.server.bind.to_string(), "0.0.0.0:9100");
    assert_eq!(config.server.allowed_origins, vec!["https://studio.example"]);
    assert_eq!(config.server.rate_limit.requests, 5);
    assert_eq!(config.server.rate_limit.window, Duration::from_secs(10));
    assert_eq!(config.routing.deadline, Duration::from_secs(40));
    assert_eq!(config.routing.default_timeout, Duration::from_secs(12));
    assert_eq!(
        config.routing.chain_for(TaskKind::Summarize),
        Some(&["grok".to_string(), "gemini".to_string()][..])
    );
    assert_eq!(
        config.routing.tier_chain(QualityTier::Ultra),
        Some(&["art".to_string(), "gemini".to_string()][..])
    );

    let grok = config.provider("grok").expect("grok");
    assert_eq!(grok.kind, ProviderKind::OpenAi);
    assert_eq!(grok.timeout, Some(Duration::from_secs(20)));
    assert!(grok.supports(TaskKind::Chat));
    assert!(!grok.supports(TaskKind::GenerateIdeas));

    let art = config.provider("art").expect("art");
    assert!(art.supports(TaskKind::GenerateImage));
    assert!(!art.supports(TaskKind::Chat));

    let image_capable: Vec<&str> = config
        .capable_of(TaskKind::GenerateImage)
        .map(|profile| profile.id.as_str())
        .collect();
    assert_eq!(image_capable, vec!["gemini", "art"]);
}

#[test]
#[serial]
fn builtin_catalog_covers_every_task() {
    let config = AppConfig::builtin().expect("builtin");
    for task in TaskKind::ALL {
        assert!(
            config.capable_of(task).next().is_some(),
            "no built-in provider for {task}"
        );
    }
    assert!(config.provider("pollinations").is_some());
    assert_eq!(
        config
            .routing
            .tier_chain(QualityTier::Ultra)
            .map(|chain| chain.len()),
        Some(3)
    );
}

#[test]
#[serial]
fn environment_overrides_endpoint_and_timeouts() {
    let dir = TempDir::new().expect("tempdir");
    let path = write_config(
        dir.path(),
        r#"
[[providers]]
id = "grok-image"
type = "openai"
endpoint = "${STUDIO_TEST_HOST}/base/"
timeout_secs = 60
"#,
    );

    unsafe {
        env::set_var("STUDIO_TEST_HOST", "http://mirror.internal");
        env::set_var("STUDIO_GROK_IMAGE_TIMEOUT_SECS", "15");
        env::set_var("STUDIO_TIMEOUT_SECS", "7");
    }
    let config = AppConfig::load(Some(&path));
    unsafe {
        env::remove_var("STUDIO_TEST_HOST");
        env::remove_var("STUDIO_GROK_IMAGE_TIMEOUT_SECS");
        env::remove_var("STUDIO_TIMEOUT_SECS");
    }

    let config = config.expect("config");
    let profile = config.provider("grok-image").expect("provider");
    assert_eq!(profile.endpoint, "http://mirror.internal/base");
    assert_eq!(profile.timeout, Some(Duration::from_secs(15)));
    assert_eq!(config.routing.default_timeout, Duration::from_secs(7));
}

#[test]
#[serial]
fn endpoint_variable_replaces_configured_endpoint() {
    let dir = TempDir::new().expect("tempdir");
    let path = write_config(dir.path(), MINIMAL);

    unsafe {
        env::set_var("STUDIO_LOCAL_ENDPOINT", "http://10.0.0.5:8080/");
    }
    let config = AppConfig::load(Some(&path));
    unsafe {
        env::remove_var("STUDIO_LOCAL_ENDPOINT");
    }

    let config = config.expect("config");
    assert_eq!(
        config.provider("local").map(|p| p.endpoint.as_str()),
        Some("http://10.0.0.5:8080")
    );
}
