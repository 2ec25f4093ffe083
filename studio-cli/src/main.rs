//! Content Studio router binary
//!
//! Loads the router configuration, builds provider clients and serves the REST API.

use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use studio_core::server::{self, ServerError};
use studio_core::{AppConfig, ConfigError, ProviderRouter};
use thiserror::Error;
use tracing::{debug, error, info};
use tracing_subscriber::{EnvFilter, fmt};

#[derive(Parser, Debug)]
#[command(
    name = "studio",
    version,
    about = "Multi-provider AI request router for Content Studio"
)]
struct Cli {
    /// Configuration file path (defaults to config/router.toml, then built-in providers)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// REST API bind address (overrides [server].bind)
    #[arg(long)]
    bind: Option<SocketAddr>,

    /// Validate the configuration, print the provider catalog and exit
    #[arg(long)]
    check: bool,
}

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Server(#[from] ServerError),
}

#[tokio::main]
async fn main() {
    init_tracing();
    if let Err(err) = run(Cli::parse()).await {
        error!(error = %err, "Router exited with an error");
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    info!("Starting Content Studio router");
    debug!(config = ?cli.config, bind = ?cli.bind, check = cli.check, "CLI arguments parsed");

    let mut config = AppConfig::load(cli.config.as_deref())?;
    if let Some(bind) = cli.bind {
        config.server.bind = bind;
    }
    info!(
        providers = config.providers.len(),
        deadline_secs = config.routing.deadline.as_secs(),
        default_timeout_secs = config.routing.default_timeout.as_secs(),
        "Configuration loaded"
    );

    let router = Arc::new(ProviderRouter::from_config(&config));

    if cli.check {
        print_catalog(&router);
        return Ok(());
    }

    server::serve(router, &config.server).await?;
    info!("Router stopped");
    Ok(())
}

fn print_catalog(router: &ProviderRouter) {
    println!(
        "{:<16} {:<13} {:<26} {:>8}  {:<10} {:<10} capabilities",
        "id", "type", "model", "priority", "cost", "status"
    );
    for provider in router.registry().iter() {
        let profile = &provider.profile;
        let capabilities: Vec<&str> = profile.capabilities.iter().map(|kind| kind.as_str()).collect();
        println!(
            "{:<16} {:<13} {:<26} {:>8}  {:<10} {:<10} {}",
            profile.id,
            profile.kind.as_str(),
            profile.model,
            profile.priority,
            profile.cost_tier.as_str(),
            if provider.is_available() { "ready" } else { "no-key" },
            capabilities.join(", ")
        );
    }
}

fn init_tracing() {
    static INIT: std::sync::Once = std::sync::Once::new();
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_level(true)
            .init();
    });
}
