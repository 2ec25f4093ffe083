//! Content Studio routing core.
//!
//! - [`domain`] turns a caller's `(tool, payload)` pair into a validated [`Task`].
//! - [`application`] selects providers, runs the fallback chain and normalizes results.
//! - [`infrastructure`] holds the upstream HTTP clients and the REST server.
//! - [`config`] loads the immutable provider and routing configuration.

pub mod application;
pub mod config;
pub mod constants;
pub mod domain;
pub mod infrastructure;

pub use application::router::{ProviderRouter, RouterError, RoutingDecision};
pub use config::{AppConfig, ConfigError, ProviderProfile};
pub use domain::{NormalizedResult, Task, TaskKind, ValidationError};
pub use infrastructure::{model, server};
