//! Provider selection.
//!
//! Deterministic: the same task and hint against the same registry always
//! produce the same chain.

use super::error::RouterError;
use super::registry::ProviderRegistry;
use crate::config::RoutingConfig;
use crate::domain::{Task, TaskKind};
use tracing::{debug, warn};

/// Primary provider plus ordered fallbacks for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutingDecision {
    pub task: TaskKind,
    /// Never empty, never repeats a provider.
    pub chain: Vec<String>,
}

impl RoutingDecision {
    pub fn primary(&self) -> &str {
        &self.chain[0]
    }

    pub fn fallbacks(&self) -> &[String] {
        &self.chain[1..]
    }
}

/// Where the ordering for a task came from, for logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OrderSource {
    QualityTier,
    TaskChain,
    Priority,
}

pub fn select(
    task: &Task,
    registry: &ProviderRegistry,
    routing: &RoutingConfig,
) -> Result<RoutingDecision, RouterError> {
    let kind = task.kind();
    let mut chain: Vec<String> = Vec::new();

    if let Some(requested) = task.provider_hint.as_deref() {
        let hint = routing.resolve_hint(kind, requested);
        if hint != requested {
            debug!(requested, provider = hint, task = kind.as_str(), "Provider hint aliased");
        }
        if registry.can_serve(hint, kind) {
            chain.push(hint.to_string());
        } else {
            warn!(
                hint,
                task = kind.as_str(),
                "Provider hint is unknown, unavailable or cannot serve the task; using default selection"
            );
        }
    }

    let (source, configured) = configured_order(task, routing);
    let mut usable: Vec<String> = configured
        .iter()
        .filter(|id| registry.can_serve(id, kind))
        .cloned()
        .collect();
    let source = if usable.is_empty() {
        if source != OrderSource::Priority {
            debug!(
                task = kind.as_str(),
                "Configured chain has no usable provider; ordering by priority"
            );
        }
        usable = by_priority(registry, kind);
        OrderSource::Priority
    } else {
        source
    };

    for id in usable {
        if !chain.contains(&id) {
            chain.push(id);
        }
    }

    if chain.is_empty() {
        return Err(RouterError::UnsupportedTask { task: kind });
    }

    debug!(
        task = kind.as_str(),
        order = ?source,
        chain = ?chain,
        "Routing decision made"
    );
    Ok(RoutingDecision { task: kind, chain })
}

fn configured_order<'a>(task: &Task, routing: &'a RoutingConfig) -> (OrderSource, &'a [String]) {
    if let Some(chain) = task.quality().and_then(|tier| routing.tier_chain(tier)) {
        return (OrderSource::QualityTier, chain);
    }
    match routing.chain_for(task.kind()) {
        Some(chain) => (OrderSource::TaskChain, chain),
        None => (OrderSource::Priority, &[]),
    }
}

fn by_priority(registry: &ProviderRegistry, kind: TaskKind) -> Vec<String> {
    let mut capable: Vec<_> = registry
        .iter()
        .filter(|provider| provider.is_available() && provider.profile.supports(kind))
        .map(|provider| (provider.profile.priority, provider.id().to_string()))
        .collect();
    capable.sort();
    capable.into_iter().map(|(_, id)| id).collect()
}
