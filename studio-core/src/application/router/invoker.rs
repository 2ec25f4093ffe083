//! Sequential fallback execution under one overall deadline.

use super::error::RouterError;
use super::normalizer;
use super::registry::{ProviderRegistry, RegisteredProvider};
use super::selector::RoutingDecision;
use crate::config::RoutingConfig;
use crate::domain::ProviderRequest;
use crate::infrastructure::model::{ProviderClient, ProviderError, ProviderOutput};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{Instant, timeout};
use tracing::{info, warn};

pub struct Invocation<'a> {
    pub provider: &'a RegisteredProvider,
    pub output: ProviderOutput,
    pub attempts: usize,
}

/// Look up a provider named by a routing decision, with its client.
pub(super) fn resolve<'a>(
    registry: &'a ProviderRegistry,
    id: &str,
) -> Result<(&'a RegisteredProvider, &'a Arc<dyn ProviderClient>), RouterError> {
    let Some(provider) = registry.get(id) else {
        return Err(RouterError::internal(format!(
            "routing decision references unregistered provider '{id}'"
        )));
    };
    let Some(client) = provider.client.as_ref() else {
        return Err(RouterError::internal(format!(
            "routing decision references unavailable provider '{id}'"
        )));
    };
    Ok((provider, client))
}

/// `min(provider timeout, time left before deadline)`, or `None` once the
/// deadline has passed.
pub(super) fn attempt_budget(
    provider: &RegisteredProvider,
    routing: &RoutingConfig,
    deadline: Instant,
) -> Option<Duration> {
    let remaining = deadline.saturating_duration_since(Instant::now());
    if remaining.is_zero() {
        return None;
    }
    Some(
        provider
            .profile
            .timeout
            .unwrap_or(routing.default_timeout)
            .min(remaining),
    )
}

/// Try each provider of `decision` in order, one at a time.
///
/// Every attempt is bounded by the provider's timeout (or the routing default)
/// and by what is left of `routing.deadline`, measured from the call.
pub async fn invoke<'a>(
    registry: &'a ProviderRegistry,
    decision: &RoutingDecision,
    request: &ProviderRequest,
    routing: &RoutingConfig,
) -> Result<Invocation<'a>, RouterError> {
    let deadline = Instant::now() + routing.deadline;
    let mut attempts = 0;
    let mut last: Option<ProviderError> = None;
    let mut deadline_exceeded = false;

    for id in &decision.chain {
        let (provider, client) = resolve(registry, id)?;
        let Some(budget) = attempt_budget(provider, routing, deadline) else {
            deadline_exceeded = true;
            break;
        };

        attempts += 1;
        let started = Instant::now();
        let result = match timeout(budget, client.complete(request)).await {
            Ok(result) => result.and_then(|output| normalizer::accept(client.id(), output)),
            Err(_) => Err(ProviderError::timeout(client.id(), budget)),
        };
        let elapsed_ms = started.elapsed().as_millis() as u64;

        match result {
            Ok(output) => {
                info!(
                    provider = id.as_str(),
                    attempt = attempts,
                    elapsed_ms,
                    "Provider attempt succeeded"
                );
                return Ok(Invocation {
                    provider,
                    output,
                    attempts,
                });
            }
            Err(err) if err.is_retryable() => {
                warn!(
                    provider = id.as_str(),
                    attempt = attempts,
                    elapsed_ms,
                    error = %err,
                    "Provider attempt failed, trying next provider"
                );
                last = Some(err);
            }
            Err(err) => {
                warn!(
                    provider = id.as_str(),
                    attempt = attempts,
                    elapsed_ms,
                    error = %err,
                    "Provider attempt failed permanently"
                );
                return Err(RouterError::from_final(err));
            }
        }
    }

    if deadline_exceeded {
        warn!(attempts, "Request deadline expired before the chain completed");
    }
    Err(RouterError::TransientUpstream {
        attempts,
        last,
        deadline_exceeded,
    })
}
