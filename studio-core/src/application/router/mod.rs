//! Multi-provider request router.
//!
//! `Received → Validated → Routed → Invoking(provider_i) → Succeeded | Failed`.
//! Validation and permanent upstream rejections short-circuit; transient
//! failures advance to the next provider until the chain or the deadline runs
//! out.

pub mod error;
pub mod invoker;
pub mod normalizer;
pub mod registry;
pub mod selector;
pub mod streaming;

#[cfg(test)]
pub(crate) mod testing;

pub use error::RouterError;
pub use registry::{ProviderRegistry, RegisteredProvider};
pub use selector::RoutingDecision;
pub use streaming::{ChunkStream, StreamingReply};

use crate::config::{AppConfig, RoutingConfig};
use crate::domain::{NormalizedResult, Task, ValidationError, classify};
use serde_json::Value;
use tokio::time::Instant;
use tracing::{Instrument, debug, info, info_span, warn};
use uuid::Uuid;

/// Routes validated tasks to upstream providers. Immutable after construction
/// and shared across requests behind an `Arc`.
#[derive(Debug, Clone)]
pub struct ProviderRouter {
    registry: ProviderRegistry,
    routing: RoutingConfig,
}

impl ProviderRouter {
    pub fn new(registry: ProviderRegistry, routing: RoutingConfig) -> Self {
        Self { registry, routing }
    }

    /// Build clients for every configured provider.
    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(
            ProviderRegistry::from_profiles(&config.providers),
            config.routing.clone(),
        )
    }

    pub fn registry(&self) -> &ProviderRegistry {
        &self.registry
    }

    pub fn routing(&self) -> &RoutingConfig {
        &self.routing
    }

    pub fn decide(&self, task: &Task) -> Result<RoutingDecision, RouterError> {
        selector::select(task, &self.registry, &self.routing)
    }

    /// Validate a raw `(tool, payload)` pair and route it.
    pub async fn handle(&self, tool: &str, payload: &Value) -> Result<NormalizedResult, RouterError> {
        let request_id = Uuid::new_v4();
        let span = info_span!("request", request_id = %request_id, tool);
        async {
            let task = classify(tool, payload).inspect_err(|err| {
                debug!(error = %err, "Rejected invalid request");
            })?;
            self.route(&task).await
        }
        .instrument(span)
        .await
    }

    pub async fn route(&self, task: &Task) -> Result<NormalizedResult, RouterError> {
        let started = Instant::now();
        let decision = self.decide(task)?;
        info!(
            task = decision.task.as_str(),
            primary = decision.primary(),
            fallbacks = decision.fallbacks().len(),
            "Routing request"
        );

        let request = task.render();
        match invoker::invoke(&self.registry, &decision, &request, &self.routing).await {
            Ok(invocation) => {
                let result = normalizer::normalize(
                    decision.task,
                    invocation.provider,
                    invocation.output,
                    started.elapsed(),
                    invocation.attempts,
                );
                info!(
                    provider = result.provider.as_str(),
                    model = result.model_used.as_str(),
                    attempts = result.attempts,
                    latency_ms = result.latency.as_millis() as u64,
                    "Request completed"
                );
                Ok(result)
            }
            Err(err) => {
                warn!(
                    task = decision.task.as_str(),
                    attempts = err.attempts(),
                    error = %err,
                    "Request failed"
                );
                Err(err)
            }
        }
    }

    /// Validate and route a streamed request.
    ///
    /// Failures before the first chunk are returned here, with the same
    /// taxonomy as [`ProviderRouter::handle`]; later ones end the stream.
    pub async fn handle_stream(
        &self,
        tool: &str,
        payload: &Value,
    ) -> Result<StreamingReply, RouterError> {
        let request_id = Uuid::new_v4();
        let span = info_span!("stream", request_id = %request_id, tool);
        async {
            let task = classify(tool, payload).inspect_err(|err| {
                debug!(error = %err, "Rejected invalid request");
            })?;
            self.route_stream(&task).await
        }
        .instrument(span)
        .await
    }

    pub async fn route_stream(&self, task: &Task) -> Result<StreamingReply, RouterError> {
        let kind = task.kind();
        if !kind.supports_streaming() {
            return Err(ValidationError::NotStreamable {
                task: kind.as_str(),
            }
            .into());
        }
        let decision = self.decide(task)?;
        info!(
            task = decision.task.as_str(),
            primary = decision.primary(),
            fallbacks = decision.fallbacks().len(),
            "Routing streamed request"
        );

        let request = task.render();
        streaming::open(&self.registry, &decision, &request, &self.routing)
            .await
            .inspect_err(|err| {
                warn!(
                    task = decision.task.as_str(),
                    attempts = err.attempts(),
                    error = %err,
                    "Streamed request failed"
                );
            })
    }
}
