//! Maps provider output onto the caller-facing result shape.

use super::registry::RegisteredProvider;
use crate::domain::{NormalizedResult, TaskKind};
use crate::infrastructure::model::{ProviderError, ProviderOutput};
use std::time::Duration;

/// Reject outputs that carry no content. Counted as an invalid response so the
/// chain moves on.
pub fn accept(provider: &str, output: ProviderOutput) -> Result<ProviderOutput, ProviderError> {
    let content = output.content.trim();
    if content.is_empty() {
        return Err(ProviderError::invalid_response(provider, "empty output"));
    }
    Ok(ProviderOutput {
        content: content.to_string(),
        model: output.model,
    })
}

pub fn normalize(
    task: TaskKind,
    provider: &RegisteredProvider,
    output: ProviderOutput,
    latency: Duration,
    attempts: usize,
) -> NormalizedResult {
    NormalizedResult {
        model_used: model_used(provider, output.model),
        output: output.content,
        provider: provider.id().to_string(),
        task,
        latency,
        attempts,
    }
}

/// Prefers what the provider reported, then the model the client was built
/// for, then the provider id.
pub fn model_used(provider: &RegisteredProvider, reported: Option<String>) -> String {
    reported
        .filter(|model| !model.trim().is_empty())
        .or_else(|| Some(configured_model(provider).to_string()).filter(|m| !m.trim().is_empty()))
        .unwrap_or_else(|| provider.id().to_string())
}

fn configured_model(provider: &RegisteredProvider) -> &str {
    match provider.client.as_deref() {
        Some(client) => client.model(),
        None => &provider.profile.model,
    }
}
