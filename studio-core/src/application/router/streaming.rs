//! Streamed completions over the same chain and deadline as [`super::invoker`].
//!
//! Fallback is only possible before the first chunk. Once text has been
//! handed to the caller the provider is committed, and a later failure ends
//! the stream with an error item.

use super::error::RouterError;
use super::invoker::{attempt_budget, resolve};
use super::normalizer;
use super::registry::ProviderRegistry;
use super::selector::RoutingDecision;
use crate::config::RoutingConfig;
use crate::domain::{ProviderRequest, TaskKind};
use crate::infrastructure::model::{ProviderClient, ProviderError, TextStream};
use futures::StreamExt;
use futures::stream::{self, BoxStream};
use std::fmt;
use tokio::time::{Instant, timeout, timeout_at};
use tracing::{info, warn};

/// Text chunks of a committed reply. The last item is an error when the
/// stream broke off.
pub type ChunkStream = BoxStream<'static, Result<String, RouterError>>;

pub struct StreamingReply {
    pub task: TaskKind,
    pub provider: String,
    pub model_used: String,
    pub attempts: usize,
    /// Starts with the chunk that committed the provider.
    pub chunks: ChunkStream,
}

impl StreamingReply {
    pub fn used_fallback(&self) -> bool {
        self.attempts > 1
    }

    /// Drain the stream into one string, stopping at the first error.
    pub async fn collect_text(self) -> Result<String, RouterError> {
        let mut chunks = self.chunks;
        let mut text = String::new();
        while let Some(chunk) = chunks.next().await {
            text.push_str(&chunk?);
        }
        Ok(text)
    }
}

impl fmt::Debug for StreamingReply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StreamingReply")
            .field("task", &self.task)
            .field("provider", &self.provider)
            .field("model_used", &self.model_used)
            .field("attempts", &self.attempts)
            .finish_non_exhaustive()
    }
}

/// Walk `decision` until one provider produces a first chunk.
///
/// Opening a stream and receiving its first chunk share one attempt budget.
/// The rest of the stream is bounded by the overall deadline only.
pub async fn open(
    registry: &ProviderRegistry,
    decision: &RoutingDecision,
    request: &ProviderRequest,
    routing: &RoutingConfig,
) -> Result<StreamingReply, RouterError> {
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
        let result = match timeout(budget, first_chunk(client.as_ref(), request)).await {
            Ok(result) => result,
            Err(_) => Err(ProviderError::timeout(client.id(), budget)),
        };
        let elapsed_ms = started.elapsed().as_millis() as u64;

        match result {
            Ok((first, rest)) => {
                info!(
                    provider = id.as_str(),
                    attempt = attempts,
                    elapsed_ms,
                    "Provider stream committed"
                );
                return Ok(StreamingReply {
                    task: decision.task,
                    provider: id.clone(),
                    model_used: normalizer::model_used(provider, None),
                    attempts,
                    chunks: commit(first, rest, id.clone(), deadline, attempts),
                });
            }
            Err(err) if err.is_retryable() => {
                warn!(
                    provider = id.as_str(),
                    attempt = attempts,
                    elapsed_ms,
                    error = %err,
                    "Provider stream failed before first chunk, trying next provider"
                );
                last = Some(err);
            }
            Err(err) => {
                warn!(
                    provider = id.as_str(),
                    attempt = attempts,
                    elapsed_ms,
                    error = %err,
                    "Provider stream failed permanently"
                );
                return Err(RouterError::from_final(err));
            }
        }
    }

    if deadline_exceeded {
        warn!(attempts, "Request deadline expired before any provider streamed");
    }
    Err(RouterError::TransientUpstream {
        attempts,
        last,
        deadline_exceeded,
    })
}

async fn first_chunk(
    client: &dyn ProviderClient,
    request: &ProviderRequest,
) -> Result<(String, TextStream), ProviderError> {
    let mut stream = client.stream(request).await?;
    match stream.next().await {
        Some(Ok(chunk)) => Ok((chunk, stream)),
        Some(Err(err)) => Err(err),
        None => Err(ProviderError::invalid_response(
            client.id(),
            "stream ended before any content",
        )),
    }
}

fn commit(
    first: String,
    rest: TextStream,
    provider: String,
    deadline: Instant,
    attempts: usize,
) -> ChunkStream {
    let rest = stream::unfold(Some(rest), move |rest| {
        let provider = provider.clone();
        async move {
            let mut rest = rest?;
            let failure = match timeout_at(deadline, rest.next()).await {
                Ok(Some(Ok(chunk))) => return Some((Ok(chunk), Some(rest))),
                Ok(None) => return None,
                Ok(Some(Err(err))) => RouterError::TransientUpstream {
                    attempts,
                    last: Some(err),
                    deadline_exceeded: false,
                },
                Err(_) => RouterError::TransientUpstream {
                    attempts,
                    last: None,
                    deadline_exceeded: true,
                },
            };
            warn!(
                provider = provider.as_str(),
                error = %failure,
                "Provider stream interrupted after first chunk"
            );
            Some((Err(failure), None))
        }
    });
    Box::pin(stream::once(async move { Ok(first) }).chain(rest))
}
