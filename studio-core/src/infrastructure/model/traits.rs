//! Model traits

use super::types::{ProviderError, ProviderOutput, TextStream};
use crate::domain::ProviderRequest;
use async_trait::async_trait;
use futures::stream;

/// One upstream AI provider, already bound to its profile and credential.
#[async_trait]
pub trait ProviderClient: Send + Sync {
    /// Get the provider ID
    fn id(&self) -> &str;

    /// Configured model, used when the upstream does not report one
    fn model(&self) -> &str;

    /// Perform a single upstream call. Time bounds are applied by the caller.
    async fn complete(&self, request: &ProviderRequest) -> Result<ProviderOutput, ProviderError>;

    /// Open a streamed completion.
    ///
    /// Providers without native streaming yield the whole completion as a
    /// single chunk.
    async fn stream(&self, request: &ProviderRequest) -> Result<TextStream, ProviderError> {
        let output = self.complete(request).await?;
        Ok(Box::pin(stream::once(async move { Ok(output.content) })))
    }
}
