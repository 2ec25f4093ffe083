//! Upstream call results and the provider error taxonomy

use futures::stream::BoxStream;
use reqwest::StatusCode;
use std::time::Duration;
use thiserror::Error;

/// Incremental text from one upstream provider. Ends after the last chunk or
/// after the first error.
pub type TextStream = BoxStream<'static, Result<String, ProviderError>>;

/// Raw content returned by one upstream provider.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderOutput {
    pub content: String,
    /// Model variant reported by the provider, when it exposes one.
    pub model: Option<String>,
}

impl ProviderOutput {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            model: None,
        }
    }

    pub fn with_model(mut self, model: Option<String>) -> Self {
        self.model = model.filter(|m| !m.trim().is_empty());
        self
    }
}

/// Failure of a single upstream attempt
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("provider '{provider}' requires an API key")]
    MissingApiKey { provider: String },
    #[error("provider '{provider}' did not answer within {after:?}")]
    Timeout { provider: String, after: Duration },
    #[error("network error calling provider '{provider}': {source}")]
    Network {
        provider: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("provider '{provider}' returned HTTP {status}: {body}")]
    Status {
        provider: String,
        status: StatusCode,
        body: String,
    },
    #[error("provider '{provider}' returned invalid response: {reason}")]
    InvalidResponse { provider: String, reason: String },
    #[error("provider '{provider}' cannot serve this request: {reason}")]
    Unsupported { provider: String, reason: String },
}

impl ProviderError {
    pub fn missing_api_key(provider: impl Into<String>) -> Self {
        Self::MissingApiKey {
            provider: provider.into(),
        }
    }

    pub fn timeout(provider: impl Into<String>, after: Duration) -> Self {
        Self::Timeout {
            provider: provider.into(),
            after,
        }
    }

    pub fn network(provider: impl Into<String>, source: reqwest::Error) -> Self {
        Self::Network {
            provider: provider.into(),
            source,
        }
    }

    pub fn status(provider: impl Into<String>, status: StatusCode, body: impl Into<String>) -> Self {
        Self::Status {
            provider: provider.into(),
            status,
            body: body.into(),
        }
    }

    pub fn invalid_response(provider: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidResponse {
            provider: provider.into(),
            reason: reason.into(),
        }
    }

    pub fn unsupported(provider: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Unsupported {
            provider: provider.into(),
            reason: reason.into(),
        }
    }

    pub fn provider(&self) -> &str {
        match self {
            ProviderError::MissingApiKey { provider }
            | ProviderError::Timeout { provider, .. }
            | ProviderError::Network { provider, .. }
            | ProviderError::Status { provider, .. }
            | ProviderError::InvalidResponse { provider, .. }
            | ProviderError::Unsupported { provider, .. } => provider,
        }
    }

    pub fn http_status(&self) -> Option<StatusCode> {
        match self {
            ProviderError::Status { status, .. } => Some(*status),
            ProviderError::Network { source, .. } => source.status(),
            _ => None,
        }
    }

    /// Whether the next provider in the chain should be tried.
    ///
    /// Only provider-side faults advance the chain. Every 4xx, throttling
    /// included, is final for the request.
    pub fn is_retryable(&self) -> bool {
        match self {
            ProviderError::MissingApiKey { .. }
            | ProviderError::Timeout { .. }
            | ProviderError::Network { .. }
            | ProviderError::InvalidResponse { .. } => match self.http_status() {
                Some(status) => status.is_server_error(),
                None => true,
            },
            ProviderError::Status { status, .. } => status.is_server_error(),
            ProviderError::Unsupported { .. } => false,
        }
    }

    pub fn is_timeout(&self) -> bool {
        match self {
            ProviderError::Timeout { .. } => true,
            ProviderError::Network { source, .. } => source.is_timeout(),
            ProviderError::Status { status, .. } => {
                *status == StatusCode::REQUEST_TIMEOUT || *status == StatusCode::GATEWAY_TIMEOUT
            }
            _ => false,
        }
    }

    /// Whether the upstream rejected the request content itself, as opposed to
    /// our credential or its own capacity (401, 403, 408, 429).
    pub fn is_client_rejection(&self) -> bool {
        self.http_status().is_some_and(|status| {
            status.is_client_error()
                && !matches!(
                    status,
                    StatusCode::UNAUTHORIZED
                        | StatusCode::FORBIDDEN
                        | StatusCode::REQUEST_TIMEOUT
                        | StatusCode::TOO_MANY_REQUESTS
                )
        })
    }

    /// Whether the upstream rejected our credential.
    pub fn is_auth_failure(&self) -> bool {
        matches!(
            self.http_status(),
            Some(StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN)
        )
    }
}
