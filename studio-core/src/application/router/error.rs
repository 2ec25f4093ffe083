use crate::domain::{TaskKind, ValidationError};
use crate::infrastructure::model::ProviderError;
use thiserror::Error;

/// Terminal failure of one routed request.
#[derive(Debug, Error)]
pub enum RouterError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("no available provider supports task '{task}'")]
    UnsupportedTask { task: TaskKind },

    #[error("{}", transient_summary(.attempts, .last, .deadline_exceeded))]
    TransientUpstream {
        attempts: usize,
        last: Option<ProviderError>,
        deadline_exceeded: bool,
    },

    #[error("provider rejected the request: {source}")]
    PermanentUpstream {
        #[source]
        source: ProviderError,
    },

    #[error("internal router error: {reason}")]
    Internal { reason: String },
}

fn transient_summary(
    attempts: &usize,
    last: &Option<ProviderError>,
    deadline_exceeded: &bool,
) -> String {
    let mut summary = format!("all {attempts} provider attempt(s) failed");
    if *deadline_exceeded {
        summary.push_str(" before the request deadline expired");
    }
    if let Some(last) = last {
        summary.push_str(&format!("; last error: {last}"));
    }
    summary
}

impl RouterError {
    pub fn internal(reason: impl Into<String>) -> Self {
        Self::Internal {
            reason: reason.into(),
        }
    }

    /// Map a non-retryable provider failure onto the taxonomy.
    pub(super) fn from_final(error: ProviderError) -> Self {
        match error {
            ProviderError::Unsupported { provider, reason } => Self::Internal {
                reason: format!("provider '{provider}' was selected for a request it cannot serve: {reason}"),
            },
            source => Self::PermanentUpstream { source },
        }
    }

    /// Whether the chain ended because time ran out.
    pub fn is_timeout(&self) -> bool {
        match self {
            RouterError::TransientUpstream {
                last,
                deadline_exceeded,
                ..
            } => *deadline_exceeded || last.as_ref().is_some_and(ProviderError::is_timeout),
            _ => false,
        }
    }

    /// Permanent rejection caused by our own credential rather than the input.
    pub fn is_credential_problem(&self) -> bool {
        matches!(self, RouterError::PermanentUpstream { source } if source.is_auth_failure())
    }

    /// Permanent rejection of the request content itself, the caller's fault.
    pub fn is_rejected_input(&self) -> bool {
        matches!(self, RouterError::PermanentUpstream { source } if source.is_client_rejection())
    }

    pub fn attempts(&self) -> usize {
        match self {
            RouterError::TransientUpstream { attempts, .. } => *attempts,
            RouterError::PermanentUpstream { .. } => 1,
            _ => 0,
        }
    }

    /// Caller-safe message. Provider names and upstream bodies stay in logs.
    pub fn user_message(&self) -> String {
        match self {
            RouterError::Validation(err) => err.user_message(),
            RouterError::UnsupportedTask { task } => {
                format!("No AI provider is currently available for '{task}'. Please try again later.")
            }
            RouterError::TransientUpstream { .. } if self.is_timeout() => {
                "The AI service took too long to respond. Please try again.".to_string()
            }
            RouterError::TransientUpstream { .. } => {
                "The AI service is temporarily unavailable. Please try again later.".to_string()
            }
            RouterError::PermanentUpstream { .. } if self.is_credential_problem() => {
                "The AI service is not configured correctly. Please contact support.".to_string()
            }
            RouterError::PermanentUpstream { .. } if self.is_rejected_input() => {
                "The AI service could not process this request. Please revise your input and try again."
                    .to_string()
            }
            RouterError::PermanentUpstream { .. } => {
                "The AI service is temporarily unavailable. Please try again later.".to_string()
            }
            RouterError::Internal { .. } => {
                "An unexpected error occurred while processing your request.".to_string()
            }
        }
    }
}
