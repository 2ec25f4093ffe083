use crate::application::router::RegisteredProvider;
use crate::domain::NormalizedResult;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TaskResponse {
    /// Generated text, or an image URL for image tasks
    pub output: String,
    /// Provider that served the request, after any fallback
    pub provider: String,
    pub model_used: String,
    pub latency_ms: u64,
    /// Upstream attempts, including the successful one
    pub attempts: usize,
}

impl From<NormalizedResult> for TaskResponse {
    fn from(result: NormalizedResult) -> Self {
        Self {
            latency_ms: result.latency.as_millis() as u64,
            output: result.output,
            provider: result.provider,
            model_used: result.model_used,
            attempts: result.attempts,
        }
    }
}

/// One `data:` frame of a streamed task response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StreamFrame {
    Chunk {
        chunk: String,
    },
    Done {
        done: bool,
        provider: String,
        model_used: String,
        attempts: usize,
    },
    Error {
        error: String,
    },
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ProviderSummary {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub model: String,
    pub capabilities: Vec<String>,
    pub priority: u32,
    pub cost_tier: String,
    /// False when the provider's credential is not configured
    pub available: bool,
}

impl From<&RegisteredProvider> for ProviderSummary {
    fn from(provider: &RegisteredProvider) -> Self {
        let profile = &provider.profile;
        Self {
            id: profile.id.clone(),
            kind: profile.kind.as_str().to_string(),
            model: profile.model.clone(),
            capabilities: profile
                .capabilities
                .iter()
                .map(|kind| kind.as_str().to_string())
                .collect(),
            priority: profile.priority,
            cost_tier: profile.cost_tier.as_str().to_string(),
            available: provider.is_available(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ProviderListResponse {
    pub providers: Vec<ProviderSummary>,
}

// Request bodies are validated from raw JSON by the classifier; these types
// only document the accepted shapes.

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SummarizeRequest {
    pub text: String,
    pub provider: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct GenerateIdeasRequest {
    pub topic: String,
    pub provider: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RefineContentRequest {
    pub text: String,
    pub instruction: Option<String>,
    pub provider: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ChatRequest {
    pub message: String,
    /// friendly | professional | playful | expert
    pub tone: Option<String>,
    /// Clamped into [0, 1]
    pub creativity: Option<f64>,
    pub provider: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct GenerateImageRequest {
    pub prompt: String,
    pub style: Option<String>,
    /// square | portrait | landscape
    pub aspect_ratio: Option<String>,
    /// fast | balanced | high | ultra
    pub quality: Option<String>,
    pub provider: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct GamedevRequest {
    pub prompt: String,
    pub provider: Option<String>,
}
