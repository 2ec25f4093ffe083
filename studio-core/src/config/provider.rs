//! # Provider Configuration
//!
//! Static profile of one upstream AI provider, loaded at start-up and read-only afterwards.
//!
//! | Type | API format | API Key Required |
//! |------|------------|------------------|
//! | `gemini` | Gemini `generateContent` / Imagen `predict` | Yes |
//! | `openai` | OpenAI-compatible chat and image APIs (Grok, Groq, Mistral) | Yes |
//! | `pollinations` | Keyless image URL service | No |

use crate::domain::TaskKind;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProviderKind {
    #[serde(rename = "gemini")]
    Gemini,
    #[serde(rename = "openai")]
    OpenAi,
    #[serde(rename = "pollinations")]
    Pollinations,
}

impl ProviderKind {
    /// Infer the API format from a provider type string.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "gemini" | "google" | "google-ai" => Some(ProviderKind::Gemini),
            "openai" | "grok" | "xai" | "groq" | "mistral" => Some(ProviderKind::OpenAi),
            "pollinations" => Some(ProviderKind::Pollinations),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::Gemini => "gemini",
            ProviderKind::OpenAi => "openai",
            ProviderKind::Pollinations => "pollinations",
        }
    }

    pub fn requires_api_key(&self) -> bool {
        !matches!(self, ProviderKind::Pollinations)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CostTier {
    #[default]
    Free,
    FreeTier,
    Paid,
}

impl CostTier {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "free" => Some(CostTier::Free),
            "free-tier" | "free_tier" => Some(CostTier::FreeTier),
            "paid" => Some(CostTier::Paid),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CostTier::Free => "free",
            CostTier::FreeTier => "free-tier",
            CostTier::Paid => "paid",
        }
    }
}

/// Configuration for one upstream provider.
///
/// # Example
///
/// ```toml
/// [[providers]]
/// id = "gemini"
/// type = "gemini"
/// endpoint = "https://generativelanguage.googleapis.com"
/// api_key = "GEMINI_API_KEY"
/// model = "gemini-2.5-flash"
/// capabilities = ["text"]
/// priority = 10
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderProfile {
    pub id: String,
    pub kind: ProviderKind,
    pub endpoint: String,
    /// Name of the environment variable holding the credential, never the credential itself.
    pub api_key: Option<String>,
    pub api_path: Option<String>,
    pub image_path: Option<String>,
    pub model: String,
    pub capabilities: BTreeSet<TaskKind>,
    /// Lower runs first when no explicit chain orders the providers.
    pub priority: u32,
    pub cost_tier: CostTier,
    pub timeout: Option<Duration>,
    pub system_prompt: Option<String>,
}

impl ProviderProfile {
    pub fn supports(&self, task: TaskKind) -> bool {
        self.capabilities.contains(&task)
    }

    /// Whether the provider is unusable without a resolved credential.
    ///
    /// A named `api_key` variable is always required. OpenAI-compatible
    /// profiles without one are treated as keyless local servers.
    pub fn requires_credential(&self) -> bool {
        self.api_key.is_some() || self.kind == ProviderKind::Gemini
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub(super) struct RawProviderConfig {
    pub(super) id: String,
    #[serde(rename = "type", default)]
    pub(super) provider_type: String,
    pub(super) endpoint: Option<String>,
    pub(super) api_key: Option<String>,
    #[serde(default)]
    pub(super) api_path: Option<String>,
    #[serde(default)]
    pub(super) image_path: Option<String>,
    #[serde(default)]
    pub(super) model: Option<String>,
    #[serde(default)]
    pub(super) capabilities: Vec<String>,
    #[serde(default)]
    pub(super) priority: Option<u32>,
    #[serde(default)]
    pub(super) cost_tier: Option<String>,
    #[serde(default)]
    pub(super) timeout_secs: Option<u64>,
    #[serde(default)]
    pub(super) system_prompt: Option<String>,
}

/// Expand a capability entry: `text`, `image`, or a single task name.
pub(super) fn expand_capability(raw: &str) -> Option<Vec<TaskKind>> {
    match raw.trim().to_lowercase().as_str() {
        "text" => Some(TaskKind::text_kinds().collect()),
        "image" => Some(vec![TaskKind::GenerateImage]),
        other => TaskKind::parse(other).map(|kind| vec![kind]),
    }
}
