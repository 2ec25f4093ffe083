//! Provider factory - creates clients from profiles

use super::clients::{GeminiClient, OpenAiCompatibleClient, PollinationsClient};
use super::traits::ProviderClient;
use crate::config::{ProviderKind, ProviderProfile};
use std::env;
use std::sync::Arc;
use tracing::warn;

/// Resolve API key from environment variable
pub fn resolve_api_key(provider: &str, spec: Option<&str>) -> Option<String> {
    let raw = spec.map(str::trim)?;
    if raw.is_empty() {
        return None;
    }
    match env::var(raw) {
        Ok(value) if !value.trim().is_empty() => Some(value),
        Ok(_) => {
            warn!(provider, env_var = raw, "API key environment variable is empty");
            None
        }
        Err(err) => {
            warn!(
                provider,
                env_var = raw,
                %err,
                "API key environment variable is not set"
            );
            None
        }
    }
}

/// Factory for creating provider clients from profiles.
pub struct ProviderFactory;

impl ProviderFactory {
    /// Create a client, or `None` when a required credential is missing.
    pub fn create(profile: &ProviderProfile) -> Option<Arc<dyn ProviderClient>> {
        let api_key = resolve_api_key(&profile.id, profile.api_key.as_deref());
        if profile.requires_credential() && api_key.is_none() {
            return None;
        }
        Some(Self::with_api_key(profile, api_key))
    }

    /// Create a client with an explicit credential.
    ///
    /// Supported types:
    /// - `gemini` → Gemini `generateContent` / `predict`
    /// - `openai` → OpenAI-compatible chat completions and images
    /// - `pollinations` → keyless image URL builder
    pub fn with_api_key(
        profile: &ProviderProfile,
        api_key: Option<String>,
    ) -> Arc<dyn ProviderClient> {
        match profile.kind {
            ProviderKind::Gemini => Arc::new(GeminiClient::from_profile(profile, api_key)),
            ProviderKind::OpenAi => Arc::new(OpenAiCompatibleClient::from_profile(profile, api_key)),
            ProviderKind::Pollinations => Arc::new(PollinationsClient::from_profile(profile)),
        }
    }
}
