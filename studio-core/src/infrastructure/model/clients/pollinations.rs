//! Pollinations image client
//!
//! Pollinations renders on first GET of the image URL, so building the URL is
//! the whole call. No credential and no network round-trip.

use async_trait::async_trait;

use crate::config::ProviderProfile;
use crate::domain::{ImagePrompt, ProviderRequest};
use crate::infrastructure::model::traits::ProviderClient;
use crate::infrastructure::model::types::{ProviderError, ProviderOutput};

const DETAIL_SUFFIX: &str = "highly detailed, professional quality, sharp focus";

#[derive(Clone)]
pub struct PollinationsClient {
    id: String,
    endpoint: String,
    model: String,
}

impl PollinationsClient {
    pub fn from_profile(profile: &ProviderProfile) -> Self {
        Self {
            id: profile.id.clone(),
            endpoint: profile.endpoint.trim_end_matches('/').to_string(),
            model: profile.model.clone(),
        }
    }

    pub fn image_url(&self, prompt: &ImagePrompt) -> String {
        let description = if prompt.quality.is_premium() {
            format!("{}, {DETAIL_SUFFIX}", prompt.description)
        } else {
            prompt.description.clone()
        };
        format!(
            "{}/prompt/{}?width={}&height={}&nologo=true&enhance=true&model={}",
            self.endpoint,
            urlencoding::encode(&description),
            prompt.width,
            prompt.height,
            urlencoding::encode(&self.model),
        )
    }
}

#[async_trait]
impl ProviderClient for PollinationsClient {
    fn id(&self) -> &str {
        &self.id
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn complete(&self, request: &ProviderRequest) -> Result<ProviderOutput, ProviderError> {
        match request {
            ProviderRequest::Image(prompt) => Ok(ProviderOutput::new(self.image_url(prompt))),
            ProviderRequest::Text(_) => Err(ProviderError::unsupported(
                &self.id,
                "text generation is not available",
            )),
        }
    }
}
