//! OpenAI-compatible client implementation

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::base::{HttpClientBase, SseChunk, as_image_url};
use crate::config::ProviderProfile;
use crate::constants::{DEFAULT_OPENAI_CHAT_PATH, DEFAULT_OPENAI_IMAGE_PATH};
use crate::domain::{ImagePrompt, ProviderRequest, TextPrompt};
use crate::infrastructure::model::traits::ProviderClient;
use crate::infrastructure::model::types::{ProviderError, ProviderOutput, TextStream};

const PREMIUM_IMAGE_SUFFIX: &str = "ultra high quality, photorealistic, 8k, professional";

/// OpenAI-compatible client (works with xAI Grok, Groq, Mistral, local servers, etc.)
#[derive(Clone)]
pub struct OpenAiCompatibleClient {
    base: HttpClientBase,
    api_path: String,
    image_path: String,
    model: String,
    system_prompt: Option<String>,
}

impl OpenAiCompatibleClient {
    pub fn from_profile(profile: &ProviderProfile, api_key: Option<String>) -> Self {
        Self {
            base: HttpClientBase::new(profile.id.clone(), profile.endpoint.clone(), api_key),
            api_path: profile
                .api_path
                .clone()
                .unwrap_or_else(|| DEFAULT_OPENAI_CHAT_PATH.to_string()),
            image_path: profile
                .image_path
                .clone()
                .unwrap_or_else(|| DEFAULT_OPENAI_IMAGE_PATH.to_string()),
            model: profile.model.clone(),
            system_prompt: profile.system_prompt.clone(),
        }
    }

    fn chat_request<'a>(&'a self, prompt: &'a TextPrompt, stream: bool) -> ChatRequest<'a> {
        let mut messages = Vec::with_capacity(2);
        if let Some(system) = &self.system_prompt {
            messages.push(ChatMessage {
                role: "system",
                content: system,
            });
        }
        messages.push(ChatMessage {
            role: "user",
            content: &prompt.prompt,
        });

        ChatRequest {
            model: &self.model,
            messages,
            temperature: prompt.temperature.clamp(0.0, 2.0),
            max_tokens: 8192,
            stream,
        }
    }

    async fn chat(&self, prompt: &TextPrompt) -> Result<ProviderOutput, ProviderError> {
        let url = self.base.build_url(&self.api_path);
        let payload = self.chat_request(prompt, false);

        info!(
            provider = self.base.id.as_str(),
            model = self.model.as_str(),
            "Sending request to OpenAI-compatible provider"
        );

        let response: ChatResponse = self.base.post_with_optional_bearer(&url, &payload).await?;
        debug!("Received response from OpenAI-compatible provider");

        let content = response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message)
            .and_then(|m| m.content)
            .ok_or_else(|| ProviderError::invalid_response(&self.base.id, "missing content"))?;

        Ok(ProviderOutput::new(content).with_model(response.model))
    }

    fn stream_chat(&self, prompt: &TextPrompt) -> Result<TextStream, ProviderError> {
        let url = self.base.build_url(&self.api_path);
        let payload = self.chat_request(prompt, true);

        info!(
            provider = self.base.id.as_str(),
            model = self.model.as_str(),
            "Opening OpenAI-compatible stream"
        );
        self.base
            .stream_with_optional_bearer(&url, &payload, parse_stream_chunk)
    }

    async fn image(&self, prompt: &ImagePrompt) -> Result<ProviderOutput, ProviderError> {
        let url = self.base.build_url(&self.image_path);

        let description = if prompt.quality.is_premium() {
            format!("{}, {PREMIUM_IMAGE_SUFFIX}", prompt.description)
        } else {
            prompt.description.clone()
        };
        let payload = ImageRequest {
            model: &self.model,
            prompt: description,
            n: 1,
        };

        info!(
            provider = self.base.id.as_str(),
            model = self.model.as_str(),
            quality = prompt.quality.as_str(),
            "Sending image request to OpenAI-compatible provider"
        );

        let response: ImageResponse = self.base.post_with_optional_bearer(&url, &payload).await?;
        let image = response
            .data
            .into_iter()
            .find_map(|item| item.url.or(item.b64_json))
            .filter(|value| !value.trim().is_empty())
            .ok_or_else(|| ProviderError::invalid_response(&self.base.id, "no image returned"))?;

        Ok(ProviderOutput::new(as_image_url(&image, None)).with_model(response.model))
    }
}

#[async_trait]
impl ProviderClient for OpenAiCompatibleClient {
    fn id(&self) -> &str {
        &self.base.id
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn complete(&self, request: &ProviderRequest) -> Result<ProviderOutput, ProviderError> {
        match request {
            ProviderRequest::Text(prompt) => self.chat(prompt).await,
            ProviderRequest::Image(prompt) => self.image(prompt).await,
        }
    }

    async fn stream(&self, request: &ProviderRequest) -> Result<TextStream, ProviderError> {
        match request {
            ProviderRequest::Text(prompt) => self.stream_chat(prompt),
            ProviderRequest::Image(_) => Err(ProviderError::unsupported(
                &self.base.id,
                "image generation cannot be streamed",
            )),
        }
    }
}

/// Chat completion chunks carry `choices[0].delta.content`; `[DONE]` ends the stream.
fn parse_stream_chunk(data: &str) -> Result<SseChunk, String> {
    if data.trim() == "[DONE]" {
        return Ok(SseChunk::Done);
    }
    let chunk: ChatChunk =
        serde_json::from_str(data).map_err(|e| format!("malformed stream chunk: {e}"))?;
    let text = chunk
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.delta)
        .and_then(|delta| delta.content)
        .unwrap_or_default();
    Ok(if text.is_empty() {
        SseChunk::Skip
    } else {
        SseChunk::Text(text)
    })
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f64,
    max_tokens: u32,
    stream: bool,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
    model: Option<String>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: Option<ChatReply>,
}

#[derive(Deserialize)]
struct ChatReply {
    content: Option<String>,
}

#[derive(Deserialize)]
struct ChatChunk {
    #[serde(default)]
    choices: Vec<ChunkChoice>,
}

#[derive(Deserialize)]
struct ChunkChoice {
    delta: Option<ChatReply>,
}

#[derive(Serialize)]
struct ImageRequest<'a> {
    model: &'a str,
    prompt: String,
    n: u32,
}

#[derive(Deserialize)]
struct ImageResponse {
    #[serde(default)]
    data: Vec<ImageData>,
    model: Option<String>,
}

#[derive(Deserialize)]
struct ImageData {
    url: Option<String>,
    b64_json: Option<String>,
}
