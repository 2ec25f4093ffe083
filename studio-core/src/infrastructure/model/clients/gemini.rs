//! Gemini client implementation
//!
//! Text goes through `generateContent` (or `streamGenerateContent` as SSE);
//! image models (Imagen) through `predict`.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::{debug, info};

use super::base::{HttpClientBase, SseChunk, as_image_url};
use crate::config::ProviderProfile;
use crate::constants::DEFAULT_GEMINI_API_PATH;
use crate::domain::{ImagePrompt, ProviderRequest, TextPrompt};
use crate::infrastructure::model::traits::ProviderClient;
use crate::infrastructure::model::types::{ProviderError, ProviderOutput, TextStream};

const IMAGE_PROMPT_SUFFIX: &str = "high quality, detailed, professional photography";

/// Gemini client for Google AI
#[derive(Clone)]
pub struct GeminiClient {
    base: HttpClientBase,
    api_path: String,
    model: String,
    system_prompt: Option<String>,
}

impl GeminiClient {
    pub fn from_profile(profile: &ProviderProfile, api_key: Option<String>) -> Self {
        Self {
            base: HttpClientBase::new(profile.id.clone(), profile.endpoint.clone(), api_key),
            api_path: profile
                .api_path
                .clone()
                .unwrap_or_else(|| DEFAULT_GEMINI_API_PATH.to_string()),
            model: profile.model.clone(),
            system_prompt: profile.system_prompt.clone(),
        }
    }

    fn build_model_url(&self, method: &str) -> String {
        let path = format!(
            "{}/{}:{method}",
            self.api_path.trim_matches('/'),
            self.model
        );
        self.base.build_url(&path)
    }

    fn text_payload(&self, prompt: &TextPrompt) -> Value {
        let mut payload = json!({
            "contents": [{"parts": [{"text": prompt.prompt}]}],
            "generationConfig": {
                "temperature": prompt.temperature,
                "topK": 64,
                "topP": 0.95,
                "maxOutputTokens": 8192,
            }
        });
        if let Some(system) = &self.system_prompt {
            payload["system_instruction"] = json!({
                "parts": [{"text": system}]
            });
        }
        payload
    }

    async fn generate_text(&self, prompt: &TextPrompt) -> Result<ProviderOutput, ProviderError> {
        let url = self.build_model_url("generateContent");
        let payload = self.text_payload(prompt);

        info!(
            provider = self.base.id.as_str(),
            model = self.model.as_str(),
            "Sending request to Gemini"
        );

        let response: GeminiResponse = self.base.post_with_query_key(&url, &payload).await?;
        debug!("Received response from Gemini");

        let model = response.model_version.clone();
        let content = response
            .first_text()
            .ok_or_else(|| ProviderError::invalid_response(&self.base.id, "missing text"))?;

        Ok(ProviderOutput::new(content).with_model(model))
    }

    fn stream_text(&self, prompt: &TextPrompt) -> Result<TextStream, ProviderError> {
        let url = self.build_model_url("streamGenerateContent");
        let payload = self.text_payload(prompt);

        info!(
            provider = self.base.id.as_str(),
            model = self.model.as_str(),
            "Opening Gemini stream"
        );
        self.base
            .stream_with_query_key(&url, &payload, parse_stream_chunk)
    }

    async fn generate_image(&self, prompt: &ImagePrompt) -> Result<ProviderOutput, ProviderError> {
        let url = self.build_model_url("predict");

        let payload = json!({
            "instances": [{"prompt": format!("{}, {IMAGE_PROMPT_SUFFIX}", prompt.description)}],
            "parameters": {
                "sampleCount": 1,
                "aspectRatio": prompt.ratio,
                "personGeneration": "allow_adult",
            }
        });

        info!(
            provider = self.base.id.as_str(),
            model = self.model.as_str(),
            width = prompt.width,
            height = prompt.height,
            "Sending image request to Gemini"
        );

        let response: PredictResponse = self.base.post_with_query_key(&url, &payload).await?;
        let prediction = response
            .predictions
            .unwrap_or_default()
            .into_iter()
            .find(|p| p.bytes_base64_encoded.is_some())
            .ok_or_else(|| ProviderError::invalid_response(&self.base.id, "no image returned"))?;

        let image = prediction.bytes_base64_encoded.unwrap_or_default();
        Ok(ProviderOutput::new(as_image_url(
            &image,
            prediction.mime_type.as_deref(),
        )))
    }
}

#[async_trait]
impl ProviderClient for GeminiClient {
    fn id(&self) -> &str {
        &self.base.id
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn complete(&self, request: &ProviderRequest) -> Result<ProviderOutput, ProviderError> {
        match request {
            ProviderRequest::Text(prompt) => self.generate_text(prompt).await,
            ProviderRequest::Image(prompt) => self.generate_image(prompt).await,
        }
    }

    async fn stream(&self, request: &ProviderRequest) -> Result<TextStream, ProviderError> {
        match request {
            ProviderRequest::Text(prompt) => self.stream_text(prompt),
            ProviderRequest::Image(_) => Err(ProviderError::unsupported(
                &self.base.id,
                "image generation cannot be streamed",
            )),
        }
    }
}

/// Each `streamGenerateContent` event carries a partial `GenerateContentResponse`.
fn parse_stream_chunk(data: &str) -> Result<SseChunk, String> {
    if data.trim() == "[DONE]" {
        return Ok(SseChunk::Done);
    }
    let response: GeminiResponse =
        serde_json::from_str(data).map_err(|e| format!("malformed stream chunk: {e}"))?;
    Ok(match response.first_text() {
        Some(text) if !text.is_empty() => SseChunk::Text(text),
        _ => SseChunk::Skip,
    })
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiResponse {
    candidates: Option<Vec<GeminiCandidate>>,
    model_version: Option<String>,
}

impl GeminiResponse {
    fn first_text(self) -> Option<String> {
        self.candidates
            .unwrap_or_default()
            .into_iter()
            .flat_map(|c| c.content)
            .flat_map(|c| c.parts)
            .find_map(|p| p.text)
    }
}

#[derive(Deserialize)]
struct GeminiCandidate {
    content: Option<GeminiContent>,
}

#[derive(Deserialize)]
struct GeminiContent {
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Deserialize)]
struct GeminiPart {
    text: Option<String>,
}

#[derive(Deserialize)]
struct PredictResponse {
    predictions: Option<Vec<Prediction>>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Prediction {
    bytes_base64_encoded: Option<String>,
    mime_type: Option<String>,
}
