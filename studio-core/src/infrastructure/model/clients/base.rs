//! Base HTTP client with shared logic

use crate::constants::MAX_LOGGED_BODY_CHARS;
use crate::infrastructure::model::types::{ProviderError, TextStream};
use futures::StreamExt;
use futures::stream;
use reqwest::{Client, RequestBuilder};
use reqwest_eventsource::{Error as EventSourceError, Event, EventSource};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

/// What one SSE `data:` payload contributes to a text stream.
#[derive(Debug, PartialEq)]
pub enum SseChunk {
    Text(String),
    Skip,
    Done,
}

/// Provider-specific decoding of one SSE `data:` payload.
pub type ChunkParser = fn(&str) -> Result<SseChunk, String>;

/// Base HTTP client with shared functionality
#[derive(Clone)]
pub struct HttpClientBase {
    pub id: String,
    pub endpoint: String,
    pub api_key: Option<String>,
    pub http: Client,
}

impl HttpClientBase {
    pub fn new(id: String, endpoint: String, api_key: Option<String>) -> Self {
        Self {
            id,
            endpoint,
            api_key,
            http: Client::new(),
        }
    }

    /// Build URL from endpoint and path
    pub fn build_url(&self, path: &str) -> String {
        let base = self.endpoint.trim_end_matches('/');
        let path = path.trim_start_matches('/');
        format!("{base}/{path}")
    }

    /// Post JSON with bearer auth
    pub async fn post_with_bearer<Req, Res>(&self, url: &str, body: &Req) -> Result<Res, ProviderError>
    where
        Req: Serialize,
        Res: DeserializeOwned,
    {
        let api_key = self.require_api_key()?;
        let request = self.http.post(url).bearer_auth(api_key).json(body);
        self.execute(request).await
    }

    /// Post JSON with query param auth (for Gemini)
    pub async fn post_with_query_key<Req, Res>(
        &self,
        url: &str,
        body: &Req,
    ) -> Result<Res, ProviderError>
    where
        Req: Serialize,
        Res: DeserializeOwned,
    {
        let api_key = self.require_api_key()?;
        let request = self.http.post(url).query(&[("key", api_key)]).json(body);
        self.execute(request).await
    }

    /// Post JSON without auth (for keyless local servers)
    pub async fn post_no_auth<Req, Res>(&self, url: &str, body: &Req) -> Result<Res, ProviderError>
    where
        Req: Serialize,
        Res: DeserializeOwned,
    {
        self.execute(self.http.post(url).json(body)).await
    }

    /// Bearer auth when a key is configured, none otherwise
    pub async fn post_with_optional_bearer<Req, Res>(
        &self,
        url: &str,
        body: &Req,
    ) -> Result<Res, ProviderError>
    where
        Req: Serialize,
        Res: DeserializeOwned,
    {
        if self.api_key.is_some() {
            self.post_with_bearer(url, body).await
        } else {
            self.post_no_auth(url, body).await
        }
    }

    /// Open an SSE stream with query param auth (for Gemini)
    pub fn stream_with_query_key<Req: Serialize>(
        &self,
        url: &str,
        body: &Req,
        parse: ChunkParser,
    ) -> Result<TextStream, ProviderError> {
        let api_key = self.require_api_key()?;
        let request = self
            .http
            .post(url)
            .query(&[("alt", "sse"), ("key", api_key)])
            .json(body);
        self.event_stream(request, parse)
    }

    /// Open an SSE stream, with bearer auth when a key is configured
    pub fn stream_with_optional_bearer<Req: Serialize>(
        &self,
        url: &str,
        body: &Req,
        parse: ChunkParser,
    ) -> Result<TextStream, ProviderError> {
        let mut request = self.http.post(url).json(body);
        if self.api_key.is_some() {
            request = request.bearer_auth(self.require_api_key()?);
        }
        self.event_stream(request, parse)
    }

    /// The connection is made on first poll, so status and transport failures
    /// surface as the first item of the stream.
    fn event_stream(
        &self,
        request: RequestBuilder,
        parse: ChunkParser,
    ) -> Result<TextStream, ProviderError> {
        let source = EventSource::new(request).map_err(|_| {
            ProviderError::unsupported(&self.id, "request body cannot be replayed for streaming")
        })?;
        let state = SseState {
            source,
            provider: self.id.clone(),
            parse,
        };
        Ok(Box::pin(stream::unfold(Some(state), next_chunk)))
    }

    async fn execute<Res: DeserializeOwned>(&self, request: RequestBuilder) -> Result<Res, ProviderError> {
        let response = request
            .send()
            .await
            .map_err(|e| ProviderError::network(&self.id, e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let body = truncate_body(&body);
            debug!(
                provider = self.id.as_str(),
                status = status.as_u16(),
                body = body.as_str(),
                "Upstream returned error status"
            );
            return Err(ProviderError::status(&self.id, status, body));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| ProviderError::network(&self.id, e))?;
        serde_json::from_slice(&bytes)
            .map_err(|e| ProviderError::invalid_response(&self.id, format!("malformed JSON: {e}")))
    }

    fn require_api_key(&self) -> Result<&str, ProviderError> {
        self.api_key
            .as_deref()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| ProviderError::missing_api_key(&self.id))
    }
}

struct SseState {
    source: EventSource,
    provider: String,
    parse: ChunkParser,
}

async fn next_chunk(
    state: Option<SseState>,
) -> Option<(Result<String, ProviderError>, Option<SseState>)> {
    let mut state = state?;
    loop {
        let failure = match state.source.next().await? {
            Ok(Event::Open) => continue,
            Ok(Event::Message(message)) => match (state.parse)(&message.data) {
                Ok(SseChunk::Text(text)) => return Some((Ok(text), Some(state))),
                Ok(SseChunk::Skip) => continue,
                Ok(SseChunk::Done) => {
                    state.source.close();
                    return None;
                }
                Err(reason) => ProviderError::invalid_response(&state.provider, reason),
            },
            Err(EventSourceError::StreamEnded) => {
                state.source.close();
                return None;
            }
            Err(err) => stream_error(&state.provider, err),
        };
        // The event source reconnects on errors unless closed.
        state.source.close();
        debug!(
            provider = state.provider.as_str(),
            error = %failure,
            "Upstream event stream failed"
        );
        return Some((Err(failure), None));
    }
}

fn stream_error(provider: &str, err: EventSourceError) -> ProviderError {
    match err {
        EventSourceError::InvalidStatusCode(status, _) => {
            ProviderError::status(provider, status, "event stream rejected")
        }
        EventSourceError::Transport(source) => ProviderError::network(provider, source),
        other => ProviderError::invalid_response(provider, other.to_string()),
    }
}

fn truncate_body(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.chars().count() <= MAX_LOGGED_BODY_CHARS {
        return trimmed.to_string();
    }
    let cut: String = trimmed.chars().take(MAX_LOGGED_BODY_CHARS).collect();
    format!("{cut}...")
}

/// Wrap base64 image bytes as a data URL unless the value is already a URL.
pub fn as_image_url(value: &str, mime_type: Option<&str>) -> String {
    if value.starts_with("http://") || value.starts_with("https://") || value.starts_with("data:") {
        value.to_string()
    } else {
        format!("data:{};base64,{value}", mime_type.unwrap_or("image/png"))
    }
}
