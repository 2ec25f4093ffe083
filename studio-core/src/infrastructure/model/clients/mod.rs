//! Upstream provider clients

mod base;
mod gemini;
mod openai;
mod pollinations;

pub use base::{ChunkParser, HttpClientBase, SseChunk, as_image_url};
pub use gemini::GeminiClient;
pub use openai::OpenAiCompatibleClient;
pub use pollinations::PollinationsClient;
