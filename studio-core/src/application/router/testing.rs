//! Scripted provider doubles for router tests.

use super::registry::{ProviderRegistry, RegisteredProvider};
use crate::config::{CostTier, ProviderKind, ProviderProfile};
use crate::domain::{ProviderRequest, TaskKind};
use crate::infrastructure::model::{ProviderClient, ProviderError, ProviderOutput, TextStream};
use async_trait::async_trait;
use futures::StreamExt;
use futures::stream;
use reqwest::StatusCode;
use std::collections::BTreeSet;
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Debug, Clone)]
pub enum Script {
    Reply(&'static str),
    ReplyAs(&'static str, &'static str),
    Status(u16),
    Hang(Duration),
    Blank,
    /// Streams these chunks; `complete` returns them joined.
    Chunks(&'static [&'static str]),
    /// Streams these chunks, then fails with a 502.
    BreakAfter(&'static [&'static str]),
    /// Streams these chunks, then stalls before the next one.
    StallAfter(&'static [&'static str], Duration),
}

pub type Calls = Arc<Mutex<Vec<(String, ProviderRequest)>>>;

pub struct ScriptedClient {
    id: String,
    model: String,
    script: Script,
    calls: Calls,
}

#[async_trait]
impl ProviderClient for ScriptedClient {
    fn id(&self) -> &str {
        &self.id
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn complete(&self, request: &ProviderRequest) -> Result<ProviderOutput, ProviderError> {
        self.record(request);
        match &self.script {
            Script::Reply(text) => Ok(ProviderOutput::new(*text)),
            Script::ReplyAs(text, model) => {
                Ok(ProviderOutput::new(*text).with_model(Some(model.to_string())))
            }
            Script::Status(code) => Err(ProviderError::status(
                &self.id,
                StatusCode::from_u16(*code).expect("status"),
                "scripted failure",
            )),
            Script::Hang(duration) => {
                tokio::time::sleep(*duration).await;
                Ok(ProviderOutput::new("late"))
            }
            Script::Blank => Ok(ProviderOutput::new("   ")),
            Script::Chunks(chunks)
            | Script::BreakAfter(chunks)
            | Script::StallAfter(chunks, _) => Ok(ProviderOutput::new(chunks.concat())),
        }
    }

    async fn stream(&self, request: &ProviderRequest) -> Result<TextStream, ProviderError> {
        match &self.script {
            Script::Chunks(parts) => {
                self.record(request);
                Ok(Box::pin(chunks(parts)))
            }
            Script::BreakAfter(parts) => {
                self.record(request);
                let failure = ProviderError::status(&self.id, StatusCode::BAD_GATEWAY, "dropped");
                Ok(Box::pin(chunks(parts).chain(stream::once(async move { Err(failure) }))))
            }
            Script::StallAfter(parts, pause) => {
                self.record(request);
                let pause = *pause;
                Ok(Box::pin(chunks(parts).chain(stream::once(async move {
                    tokio::time::sleep(pause).await;
                    Ok("late".to_string())
                }))))
            }
            _ => {
                let output = self.complete(request).await?;
                Ok(Box::pin(stream::once(async move { Ok(output.content) })))
            }
        }
    }
}

fn chunks(
    parts: &[&str],
) -> stream::Iter<std::vec::IntoIter<Result<String, ProviderError>>> {
    stream::iter(
        parts
            .iter()
            .map(|part| Ok(part.to_string()))
            .collect::<Vec<_>>(),
    )
}

impl ScriptedClient {
    fn record(&self, request: &ProviderRequest) {
        self.calls
            .lock()
            .expect("calls lock")
            .push((self.id.clone(), request.clone()));
    }
}

pub fn profile(id: &str, capabilities: &[TaskKind], priority: u32) -> ProviderProfile {
    ProviderProfile {
        id: id.to_string(),
        kind: ProviderKind::OpenAi,
        endpoint: format!("http://{id}.test"),
        api_key: None,
        api_path: None,
        image_path: None,
        model: format!("{id}-model"),
        capabilities: capabilities.iter().copied().collect::<BTreeSet<_>>(),
        priority,
        cost_tier: CostTier::Free,
        timeout: None,
        system_prompt: None,
    }
}

pub fn text_caps() -> Vec<TaskKind> {
    TaskKind::text_kinds().collect()
}

pub fn scripted(id: &str, model: &str, script: Script, calls: &Calls) -> Arc<ScriptedClient> {
    Arc::new(ScriptedClient {
        id: id.to_string(),
        model: model.to_string(),
        script,
        calls: Arc::clone(calls),
    })
}

/// `None` registers the profile as unavailable.
pub fn registry(entries: Vec<(ProviderProfile, Option<Script>)>, calls: &Calls) -> ProviderRegistry {
    ProviderRegistry::new(
        entries
            .into_iter()
            .map(|(profile, script)| match script {
                Some(script) => {
                    let client = scripted(&profile.id, &profile.model, script, calls);
                    RegisteredProvider::available(profile, client)
                }
                None => RegisteredProvider::unavailable(profile),
            })
            .collect(),
    )
}

pub fn called(calls: &Calls) -> Vec<String> {
    calls
        .lock()
        .expect("calls lock")
        .iter()
        .map(|(id, _)| id.clone())
        .collect()
}
