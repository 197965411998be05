//! LLM Client: the single point of entry for all chat-completion calls.
//!
//! ARCHITECTURAL RULE: No other module may call the completion API directly.
//! All generation goes through `Generator`, which owns the cooldown gate.
//!
//! The endpoint is any OpenAI-compatible `/chat/completions` API (Groq by default).
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

pub mod gate;
pub mod prompts;

use gate::CooldownGate;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);
const TEMPERATURE: f32 = 0.7;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Rate limited by completion API: {0}")]
    RateLimited(String),

    #[error("LLM returned empty content")]
    EmptyContent,

    #[error("Gated generation task failed: {0}")]
    TaskFailed(String),
}

/// A role-tagged prompt: one system message plus one user message.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatPrompt {
    pub system: String,
    pub user: String,
}

/// Typed result of one generation call.
///
/// `structured` is populated when the trimmed text is itself a JSON object or
/// array, so callers never have to guess the shape of what came back.
#[derive(Debug, Clone, PartialEq)]
pub struct Generation {
    pub text: String,
    pub structured: Option<Value>,
}

impl Generation {
    pub fn from_text(raw: &str) -> Self {
        let text = raw.trim().to_string();
        let structured = serde_json::from_str::<Value>(&text)
            .ok()
            .filter(|v| v.is_object() || v.is_array());
        Self { text, structured }
    }
}

/// Anything that can turn a prompt into completion text.
/// `LlmClient` is the production backend; tests plug in scripted fakes.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn complete(&self, prompt: &ChatPrompt) -> Result<Generation, LlmError>;
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    temperature: f32,
    messages: [ChatMessage<'a>; 2],
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
    #[serde(default)]
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Usage {
    prompt_tokens: u32,
    completion_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ApiErrorEnvelope {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

impl ChatCompletionResponse {
    /// Text of the single top choice, trimmed.
    fn into_text(self) -> Result<String, LlmError> {
        self.choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .ok_or(LlmError::EmptyContent)
    }
}

/// HTTP client for an OpenAI-compatible chat-completion endpoint.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    api_key: String,
    endpoint: String,
    model: String,
}

impl LlmClient {
    pub fn new(api_key: String, base_url: &str, model: String) -> Result<Self, LlmError> {
        Ok(Self {
            client: Client::builder().timeout(REQUEST_TIMEOUT).build()?,
            api_key,
            endpoint: format!("{}/chat/completions", base_url.trim_end_matches('/')),
            model,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl TextGenerator for LlmClient {
    /// One request, no retries. A 429 is reported as `RateLimited` so the
    /// gated insights path can surface it distinctly.
    async fn complete(&self, prompt: &ChatPrompt) -> Result<Generation, LlmError> {
        let request_body = ChatCompletionRequest {
            model: &self.model,
            temperature: TEMPERATURE,
            messages: [
                ChatMessage {
                    role: "system",
                    content: &prompt.system,
                },
                ChatMessage {
                    role: "user",
                    content: &prompt.user,
                },
            ],
        };

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiErrorEnvelope>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            if status == StatusCode::TOO_MANY_REQUESTS {
                return Err(LlmError::RateLimited(message));
            }
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let completion: ChatCompletionResponse = response.json().await?;
        if let Some(usage) = &completion.usage {
            debug!(
                "LLM call succeeded: prompt_tokens={}, completion_tokens={}",
                usage.prompt_tokens, usage.completion_tokens
            );
        }

        completion.into_text().map(|text| Generation::from_text(&text))
    }
}

/// The generation adapter used by the rest of the service.
///
/// Wraps a backend and owns the process-wide cooldown gate. `generate` goes
/// straight to the backend; `generate_gated` serializes through the gate.
#[derive(Clone)]
pub struct Generator {
    backend: Arc<dyn TextGenerator>,
    gate: Arc<CooldownGate>,
}

impl Generator {
    pub fn new(backend: Arc<dyn TextGenerator>, cooldown: Duration) -> Self {
        Self {
            backend,
            gate: Arc::new(CooldownGate::new(cooldown)),
        }
    }

    pub async fn generate(&self, prompt: &ChatPrompt) -> Result<Generation, LlmError> {
        self.backend.complete(prompt).await
    }

    pub async fn generate_gated(&self, prompt: &ChatPrompt) -> Result<Generation, LlmError> {
        let backend = self.backend.clone();
        let prompt = prompt.clone();
        self.gate
            .run(async move { backend.complete(&prompt).await })
            .await
            .map_err(|e| LlmError::TaskFailed(e.to_string()))?
    }
}
