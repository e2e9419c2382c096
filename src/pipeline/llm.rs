//! Chat-model interaction: send the extraction prompt, recover the JSON.
//!
//! The model service is the second opaque collaborator, behind the
//! [`ChatClient`] trait. The shipped implementation talks to a local Ollama
//! server over its `/api/chat` endpoint — a single non-streaming request
//! carrying one user-role message, with deterministic sampling (temperature
//! zero) and a bounded reply length. No system prompt, no multi-turn
//! context, no retries.
//!
//! ## JSON recovery
//!
//! Models occasionally wrap the requested object in prose or a code fence
//! despite the instructions. [`extract_json_object`] takes the substring
//! from the first `{` to the last `}` inclusive and hands it to serde. The
//! heuristic assumes exactly one JSON object is present and that no `}`
//! trails the intended closing brace; a reply that violates that assumption
//! fails to parse and degrades to the default record upstream.

use crate::error::ExtractError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Per-call completion parameters.
#[derive(Debug, Clone)]
pub struct CompletionOptions {
    /// Model identifier, e.g. "qwen2.5:3b".
    pub model: String,
    /// Sampling temperature; 0.0 always picks the highest-probability token.
    pub temperature: f32,
    /// Upper bound on reply tokens (Ollama's `num_predict`).
    pub max_reply_tokens: u32,
}

/// A chat-completion backend: one prompt in, one completion out.
#[async_trait]
pub trait ChatClient: Send + Sync {
    async fn complete(
        &self,
        prompt: &str,
        options: &CompletionOptions,
    ) -> Result<String, ExtractError>;
}

// ── Ollama wire types ────────────────────────────────────────────────────

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    stream: bool,
    options: ChatRequestOptions,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct ChatRequestOptions {
    temperature: f32,
    num_predict: u32,
}

#[derive(Deserialize)]
struct ChatResponse {
    message: ChatResponseMessage,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    content: String,
}

/// Client for a local Ollama server.
pub struct OllamaClient {
    http: reqwest::Client,
    base_url: String,
}

impl OllamaClient {
    /// Build a client for `base_url` (e.g. `http://localhost:11434`).
    ///
    /// The timeout bounds the whole request; a hung server fails the call
    /// instead of wedging the pipeline.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ExtractError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ExtractError::Internal(format!("HTTP client build failed: {e}")))?;

        let base_url: String = base_url.into();
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl ChatClient for OllamaClient {
    async fn complete(
        &self,
        prompt: &str,
        options: &CompletionOptions,
    ) -> Result<String, ExtractError> {
        let url = format!("{}/api/chat", self.base_url);
        let body = ChatRequest {
            model: &options.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            stream: false,
            options: ChatRequestOptions {
                temperature: options.temperature,
                num_predict: options.max_reply_tokens,
            },
        };

        debug!(
            "Chat request to {} (model={}, {} prompt bytes)",
            url,
            options.model,
            prompt.len()
        );

        let response = self
            .http
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| ExtractError::ModelCall {
                model: options.model.clone(),
                detail: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(ExtractError::ModelCall {
                model: options.model.clone(),
                detail: format!("HTTP {status}: {}", text.trim()),
            });
        }

        let parsed: ChatResponse =
            response.json().await.map_err(|e| ExtractError::ModelCall {
                model: options.model.clone(),
                detail: format!("malformed response body: {e}"),
            })?;

        Ok(parsed.message.content)
    }
}

/// Locate the candidate JSON object inside a model reply.
///
/// Returns the substring from the first `{` to the last `}` inclusive, or
/// `None` when no such pair exists.
pub fn extract_json_object(reply: &str) -> Option<&str> {
    let start = reply.find('{')?;
    let end = reply.rfind('}')?;
    if end < start {
        return None;
    }
    Some(&reply[start..=end])
}
