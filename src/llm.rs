//! Text-completion capability and the Ollama-backed client
//!
//! The pipeline treats the model as unreliable: possibly verbose, possibly
//! malformed, possibly down. Callers only get the raw assistant text;
//! repairing it is the sanitizer's job.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::LlmConfig;

/// Narrow text-completion capability consumed by the intent extractor
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Run one system+user exchange and return the raw assistant text
    async fn complete(&self, system: &str, user: &str) -> Result<String>;
}

/// Request body for the Ollama `/api/chat` endpoint
#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    format: &'a str,
    stream: bool,
    options: ChatOptions,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

/// Decoding options. Low temperature and a bounded context favour
/// determinism over creativity
#[derive(Debug, Serialize)]
struct ChatOptions {
    temperature: f32,
    num_ctx: u32,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    message: AssistantMessage,
}

#[derive(Debug, Deserialize)]
struct AssistantMessage {
    content: String,
}

/// Chat client for a local Ollama server
pub struct OllamaClient {
    client: Client,
    base_url: String,
    model: String,
    temperature: f32,
    num_ctx: u32,
}

impl OllamaClient {
    /// Create a new client with the configured timeout
    pub fn new(config: &LlmConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent("tripflow/0.1.0")
            .build()
            .with_context(|| "Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            temperature: config.temperature,
            num_ctx: config.num_ctx,
        })
    }
}

#[async_trait]
impl ChatModel for OllamaClient {
    async fn complete(&self, system: &str, user: &str) -> Result<String> {
        let url = format!("{}/api/chat", self.base_url);
        let body = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: user,
                },
            ],
            format: "json",
            stream: false,
            options: ChatOptions {
                temperature: self.temperature,
                num_ctx: self.num_ctx,
            },
        };

        debug!("Requesting chat completion from {} ({})", url, self.model);
        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .with_context(|| "Chat completion request failed")?;

        let status = response.status();
        if !status.is_success() {
            anyhow::bail!("Chat endpoint returned {status}");
        }

        let decoded: ChatResponse = response
            .json()
            .await
            .with_context(|| "Failed to parse chat response")?;
        Ok(decoded.message.content)
    }
}
