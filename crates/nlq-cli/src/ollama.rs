//! Ollama provider for natural-language query parsing.
//!
//! Sends the fully built prompt to the Ollama HTTP API (`/api/chat`) in JSON
//! mode and hands the raw message content back to the parser. Validation of
//! that content happens in `nlq-parser`, not here.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use nlq_parser::{AiProvider, Completion, ProviderError};

/// Configuration for the Ollama inference endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct OllamaConfig {
    /// Ollama HTTP API base URL.
    #[serde(default = "default_host")]
    pub host: String,
    /// Model to use for inference.
    #[serde(default = "default_model")]
    pub model: String,
    /// Request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_host() -> String {
    "http://localhost:11434".into()
}
fn default_model() -> String {
    "llama3.1:8b".into()
}
fn default_timeout_secs() -> u64 {
    30
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            model: default_model(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Ollama chat API request body.
#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    format: &'a str,
    stream: bool,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

/// Ollama chat API response (only fields we need).
#[derive(Deserialize)]
struct ChatResponse {
    message: Option<ResponseMessage>,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: String,
}

/// [`AiProvider`] backed by a local or remote Ollama server.
pub struct OllamaProvider {
    client: reqwest::Client,
    config: OllamaConfig,
}

impl OllamaProvider {
    pub fn new(config: OllamaConfig) -> Result<Self, ProviderError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ProviderError::Internal(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &OllamaConfig {
        &self.config
    }

    fn base_url(&self) -> &str {
        self.config.host.trim_end_matches('/')
    }

    fn classify(&self, err: reqwest::Error) -> ProviderError {
        if err.is_timeout() {
            ProviderError::Timeout(format!(
                "Request timeout after {}ms",
                self.config.timeout_secs * 1000
            ))
        } else {
            ProviderError::Request(err.to_string())
        }
    }
}

#[async_trait]
impl AiProvider for OllamaProvider {
    async fn generate_completion(&self, prompt: &str) -> Result<Completion, ProviderError> {
        let url = format!("{}/api/chat", self.base_url());
        let body = ChatRequest {
            model: &self.config.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            format: "json",
            stream: false,
        };

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(status = %status, "ollama returned non-success status");
            return Err(ProviderError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let chat: ChatResponse = response.json().await.map_err(|e| {
            if e.is_timeout() {
                self.classify(e)
            } else {
                ProviderError::InvalidResponse(format!("undecodable chat response: {e}"))
            }
        })?;

        match chat.message {
            Some(message) if !message.content.trim().is_empty() => {
                tracing::debug!(
                    model = %self.config.model,
                    content_len = message.content.len(),
                    "ollama completion received"
                );
                Ok(Completion::new(message.content))
            }
            _ => Err(ProviderError::InvalidResponse(
                "chat response contained no message content".into(),
            )),
        }
    }

    async fn is_available(&self) -> bool {
        let url = format!("{}/api/tags", self.base_url());
        match self.client.get(&url).send().await {
            Ok(resp) => resp.status().is_success(),
            Err(e) => {
                tracing::debug!(error = %e, "ollama availability probe failed");
                false
            }
        }
    }

    fn name(&self) -> &str {
        "ollama"
    }
}
