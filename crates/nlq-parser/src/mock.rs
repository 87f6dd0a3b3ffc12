//! Mock provider for testing. Replays scripted completions and records prompts.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use crate::error::ProviderError;
use crate::provider::{AiProvider, Completion};

/// A scripted provider. Responses are consumed in order; once the script
/// runs out the last response repeats.
pub struct MockProvider {
    responses: Mutex<VecDeque<Result<String, ProviderError>>>,
    last: Mutex<Option<Result<String, ProviderError>>>,
    prompts: Mutex<Vec<String>>,
    available: bool,
    delay: Option<Duration>,
}

impl MockProvider {
    pub fn new() -> Self {
        Self {
            responses: Mutex::new(VecDeque::new()),
            last: Mutex::new(None),
            prompts: Mutex::new(Vec::new()),
            available: true,
            delay: None,
        }
    }

    /// A provider that always answers with `content`.
    pub fn returning(content: impl Into<String>) -> Self {
        let mock = Self::new();
        mock.push_response(content);
        mock
    }

    /// A provider that always fails with `error`.
    pub fn failing(error: ProviderError) -> Self {
        let mock = Self::new();
        mock.push_error(error);
        mock
    }

    /// A provider answering with a well-formed response built from parts.
    pub fn with_filter(search_filter: serde_json::Value, confidence: f64) -> Self {
        let body = serde_json::json!({
            "searchFilter": search_filter,
            "confidence": confidence,
        });
        Self::returning(body.to_string())
    }

    pub fn push_response(&self, content: impl Into<String>) {
        self.lock_responses().push_back(Ok(content.into()));
    }

    pub fn push_error(&self, error: ProviderError) {
        self.lock_responses().push_back(Err(error));
    }

    /// Report the backend as unavailable.
    pub fn unavailable(mut self) -> Self {
        self.available = false;
        self
    }

    /// Sleep before answering (for cancellation tests).
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Number of completion calls made so far.
    pub fn call_count(&self) -> usize {
        self.lock_prompts().len()
    }

    /// Every prompt received, oldest first.
    pub fn prompts(&self) -> Vec<String> {
        self.lock_prompts().clone()
    }

    pub fn last_prompt(&self) -> Option<String> {
        self.lock_prompts().last().cloned()
    }

    fn next_response(&self) -> Result<String, ProviderError> {
        let mut last = self.last.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(next) = self.lock_responses().pop_front() {
            *last = Some(next);
        }
        last.clone().unwrap_or_else(|| {
            Err(ProviderError::Internal(
                "mock provider has no scripted response".into(),
            ))
        })
    }

    fn lock_responses(&self) -> std::sync::MutexGuard<'_, VecDeque<Result<String, ProviderError>>> {
        self.responses.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn lock_prompts(&self) -> std::sync::MutexGuard<'_, Vec<String>> {
        self.prompts.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AiProvider for MockProvider {
    async fn generate_completion(&self, prompt: &str) -> Result<Completion, ProviderError> {
        self.lock_prompts().push(prompt.to_string());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.next_response().map(Completion::new)
    }

    async fn is_available(&self) -> bool {
        self.available
    }

    fn name(&self) -> &str {
        "mock"
    }
}
