//! Text-completion provider abstraction.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::ProviderError;

/// Raw completion returned by a provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Completion {
    pub content: String,
}

impl Completion {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
        }
    }
}

/// Trait for generative backends (Ollama, hosted APIs, test doubles).
///
/// Implementations own their transport, credentials and timeout; a deadline
/// that elapses should surface as [`ProviderError::Timeout`].
#[async_trait]
pub trait AiProvider: Send + Sync {
    /// Complete a single prompt.
    async fn generate_completion(&self, prompt: &str) -> Result<Completion, ProviderError>;

    /// Whether the backend is reachable and ready.
    async fn is_available(&self) -> bool;

    /// Name of this provider (for logging/audit).
    fn name(&self) -> &str;
}
