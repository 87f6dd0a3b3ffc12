//! Shared test harness for E2E integration tests.
//!
//! Wires the parser service to either a scripted `MockProvider` or a real
//! `OllamaProvider` pointed at a wiremock server, always with the built-in
//! filter configuration.

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use nlq_cli::filters::default_filter_config;
use nlq_cli::ollama::{OllamaConfig, OllamaProvider};
use nlq_parser::{AiSearchParser, MockProvider, ParseError, ParserConfig};
use nlq_protocol::{CompoundSearchFilterConfig, ParseResult};

/// Parser plus whatever backs it.
pub struct TestHarness {
    pub parser: Arc<AiSearchParser>,
    /// Present when the harness was built over a mock provider.
    pub mock: Option<Arc<MockProvider>>,
    /// Present when the harness was built over a wiremock Ollama.
    pub server: Option<MockServer>,
    pub filters: CompoundSearchFilterConfig,
}

impl TestHarness {
    /// Harness over a scripted mock provider with default parser settings.
    pub fn with_mock(mock: MockProvider) -> Self {
        Self::with_mock_config(mock, ParserConfig::default())
    }

    pub fn with_mock_config(mock: MockProvider, config: ParserConfig) -> Self {
        let mock = Arc::new(mock);
        Self {
            parser: Arc::new(AiSearchParser::new(mock.clone(), config)),
            mock: Some(mock),
            server: None,
            filters: default_filter_config(),
        }
    }

    /// Harness over `OllamaProvider` talking to a fresh wiremock server.
    /// Mount responses with [`TestHarness::mount_chat`] before parsing.
    pub async fn with_ollama(timeout_secs: u64) -> Self {
        let server = MockServer::start().await;
        let provider = OllamaProvider::new(OllamaConfig {
            host: server.uri(),
            model: "llama3.1:8b".into(),
            timeout_secs,
        })
        .unwrap();
        Self {
            parser: Arc::new(AiSearchParser::with_defaults(Arc::new(provider))),
            mock: None,
            server: Some(server),
            filters: default_filter_config(),
        }
    }

    /// Answer `/api/chat` with `content` as the assistant message.
    pub async fn mount_chat(&self, content: &str) {
        self.mount_chat_template(
            ResponseTemplate::new(200).set_body_json(ollama_response(content)),
        )
        .await;
    }

    /// Answer `/api/chat` with `content` after `delay`.
    pub async fn mount_slow_chat(&self, content: &str, delay: Duration) {
        self.mount_chat_template(
            ResponseTemplate::new(200)
                .set_body_json(ollama_response(content))
                .set_delay(delay),
        )
        .await;
    }

    pub async fn mount_chat_template(&self, template: ResponseTemplate) {
        let server = self.server.as_ref().unwrap();
        Mock::given(method("POST"))
            .and(path("/api/chat"))
            .respond_with(template)
            .mount(server)
            .await;
    }

    /// Run the full pipeline with the harness filters.
    pub async fn parse(&self, query: &str) -> Result<ParseResult, ParseError> {
        self.parser
            .parse_natural_language_query(query, &self.filters)
            .await
    }

    /// Calls the mock provider has received.
    pub fn provider_calls(&self) -> usize {
        self.mock.as_ref().map_or(0, |m| m.call_count())
    }

    /// Requests the wiremock Ollama has received.
    pub async fn server_requests(&self) -> usize {
        match &self.server {
            Some(server) => server
                .received_requests()
                .await
                .map_or(0, |reqs| reqs.len()),
            None => 0,
        }
    }
}

/// Build an Ollama chat response body.
pub fn ollama_response(content: &str) -> serde_json::Value {
    json!({
        "model": "llama3.1:8b",
        "message": {
            "role": "assistant",
            "content": content
        },
        "done": true
    })
}
