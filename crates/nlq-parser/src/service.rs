//! AI search parser service, the pipeline entry point.
//!
//! sanitize -> schema -> prompt -> provider -> parse/validate -> `ParseResult`.
//!
//! Results below `min_confidence` are returned like any other result; the
//! service is a parser, not a gatekeeper. Callers use
//! [`AiSearchParser::is_low_confidence`] to decide how to present them.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Instant;

use futures::FutureExt;
use serde::Deserialize;
use tracing::Instrument;
use uuid::Uuid;

use crate::error::ParseError;
use crate::prompt::build_prompt;
use crate::provider::AiProvider;
use crate::response::parse_ai_response;
use crate::sanitize::{SanitizationConfig, sanitize_input};
use crate::schema::build_filter_schema;
use nlq_protocol::{CompoundSearchFilterEntity, ParseResult};

/// Tunables for the parser service. Missing fields fall back to defaults.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct ParserConfig {
    /// Confidence below which a result is flagged as uncertain.
    #[serde(default = "default_min_confidence")]
    pub min_confidence: f64,
    /// Maximum query length in characters.
    #[serde(default = "default_max_query_length")]
    pub max_query_length: usize,
}

fn default_min_confidence() -> f64 {
    0.5
}
fn default_max_query_length() -> usize {
    crate::sanitize::DEFAULT_MAX_LENGTH
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            min_confidence: default_min_confidence(),
            max_query_length: default_max_query_length(),
        }
    }
}

/// Natural-language to search filter parser.
///
/// Holds only immutable configuration and a shared provider, so one instance
/// can serve concurrent calls.
pub struct AiSearchParser {
    provider: Arc<dyn AiProvider>,
    config: ParserConfig,
}

impl AiSearchParser {
    pub fn new(provider: Arc<dyn AiProvider>, config: ParserConfig) -> Self {
        let min_confidence = if config.min_confidence.is_nan() {
            default_min_confidence()
        } else {
            config.min_confidence.clamp(0.0, 1.0)
        };
        Self {
            provider,
            config: ParserConfig {
                min_confidence,
                ..config
            },
        }
    }

    /// Parser with default configuration.
    pub fn with_defaults(provider: Arc<dyn AiProvider>) -> Self {
        Self::new(provider, ParserConfig::default())
    }

    /// Convert a free-text query into a validated search filter.
    pub async fn parse_natural_language_query(
        &self,
        query: &str,
        filter_config: &[CompoundSearchFilterEntity],
    ) -> Result<ParseResult, ParseError> {
        let span = tracing::info_span!(
            "nl_query",
            request_id = %Uuid::now_v7(),
            provider = self.provider.name(),
        );
        self.run_pipeline(query, filter_config).instrument(span).await
    }

    async fn run_pipeline(
        &self,
        query: &str,
        filter_config: &[CompoundSearchFilterEntity],
    ) -> Result<ParseResult, ParseError> {
        let started = Instant::now();

        let sanitization = SanitizationConfig::with_max_length(self.config.max_query_length);
        let sanitized = sanitize_input(query, &sanitization).map_err(|e| {
            tracing::debug!(error = %e, "query rejected by sanitizer");
            ParseError::from_validation(e, query)
        })?;

        let schema = build_filter_schema(filter_config);
        let prompt = build_prompt(&sanitized, &schema, chrono::Utc::now().date_naive());
        tracing::debug!(
            fields = schema.attribute_count(),
            prompt_len = prompt.len(),
            "prompt built"
        );

        let outcome = AssertUnwindSafe(self.provider.generate_completion(&prompt))
            .catch_unwind()
            .await;
        let completion = match outcome {
            Ok(Ok(completion)) => completion,
            Ok(Err(e)) => {
                let err = ParseError::from_provider(e, query);
                tracing::warn!(kind = %err.kind(), error = %err, "provider call failed");
                return Err(err);
            }
            Err(payload) => {
                let err = ParseError::unclassified(panic_message(payload.as_ref()), query);
                tracing::warn!(kind = %err.kind(), error = %err, "provider panicked");
                return Err(err);
            }
        };

        let parsed = parse_ai_response(&completion.content).map_err(|e| {
            tracing::warn!(error = %e, content = %completion.content, "invalid provider response");
            ParseError::from_response(e, query)
        })?;

        if parsed.confidence < self.config.min_confidence {
            tracing::debug!(
                confidence = parsed.confidence,
                min_confidence = self.config.min_confidence,
                "confidence below threshold, returning result to caller"
            );
        }

        tracing::info!(
            confidence = parsed.confidence,
            filter_fields = parsed.search_filter.len(),
            latency_ms = started.elapsed().as_millis() as u64,
            "query parsed"
        );

        Ok(ParseResult {
            search_filter: parsed.search_filter,
            confidence: parsed.confidence,
            reasoning: parsed.reasoning,
            original_query: query.to_string(),
        })
    }

    /// Whether `result` falls below the configured confidence threshold.
    pub fn is_low_confidence(&self, result: &ParseResult) -> bool {
        result.confidence < self.config.min_confidence
    }

    pub async fn is_provider_available(&self) -> bool {
        self.provider.is_available().await
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    pub fn min_confidence(&self) -> f64 {
        self.config.min_confidence
    }

    pub fn max_query_length(&self) -> usize {
        self.config.max_query_length
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        format!("provider panicked: {s}")
    } else if let Some(s) = payload.downcast_ref::<String>() {
        format!("provider panicked: {s}")
    } else {
        "provider panicked".to_string()
    }
}
