//! Error types for each pipeline stage and the caller-facing `ParseError`.

use serde::ser::{Serialize, SerializeStruct, Serializer};
use thiserror::Error;

use nlq_protocol::ParseErrorKind;

/// Rejected user input. Raised before any provider call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputValidationError {
    #[error("Query cannot be empty")]
    Empty,

    #[error("Query exceeds maximum length of {limit} characters (got {actual})")]
    TooLong { limit: usize, actual: usize },

    #[error("Query is empty after removing markup")]
    EmptyAfterSanitization,
}

/// Provider output that does not satisfy the response contract.
#[derive(Debug, Error)]
pub enum ResponseError {
    #[error("invalid JSON in AI response: {0}")]
    Json(#[from] serde_json::Error),

    #[error("AI response must be a JSON object, got {0}")]
    NotAnObject(&'static str),

    #[error("AI response is missing required field 'searchFilter'")]
    MissingSearchFilter,

    #[error("'searchFilter' must be an object, got {0}")]
    InvalidSearchFilter(&'static str),

    #[error("'searchFilter.{key}' must be a string or an array of strings")]
    InvalidFilterValue { key: String },

    #[error("AI response is missing required field 'confidence'")]
    MissingConfidence,

    #[error("'confidence' must be a number, got {0}")]
    InvalidConfidence(&'static str),
}

/// Failure reported by an `AiProvider` implementation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    /// The adapter's own deadline elapsed.
    #[error("{0}")]
    Timeout(String),

    #[error("request failed: {0}")]
    Request(String),

    #[error("provider returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("invalid provider response: {0}")]
    InvalidResponse(String),

    #[error("provider unavailable: {0}")]
    Unavailable(String),

    /// Adapter bug or misconfiguration, not a remote failure.
    #[error("internal provider error: {0}")]
    Internal(String),
}

impl ProviderError {
    /// Structural timeout, or an adapter that only reports "timeout" in text.
    /// The text match is case-sensitive.
    pub fn is_timeout(&self) -> bool {
        match self {
            Self::Timeout(_) => true,
            other => other.to_string().contains("timeout"),
        }
    }
}

/// Caller-facing pipeline failure. Every variant carries the untouched query.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    #[error("{message}")]
    Validation {
        message: String,
        original_query: String,
    },

    #[error("{message}")]
    Timeout {
        message: String,
        original_query: String,
    },

    #[error("{message}")]
    Api {
        message: String,
        original_query: String,
    },

    #[error("{message}")]
    Unknown {
        message: String,
        original_query: String,
    },
}

impl ParseError {
    pub fn new(
        kind: ParseErrorKind,
        message: impl Into<String>,
        original_query: impl Into<String>,
    ) -> Self {
        let message = message.into();
        let original_query = original_query.into();
        match kind {
            ParseErrorKind::Validation => Self::Validation {
                message,
                original_query,
            },
            ParseErrorKind::Timeout => Self::Timeout {
                message,
                original_query,
            },
            ParseErrorKind::Api => Self::Api {
                message,
                original_query,
            },
            ParseErrorKind::Unknown => Self::Unknown {
                message,
                original_query,
            },
        }
    }

    pub fn kind(&self) -> ParseErrorKind {
        match self {
            Self::Validation { .. } => ParseErrorKind::Validation,
            Self::Timeout { .. } => ParseErrorKind::Timeout,
            Self::Api { .. } => ParseErrorKind::Api,
            Self::Unknown { .. } => ParseErrorKind::Unknown,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Self::Validation { message, .. }
            | Self::Timeout { message, .. }
            | Self::Api { message, .. }
            | Self::Unknown { message, .. } => message,
        }
    }

    pub fn original_query(&self) -> &str {
        match self {
            Self::Validation { original_query, .. }
            | Self::Timeout { original_query, .. }
            | Self::Api { original_query, .. }
            | Self::Unknown { original_query, .. } => original_query,
        }
    }

    pub fn from_validation(err: InputValidationError, original_query: &str) -> Self {
        Self::new(ParseErrorKind::Validation, err.to_string(), original_query)
    }

    /// Timeouts become `Timeout`; every other provider rejection is `Api`.
    pub fn from_provider(err: ProviderError, original_query: &str) -> Self {
        if err.is_timeout() {
            return Self::new(
                ParseErrorKind::Timeout,
                format!("AI provider timed out: {err}"),
                original_query,
            );
        }
        Self::new(
            ParseErrorKind::Api,
            format!("AI provider request failed: {err}"),
            original_query,
        )
    }

    /// A failure that never produced a provider result (e.g. a panicking
    /// adapter).
    pub fn unclassified(detail: impl std::fmt::Display, original_query: &str) -> Self {
        Self::new(
            ParseErrorKind::Unknown,
            format!("Unexpected error while parsing query: {detail}"),
            original_query,
        )
    }

    pub fn from_response(err: ResponseError, original_query: &str) -> Self {
        Self::new(
            ParseErrorKind::Api,
            format!("Failed to parse AI response: {err}"),
            original_query,
        )
    }
}

/// Serialized as `{"message", "type", "originalQuery"}`.
impl Serialize for ParseError {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("ParseError", 3)?;
        state.serialize_field("message", self.message())?;
        state.serialize_field("type", &self.kind())?;
        state.serialize_field("originalQuery", self.original_query())?;
        state.end()
    }
}
