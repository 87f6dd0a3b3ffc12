//! Natural-language search filter parsing.
//!
//! Turns free text ("critical CVEs discovered last week") into a validated
//! `SearchFilter` by asking a text-completion provider and checking what
//! comes back:
//!
//! sanitize -> build schema -> build prompt -> provider -> parse/validate.
//!
//! The provider is injected through the [`AiProvider`] trait so the pipeline
//! can be driven by a mock in tests and by any HTTP adapter in production.

pub mod cancellable;
pub mod error;
pub mod mock;
pub mod prompt;
pub mod provider;
pub mod response;
pub mod sanitize;
pub mod schema;
pub mod service;

// Re-export key types for convenience
pub use cancellable::{CancelHandle, CancellableError, CancellableRequest, make_cancellable};
pub use error::{InputValidationError, ParseError, ProviderError, ResponseError};
pub use mock::MockProvider;
pub use provider::{AiProvider, Completion};
pub use sanitize::{SanitizationConfig, is_valid_input, sanitize_input};
pub use schema::{build_filter_schema, build_filter_schema_with, get_schema_examples};
pub use service::{AiSearchParser, ParserConfig};
