//! Library crate behind the `nlq-search` binary.
//!
//! Exposes configuration loading, the Ollama provider adapter and the
//! built-in filter configuration so `nlq-e2e-tests` can drive them directly.

pub mod config;
pub mod filters;
pub mod ollama;
