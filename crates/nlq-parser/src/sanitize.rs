//! Input gate applied to user text before it reaches any provider.
//!
//! - Trims surrounding whitespace
//! - Rejects empty and over-long input
//! - Strips tag-shaped markup (`<...>`)
//! - Escapes `<`, `>`, `'` and `"` so nothing markup-like survives
//!
//! Regex stripping is best-effort, not an HTML tokenizer. The result only
//! ever goes into a completion prompt.

use regex::Regex;
use serde::Deserialize;
use std::sync::LazyLock;

use crate::error::InputValidationError;

/// Default maximum query length in characters.
pub const DEFAULT_MAX_LENGTH: usize = 500;

static RE_TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").unwrap());

/// Characters escaped after stripping, with their entity replacements.
const ESCAPES: &[(char, &str)] = &[
    ('<', "&lt;"),
    ('>', "&gt;"),
    ('\'', "&#x27;"),
    ('"', "&quot;"),
];

/// Sanitization options. Missing fields fall back to the defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct SanitizationConfig {
    #[serde(default = "default_max_length")]
    pub max_length: usize,
    #[serde(default = "default_true")]
    pub strip_html: bool,
    #[serde(default = "default_true")]
    pub trim: bool,
}

fn default_max_length() -> usize {
    DEFAULT_MAX_LENGTH
}
fn default_true() -> bool {
    true
}

impl Default for SanitizationConfig {
    fn default() -> Self {
        Self {
            max_length: default_max_length(),
            strip_html: true,
            trim: true,
        }
    }
}

impl SanitizationConfig {
    /// Defaults with a different length limit.
    pub fn with_max_length(max_length: usize) -> Self {
        Self {
            max_length,
            ..Self::default()
        }
    }
}

/// Validate and normalize raw user input.
pub fn sanitize_input(
    input: &str,
    config: &SanitizationConfig,
) -> Result<String, InputValidationError> {
    let text = if config.trim { input.trim() } else { input };

    if text.is_empty() {
        return Err(InputValidationError::Empty);
    }

    let length = text.chars().count();
    if length > config.max_length {
        return Err(InputValidationError::TooLong {
            limit: config.max_length,
            actual: length,
        });
    }

    let stripped = if config.strip_html {
        RE_TAG.replace_all(text, "")
    } else {
        text.into()
    };

    let escaped = escape(&stripped);
    let sanitized = if config.trim {
        escaped.trim().to_string()
    } else {
        escaped
    };

    // Input that was entirely markup
    if sanitized.is_empty() {
        return Err(InputValidationError::EmptyAfterSanitization);
    }

    Ok(sanitized)
}

/// Non-failing probe: `false` exactly when [`sanitize_input`] would fail.
pub fn is_valid_input(input: &str, config: &SanitizationConfig) -> bool {
    sanitize_input(input, config).is_ok()
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match ESCAPES.iter().find(|(raw, _)| *raw == c) {
            Some((_, entity)) => out.push_str(entity),
            None => out.push(c),
        }
    }
    out
}
