//! Pipeline outputs: the search filter handed to the query layer and the
//! error kinds reported to callers.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Search term -> value(s). Keys are backend search terms.
pub type SearchFilter = BTreeMap<String, SearchFilterValue>;

/// A single value or a list of alternatives for one search term.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SearchFilterValue {
    Single(String),
    Multiple(Vec<String>),
}

impl SearchFilterValue {
    /// All values as a slice-like list, regardless of shape.
    pub fn values(&self) -> Vec<&str> {
        match self {
            Self::Single(v) => vec![v.as_str()],
            Self::Multiple(vs) => vs.iter().map(String::as_str).collect(),
        }
    }
}

impl From<&str> for SearchFilterValue {
    fn from(value: &str) -> Self {
        Self::Single(value.to_string())
    }
}

impl From<String> for SearchFilterValue {
    fn from(value: String) -> Self {
        Self::Single(value)
    }
}

impl From<Vec<String>> for SearchFilterValue {
    fn from(values: Vec<String>) -> Self {
        Self::Multiple(values)
    }
}

/// Successful parse of a natural-language query.
///
/// A result below the configured confidence threshold is still a
/// `ParseResult`; callers decide how to present the uncertainty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParseResult {
    pub search_filter: SearchFilter,
    /// Always within [0, 1].
    pub confidence: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reasoning: Option<String>,
    /// The query exactly as the caller supplied it.
    pub original_query: String,
}

/// Closed failure taxonomy of the parsing pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParseErrorKind {
    /// Empty, too long, or empty after sanitization.
    Validation,
    /// Provider exceeded its configured duration.
    Timeout,
    /// Provider failure or malformed/schema-invalid response.
    Api,
    /// Anything not classified above.
    Unknown,
}

impl ParseErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Validation => "validation",
            Self::Timeout => "timeout",
            Self::Api => "api",
            Self::Unknown => "unknown",
        }
    }

    /// Whether retrying the same query can reasonably succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Timeout | Self::Api)
    }
}

impl std::fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_result_uses_camel_case() {
        let mut filter = SearchFilter::new();
        filter.insert("Severity".into(), "CRITICAL_VULNERABILITY_SEVERITY".into());
        let result = ParseResult {
            search_filter: filter,
            confidence: 0.95,
            reasoning: None,
            original_query: "critical CVEs".into(),
        };
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(
            json["searchFilter"]["Severity"],
            "CRITICAL_VULNERABILITY_SEVERITY"
        );
        assert_eq!(json["originalQuery"], "critical CVEs");
        assert!(json.get("reasoning").is_none()); // skip_serializing_if = None
    }

    #[test]
    fn filter_value_accepts_string_or_list() {
        let single: SearchFilterValue = serde_json::from_str(r#""nginx""#).unwrap();
        assert_eq!(single, SearchFilterValue::Single("nginx".into()));

        let many: SearchFilterValue = serde_json::from_str(r#"["a", "b"]"#).unwrap();
        assert_eq!(many.values(), vec!["a", "b"]);
    }

    #[test]
    fn error_kind_serialization() {
        assert_eq!(
            serde_json::to_string(&ParseErrorKind::Validation).unwrap(),
            r#""validation""#
        );
        assert_eq!(ParseErrorKind::Api.to_string(), "api");
    }

    #[test]
    fn retryable_kinds() {
        assert!(ParseErrorKind::Timeout.is_retryable());
        assert!(ParseErrorKind::Api.is_retryable());
        assert!(!ParseErrorKind::Validation.is_retryable());
        assert!(!ParseErrorKind::Unknown.is_retryable());
    }
}
