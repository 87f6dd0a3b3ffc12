//! Provider response parsing and validation.
//!
//! Models wrap JSON in markdown fences, return numbers where strings were
//! asked for, and report confidence outside [0, 1]. This module accepts all
//! of that and rejects anything structurally wrong.

use serde_json::{Map, Value};

use crate::error::ResponseError;
use nlq_protocol::{SearchFilter, SearchFilterValue};

/// Validated model output, before the original query is attached.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedResponse {
    pub search_filter: SearchFilter,
    /// Clamped into [0, 1].
    pub confidence: f64,
    pub reasoning: Option<String>,
}

/// Parse raw provider text into a validated response.
pub fn parse_ai_response(text: &str) -> Result<ParsedResponse, ResponseError> {
    let json_str = strip_code_fence(text);
    let value: Value = serde_json::from_str(json_str)?;

    let object = match value {
        Value::Object(object) => object,
        other => return Err(ResponseError::NotAnObject(json_type(&other))),
    };

    let search_filter = match object.get("searchFilter") {
        None | Some(Value::Null) => return Err(ResponseError::MissingSearchFilter),
        Some(Value::Object(fields)) => search_filter(fields)?,
        Some(other) => return Err(ResponseError::InvalidSearchFilter(json_type(other))),
    };

    let confidence = match object.get("confidence") {
        None | Some(Value::Null) => return Err(ResponseError::MissingConfidence),
        Some(Value::Number(n)) => n
            .as_f64()
            .ok_or(ResponseError::InvalidConfidence("number"))?,
        Some(other) => return Err(ResponseError::InvalidConfidence(json_type(other))),
    };

    let reasoning = match object.get("reasoning") {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s.clone()),
        Some(other) => Some(other.to_string()),
    };

    Ok(ParsedResponse {
        search_filter,
        confidence: clamp_confidence(confidence),
        reasoning,
    })
}

/// Clamp a model-reported confidence into [0, 1].
pub fn clamp_confidence(value: f64) -> f64 {
    if value.is_nan() {
        return 0.0;
    }
    value.clamp(0.0, 1.0)
}

/// Strip a code fence wrapping the whole response (an optional `json` tag,
/// any case, may follow the opening backticks). Anything else is returned
/// trimmed but otherwise untouched, backticks inside strings included.
fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(inner) = trimmed
        .strip_prefix("```")
        .and_then(|rest| rest.strip_suffix("```"))
    else {
        return trimmed;
    };
    match inner.get(..4) {
        Some(tag) if tag.eq_ignore_ascii_case("json") => inner[4..].trim(),
        _ => inner.trim(),
    }
}

fn search_filter(fields: &Map<String, Value>) -> Result<SearchFilter, ResponseError> {
    let mut filter = SearchFilter::new();
    for (key, value) in fields {
        let invalid = || ResponseError::InvalidFilterValue { key: key.clone() };
        let entry = match value {
            Value::Null => continue,
            Value::Array(items) => {
                let values = items
                    .iter()
                    .filter(|item| !item.is_null())
                    .map(|item| scalar(item).ok_or_else(invalid))
                    .collect::<Result<Vec<_>, _>>()?;
                SearchFilterValue::Multiple(values)
            }
            other => SearchFilterValue::Single(scalar(other).ok_or_else(invalid)?),
        };
        filter.insert(key.clone(), entry);
    }
    Ok(filter)
}

/// Strings as-is; numbers and booleans in their JSON text form.
fn scalar(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
