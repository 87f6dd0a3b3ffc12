//! Prompt construction.
//!
//! The prompt is the only thing constraining the model's output, so it
//! spells out the exact JSON contract, a confidence rubric and two worked
//! examples before the user's query.

use chrono::NaiveDate;

use crate::schema::get_schema_examples;
use nlq_protocol::FilterSchema;

const TASK_FRAMING: &str = "You are a search query parser for a Kubernetes vulnerability management platform. Your job is to convert a natural-language search query into a structured search filter that uses ONLY the search fields listed below.";

const OUTPUT_CONTRACT: &str = r#"Respond with EXACTLY ONE JSON object and nothing else, in this shape:
{"searchFilter": {"<search term>": "<value>" or ["<value>", "<value>"]}, "confidence": <number between 0.0 and 1.0>, "reasoning": "<one short sentence>"}

- "searchFilter" keys MUST be search terms from the list above (the quoted names), never display names.
- Use an array when the query asks for several values of the same field.
- If nothing in the query maps to a field, return an empty "searchFilter" and a low confidence."#;

const CONFIDENCE_RUBRIC: &str = r#"Confidence calibration:
- High (0.9-1.0): every part of the query maps directly onto listed fields and values.
- Medium (0.7-0.89): the mapping is clear but required a reasonable interpretation (synonyms, relative dates).
- Low (0.5-0.69): parts of the query were ambiguous or could not be mapped.
- Very low (below 0.5): the query is mostly unrelated to the available fields; the filter is a guess."#;

const FORMATTING_RULES: &str = r#"Formatting rules:
- Dates: ISO-8601 (YYYY-MM-DD). Resolve relative phrases ("last week", "since March") against today's date; use a comparison operator for ranges, e.g. ">2024-01-08".
- Numeric fields: prefix the number with a comparison operator (>, >=, <, <=, =), e.g. ">=7.5".
- Enumerated fields: use the listed values exactly, with the same spelling and case.
- Free text fields: copy the relevant words from the query without quotes."#;

const WORKED_EXAMPLES: &str = r#"Example 1
Query: critical CVEs
Output: {"searchFilter": {"Severity": "CRITICAL_VULNERABILITY_SEVERITY"}, "confidence": 0.95, "reasoning": "Critical maps directly to the critical severity value."}

Example 2
Query: fixable important or critical vulnerabilities in nginx images
Output: {"searchFilter": {"Severity": ["IMPORTANT_VULNERABILITY_SEVERITY", "CRITICAL_VULNERABILITY_SEVERITY"], "Fixable": "true", "Image": "nginx"}, "confidence": 0.9, "reasoning": "Two severities, fixable flag and an image name were all explicit."}"#;

const CLOSING_INSTRUCTION: &str =
    "Output the JSON object only. Do not wrap it in markdown and do not add any explanation.";

/// Compose the full completion prompt for an already-sanitized query.
pub fn build_prompt(sanitized_query: &str, schema: &FilterSchema, today: NaiveDate) -> String {
    let examples = get_schema_examples(schema);

    format!(
        "{TASK_FRAMING}\n\n\
         Today's date is {today}.\n\n\
         Available search fields ({description}):\n\
         {examples}\n\
         {OUTPUT_CONTRACT}\n\n\
         {CONFIDENCE_RUBRIC}\n\n\
         {FORMATTING_RULES}\n\n\
         {WORKED_EXAMPLES}\n\n\
         Query: {sanitized_query}\n\n\
         {CLOSING_INSTRUCTION}",
        today = today.format("%Y-%m-%d"),
        description = schema.description,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::build_filter_schema;
    use nlq_protocol::{CompoundSearchFilterAttribute, CompoundSearchFilterEntity, InputType};

    fn prompt_for(query: &str) -> String {
        let config = vec![CompoundSearchFilterEntity::new("Image").attribute(
            CompoundSearchFilterAttribute::new("Name", "Image", InputType::Autocomplete),
        )];
        let schema = build_filter_schema(&config);
        let today = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        build_prompt(query, &schema, today)
    }

    #[test]
    fn includes_query_and_date() {
        let prompt = prompt_for("critical CVEs discovered last week");
        assert!(prompt.contains("Query: critical CVEs discovered last week\n"));
        assert!(prompt.contains("Today's date is 2024-03-15."));
    }

    #[test]
    fn includes_schema_examples() {
        let prompt = prompt_for("nginx");
        assert!(prompt.contains("\"Image\" (Name): free text value"));
        assert!(prompt.contains("\"Severity\" (Severity): one of"));
        assert!(prompt.contains(
            "Available search fields (3 searchable fields across 2 entities: Image, CVE Special Filters):"
        ));
    }

    #[test]
    fn includes_contract_rubric_and_examples() {
        let prompt = prompt_for("nginx");
        assert!(prompt.contains(r#""searchFilter""#));
        assert!(prompt.contains(r#""confidence""#));
        assert!(prompt.contains(r#""reasoning""#));
        for band in ["High (", "Medium (", "Low (", "Very low ("] {
            assert!(prompt.contains(band), "missing rubric band {band}");
        }
        assert!(prompt.contains("Example 1"));
        assert!(prompt.contains("Example 2"));
    }

    #[test]
    fn sections_in_order() {
        let prompt = prompt_for("fixable CVEs");
        let pos = |needle: &str| prompt.find(needle).unwrap();
        assert!(pos("You are a search query parser") < pos("Available search fields"));
        assert!(pos("Available search fields") < pos("Respond with EXACTLY ONE JSON"));
        assert!(pos("Respond with EXACTLY ONE JSON") < pos("Confidence calibration"));
        assert!(pos("Confidence calibration") < pos("Formatting rules"));
        assert!(pos("Formatting rules") < pos("Example 1"));
        assert!(pos("Example 2") < pos("Query: fixable CVEs"));
        assert!(pos("Query: fixable CVEs") < pos("Output the JSON object only"));
        assert!(prompt.ends_with(CLOSING_INSTRUCTION));
    }
}
