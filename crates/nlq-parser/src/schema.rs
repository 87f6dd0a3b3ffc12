//! Filter schema builder.
//!
//! Converts the caller's compound filter configuration into the
//! [`FilterSchema`] the prompt is built from, and renders the per-field
//! usage hints embedded verbatim in that prompt.

use std::fmt::Write;

use nlq_protocol::{
    CompoundSearchFilterAttribute, CompoundSearchFilterEntity, FilterAttributeSchema,
    FilterEntitySchema, FilterSchema, InputProps, InputType,
};

/// Display name of the synthetic entity appended for CVE-specific fields.
pub const SPECIAL_FILTERS_ENTITY: &str = "CVE Special Filters";

/// Severity values understood by the vulnerability backend.
pub const SEVERITY_OPTIONS: &[&str] = &[
    "CRITICAL_VULNERABILITY_SEVERITY",
    "IMPORTANT_VULNERABILITY_SEVERITY",
    "MODERATE_VULNERABILITY_SEVERITY",
    "LOW_VULNERABILITY_SEVERITY",
];

pub const FIXABLE_OPTIONS: &[&str] = &["true", "false"];

/// Enum hints list at most this many options before truncating.
const OPTION_PREVIEW_LIMIT: usize = 5;

/// Build the schema, including the CVE special filters.
pub fn build_filter_schema(config: &[CompoundSearchFilterEntity]) -> FilterSchema {
    build_filter_schema_with(config, true)
}

/// Build the schema, optionally appending the CVE special filters entity.
///
/// Severity and fixability are not part of the generic filter
/// configuration, but the model needs them to answer most CVE queries.
pub fn build_filter_schema_with(
    config: &[CompoundSearchFilterEntity],
    include_special_filters: bool,
) -> FilterSchema {
    let mut entities: Vec<FilterEntitySchema> = config.iter().map(entity_schema).collect();

    if include_special_filters {
        entities.push(special_filters());
    }

    let description = describe(&entities);
    FilterSchema {
        entities,
        description,
    }
}

/// Render type-aware usage hints for every attribute, grouped by entity.
pub fn get_schema_examples(schema: &FilterSchema) -> String {
    let mut out = String::new();
    for entity in &schema.entities {
        let _ = writeln!(out, "{}:", entity.display_name);
        for attr in &entity.attributes {
            let _ = writeln!(
                out,
                "  - \"{}\" ({}): {}",
                attr.search_term,
                attr.display_name,
                attribute_hint(attr)
            );
        }
    }
    out
}

fn entity_schema(entity: &CompoundSearchFilterEntity) -> FilterEntitySchema {
    FilterEntitySchema {
        display_name: entity.display_name.clone(),
        attributes: entity.attributes.iter().map(attribute_schema).collect(),
    }
}

fn attribute_schema(attr: &CompoundSearchFilterAttribute) -> FilterAttributeSchema {
    let options = match attr.input_type {
        InputType::Select => Some(
            attr.input_props
                .as_ref()
                .map(option_values)
                .unwrap_or_default(),
        ),
        _ => None,
    };

    FilterAttributeSchema {
        display_name: attr.display_name.clone(),
        search_term: attr.search_term.clone(),
        input_type: attr.input_type,
        options,
    }
}

/// Option values from either legacy shape. Grouped options win when both are set.
fn option_values(props: &InputProps) -> Vec<String> {
    if !props.group_options.is_empty() {
        return props
            .group_options
            .iter()
            .flat_map(|group| group.options.iter())
            .map(|option| option.value.clone())
            .collect();
    }
    props
        .options
        .iter()
        .map(|option| option.value.clone())
        .collect()
}

fn special_filters() -> FilterEntitySchema {
    let select = |display_name: &str, values: &[&str]| FilterAttributeSchema {
        display_name: display_name.to_string(),
        search_term: display_name.to_string(),
        input_type: InputType::Select,
        options: Some(values.iter().map(|v| v.to_string()).collect()),
    };

    FilterEntitySchema {
        display_name: SPECIAL_FILTERS_ENTITY.to_string(),
        attributes: vec![
            select("Severity", SEVERITY_OPTIONS),
            select("Fixable", FIXABLE_OPTIONS),
        ],
    }
}

fn describe(entities: &[FilterEntitySchema]) -> String {
    if entities.is_empty() {
        return "No searchable fields are available.".to_string();
    }
    let names: Vec<&str> = entities.iter().map(|e| e.display_name.as_str()).collect();
    let fields: usize = entities.iter().map(|e| e.attributes.len()).sum();
    format!(
        "{fields} searchable {} across {} {}: {}",
        plural(fields, "field", "fields"),
        entities.len(),
        plural(entities.len(), "entity", "entities"),
        names.join(", ")
    )
}

fn plural<'a>(count: usize, one: &'a str, many: &'a str) -> &'a str {
    if count == 1 { one } else { many }
}

fn attribute_hint(attr: &FilterAttributeSchema) -> String {
    match attr.input_type {
        InputType::DatePicker => {
            "date; accepts ISO-8601 dates (YYYY-MM-DD), e.g. \"2024-01-15\"".to_string()
        }
        InputType::ConditionNumber => {
            "number with comparison operator (>, >=, <, <=, =), e.g. \">7.0\"".to_string()
        }
        InputType::Select => match attr.options.as_deref() {
            Some(options) if !options.is_empty() => {
                format!("one of {}", option_preview(options))
            }
            _ => "exact value from the allowed list".to_string(),
        },
        InputType::ConditionText => {
            "text with optional comparison operator, e.g. \">=1.2.3\"".to_string()
        }
        _ => "free text value".to_string(),
    }
}

fn option_preview(options: &[String]) -> String {
    let shown: Vec<String> = options
        .iter()
        .take(OPTION_PREVIEW_LIMIT)
        .map(|o| format!("\"{o}\""))
        .collect();
    let mut preview = shown.join(", ");
    if options.len() > OPTION_PREVIEW_LIMIT {
        let _ = write!(preview, " (+{} more)", options.len() - OPTION_PREVIEW_LIMIT);
    }
    preview
}
