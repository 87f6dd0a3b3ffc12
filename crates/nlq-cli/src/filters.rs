//! Filter configuration sources: the built-in vulnerability filters and JSON
//! files in the same camelCase shape.

use nlq_protocol::{
    CompoundSearchFilterAttribute as Attribute, CompoundSearchFilterConfig,
    CompoundSearchFilterEntity as Entity, InputType, SelectOption, SelectOptionGroup,
};

/// Component sources, grouped the way the vulnerability views show them.
fn component_source_groups() -> Vec<SelectOptionGroup> {
    let group = |name: &str, values: &[(&str, &str)]| {
        SelectOptionGroup::new(
            name,
            values
                .iter()
                .map(|(label, value)| SelectOption::new(*label, *value))
                .collect(),
        )
    };
    vec![
        group("Operating system", &[("OS", "OS")]),
        group(
            "Language",
            &[
                ("Python", "PYTHON"),
                ("Java", "JAVA"),
                ("Ruby", "RUBY"),
                ("Node.js", "NODEJS"),
                ("Go", "GO"),
                (".NET Core", "DOTNETCORERUNTIME"),
            ],
        ),
        group("Other", &[("Infrastructure", "INFRASTRUCTURE")]),
    ]
}

/// Filters for the workload vulnerability views.
pub fn default_filter_config() -> CompoundSearchFilterConfig {
    vec![
        Entity::new("Image")
            .attribute(Attribute::new("Name", "Image", InputType::Autocomplete))
            .attribute(Attribute::new(
                "Operating system",
                "Image OS",
                InputType::Autocomplete,
            ))
            .attribute(Attribute::new("Tag", "Image Tag", InputType::Text))
            .attribute(Attribute::new("Label", "Image Label", InputType::Autocomplete))
            .attribute(Attribute::new(
                "Registry",
                "Image Registry",
                InputType::Text,
            ))
            .attribute(Attribute::new(
                "Created",
                "Image Created Time",
                InputType::DatePicker,
            ))
            .attribute(Attribute::new(
                "Scan time",
                "Image Scan Time",
                InputType::DatePicker,
            )),
        Entity::new("Image CVE")
            .attribute(Attribute::new("Name", "CVE", InputType::Autocomplete))
            .attribute(Attribute::new(
                "Discovered time",
                "CVE Created Time",
                InputType::DatePicker,
            ))
            .attribute(Attribute::new("CVSS", "CVSS", InputType::ConditionNumber)),
        Entity::new("Image Component")
            .attribute(Attribute::new("Name", "Component", InputType::Autocomplete))
            .attribute(Attribute::new(
                "Version",
                "Component Version",
                InputType::Text,
            ))
            .attribute(
                Attribute::new("Source", "Component Source", InputType::Select)
                    .with_group_options(component_source_groups()),
            ),
        Entity::new("Deployment")
            .attribute(Attribute::new("Name", "Deployment", InputType::Autocomplete))
            .attribute(Attribute::new(
                "Label",
                "Deployment Label",
                InputType::Autocomplete,
            ))
            .attribute(
                Attribute::new("Status", "Inactive Deployment", InputType::Select)
                    .with_options(["true", "false"]),
            ),
        Entity::new("Namespace")
            .attribute(Attribute::new("Name", "Namespace", InputType::Autocomplete))
            .attribute(Attribute::new(
                "Label",
                "Namespace Label",
                InputType::Autocomplete,
            )),
        Entity::new("Cluster")
            .attribute(Attribute::new("Name", "Cluster", InputType::Autocomplete))
            .attribute(Attribute::new(
                "Label",
                "Cluster Label",
                InputType::Autocomplete,
            ))
            .attribute(Attribute::new(
                "Platform type",
                "Cluster Platform Type",
                InputType::Text,
            )),
    ]
}

/// Load a filter configuration from a JSON file.
pub fn load_filter_config(path: &str) -> anyhow::Result<CompoundSearchFilterConfig> {
    let contents = std::fs::read_to_string(path)?;
    let config: CompoundSearchFilterConfig = serde_json::from_str(&contents)?;
    Ok(config)
}

/// The configured file if one is named, the built-in filters otherwise.
pub fn resolve_filter_config(path: Option<&str>) -> anyhow::Result<CompoundSearchFilterConfig> {
    match path {
        Some(path) => load_filter_config(path),
        None => Ok(default_filter_config()),
    }
}
