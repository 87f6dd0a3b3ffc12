//! Caller-supplied filter configuration (the compound search filter shape
//! used by the vulnerability views).
//!
//! Two legacy shapes exist for select inputs: a flat `options` list and a
//! `groupOptions` list of named groups. Both deserialize into [`InputProps`].

use serde::{Deserialize, Serialize};

/// Full filter configuration: one entry per searchable entity.
pub type CompoundSearchFilterConfig = Vec<CompoundSearchFilterEntity>;

/// Kind of input widget backing a filter attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InputType {
    Autocomplete,
    Text,
    DatePicker,
    ConditionNumber,
    ConditionText,
    Select,
    Unspecified,
    /// Any input type this crate does not know about.
    #[serde(other)]
    Other,
}

impl InputType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Autocomplete => "autocomplete",
            Self::Text => "text",
            Self::DatePicker => "date-picker",
            Self::ConditionNumber => "condition-number",
            Self::ConditionText => "condition-text",
            Self::Select => "select",
            Self::Unspecified => "unspecified",
            Self::Other => "other",
        }
    }
}

impl std::fmt::Display for InputType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A searchable entity (Image, CVE, Deployment, ...) and its attributes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompoundSearchFilterEntity {
    pub display_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_category: Option<String>,
    #[serde(default)]
    pub attributes: Vec<CompoundSearchFilterAttribute>,
}

impl CompoundSearchFilterEntity {
    pub fn new(display_name: impl Into<String>) -> Self {
        Self {
            display_name: display_name.into(),
            search_category: None,
            attributes: Vec::new(),
        }
    }

    /// Append an attribute (builder style).
    pub fn attribute(mut self, attribute: CompoundSearchFilterAttribute) -> Self {
        self.attributes.push(attribute);
        self
    }
}

/// One filterable field of an entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompoundSearchFilterAttribute {
    pub display_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter_chip_label: Option<String>,
    /// Canonical backend field name.
    pub search_term: String,
    pub input_type: InputType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_props: Option<InputProps>,
}

impl CompoundSearchFilterAttribute {
    pub fn new(
        display_name: impl Into<String>,
        search_term: impl Into<String>,
        input_type: InputType,
    ) -> Self {
        Self {
            display_name: display_name.into(),
            filter_chip_label: None,
            search_term: search_term.into(),
            input_type,
            input_props: None,
        }
    }

    /// Attach a flat option list, using each value as its own label.
    pub fn with_options<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let props = self.input_props.get_or_insert_with(InputProps::default);
        props.options = values.into_iter().map(SelectOption::from_value).collect();
        self
    }

    /// Attach grouped options.
    pub fn with_group_options(mut self, groups: Vec<SelectOptionGroup>) -> Self {
        let props = self.input_props.get_or_insert_with(InputProps::default);
        props.group_options = groups;
        self
    }
}

/// Widget-specific properties. Only the option lists matter here; any other
/// keys present in the source configuration are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InputProps {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<SelectOption>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub group_options: Vec<SelectOptionGroup>,
}

/// A selectable option: `label` is shown to users, `value` is sent to the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectOption {
    pub label: String,
    pub value: String,
}

impl SelectOption {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }

    pub fn from_value(value: impl Into<String>) -> Self {
        let value = value.into();
        Self {
            label: value.clone(),
            value,
        }
    }
}

/// A named group of options (e.g. "Image" / "Node" component sources).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectOptionGroup {
    pub name: String,
    #[serde(default)]
    pub options: Vec<SelectOption>,
}

impl SelectOptionGroup {
    pub fn new(name: impl Into<String>, options: Vec<SelectOption>) -> Self {
        Self {
            name: name.into(),
            options,
        }
    }
}
