//! Normalized schema of searchable fields, derived from a filter configuration.

use serde::{Deserialize, Serialize};

use crate::filter_config::InputType;

/// One searchable field as presented to the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterAttributeSchema {
    pub display_name: String,
    /// Canonical backend field name; the only valid key in a search filter.
    pub search_term: String,
    pub input_type: InputType,
    /// Allowed values. Present only for enumerable inputs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterEntitySchema {
    pub display_name: String,
    pub attributes: Vec<FilterAttributeSchema>,
}

/// All searchable fields plus a one-line summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterSchema {
    pub entities: Vec<FilterEntitySchema>,
    pub description: String,
}

impl FilterSchema {
    /// Total number of attributes across all entities.
    pub fn attribute_count(&self) -> usize {
        self.entities.iter().map(|e| e.attributes.len()).sum()
    }

    /// Every search term in declaration order.
    pub fn search_terms(&self) -> impl Iterator<Item = &str> {
        self.entities
            .iter()
            .flat_map(|e| e.attributes.iter())
            .map(|a| a.search_term.as_str())
    }

    pub fn entity(&self, display_name: &str) -> Option<&FilterEntitySchema> {
        self.entities.iter().find(|e| e.display_name == display_name)
    }
}

impl FilterEntitySchema {
    pub fn attribute(&self, search_term: &str) -> Option<&FilterAttributeSchema> {
        self.attributes.iter().find(|a| a.search_term == search_term)
    }
}
