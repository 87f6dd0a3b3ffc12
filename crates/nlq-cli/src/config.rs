//! nlq-search configuration, loadable from TOML.

use serde::Deserialize;

use nlq_parser::ParserConfig;

use crate::ollama::OllamaConfig;

/// Top-level configuration for the `nlq-search` binary.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CliConfig {
    /// JSON filter configuration. None uses the built-in vulnerability filters.
    #[serde(default)]
    pub filter_config_path: Option<String>,
    /// Parser thresholds.
    #[serde(default)]
    pub parser: ParserConfig,
    /// Ollama inference settings.
    #[serde(default)]
    pub ollama: OllamaConfig,
}

impl CliConfig {
    /// Load config from a TOML file path.
    pub fn from_file(path: &str) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&contents)?;
        Ok(config)
    }
}
