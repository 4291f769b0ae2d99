use anyhow::{Context, Result};
use graph_layout::{RelaxationConfig, SeedConfig};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Settings read from the optional RON config file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub layout: RelaxationConfig,
    pub seed: SeedConfig,
}

impl AppConfig {
    /// Load the config at `path`, or the defaults when there is none
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };

        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("Invalid config {}", path.display()))
    }

    pub fn parse(text: &str) -> Result<Self, ron::error::SpannedError> {
        ron::from_str(text)
    }
}
