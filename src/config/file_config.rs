use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

/// Optional TOML file, every key overrides the matching CLI flag.
///
/// ```toml
/// dsn = "bench:secret@tcp(db.internal:3306)/assets"
/// log_format = "text"
/// max_draws = 50000
/// progress_interval = 1000
/// ```
#[derive(Debug, Deserialize, Default, Clone, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub dsn: Option<String>,
    pub log_format: Option<String>,
    pub max_draws: Option<u64>,
    pub progress_interval: Option<u64>,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        Self::parse(&content).with_context(|| format!("Failed to parse config file: {:?}", path))
    }

    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }
}
