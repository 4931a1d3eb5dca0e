use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct FileConfig {
    // Core settings (can override CLI)
    pub port: Option<u16>,
    pub bind_address: Option<String>,
    pub metrics_port: Option<u16>,
    pub logging_level: Option<String>,
    pub frontend_dir_path: Option<String>,
    pub max_upload_bytes: Option<usize>,

    pub analysis: Option<AnalysisConfig>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
pub struct AnalysisConfig {
    pub model: Option<String>,
    pub base_url: Option<String>,
    pub request_timeout_sec: Option<u64>,
    pub max_attempts: Option<u32>,
    /// Base unit of the exponential backoff, in milliseconds.
    pub backoff_unit_ms: Option<u64>,
    /// "all" or "transient_only"
    pub retry_mode: Option<String>,
    pub output_language: Option<String>,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        toml::from_str(&content).with_context(|| format!("Failed to parse config file: {:?}", path))
    }
}
