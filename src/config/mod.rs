mod file_config;

pub use file_config::{AnalysisConfig, FileConfig};

use crate::analysis::{RetryMode, DEFAULT_BASE_URL, DEFAULT_MODEL, DEFAULT_OUTPUT_LANGUAGE};
use crate::server::{RequestsLoggingLevel, ServerConfig};
use anyhow::{anyhow, bail, Result};
use clap::ValueEnum;

/// Environment variable holding the Gemini API key.
pub const API_KEY_ENV_VAR: &str = "GEMINI_API_KEY";

/// 20 MiB
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

/// CLI arguments that can be used for config resolution.
/// This struct mirrors the CLI arguments that can be overridden by TOML config.
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    pub port: u16,
    pub bind_address: String,
    pub metrics_port: u16,
    pub logging_level: RequestsLoggingLevel,
    pub frontend_dir_path: Option<String>,
    pub gemini_model: Option<String>,
    pub gemini_base_url: Option<String>,
    pub request_timeout_sec: u64,
    pub max_attempts: u32,
    pub max_upload_bytes: usize,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub bind_address: String,
    pub metrics_port: u16,
    pub logging_level: RequestsLoggingLevel,
    pub frontend_dir_path: Option<String>,
    pub max_upload_bytes: usize,

    pub analysis: AnalysisSettings,
}

impl AppConfig {
    /// Resolve configuration from CLI arguments and optional TOML file config.
    /// TOML values override CLI values where present.
    pub fn resolve(cli: &CliConfig, file_config: Option<FileConfig>) -> Result<Self> {
        let file = file_config.unwrap_or_default();

        let port = file.port.unwrap_or(cli.port);
        let bind_address = file
            .bind_address
            .unwrap_or_else(|| cli.bind_address.clone());
        let metrics_port = file.metrics_port.unwrap_or(cli.metrics_port);

        let logging_level = file
            .logging_level
            .and_then(|s| parse_logging_level(&s))
            .unwrap_or_else(|| cli.logging_level.clone());

        let frontend_dir_path = file
            .frontend_dir_path
            .or_else(|| cli.frontend_dir_path.clone());

        let max_upload_bytes = file.max_upload_bytes.unwrap_or(cli.max_upload_bytes);
        if max_upload_bytes == 0 {
            bail!("max_upload_bytes must be greater than 0");
        }

        // Analysis settings - [analysis] table, then CLI, then defaults
        let analysis_file = file.analysis.unwrap_or_default();
        let defaults = AnalysisSettings::default();

        let retry_mode = match analysis_file.retry_mode {
            Some(s) => RetryMode::from_str(&s).ok_or_else(|| {
                anyhow!(
                    "Invalid retry_mode {:?}, expected \"all\" or \"transient_only\"",
                    s
                )
            })?,
            None => defaults.retry_mode,
        };

        let analysis = AnalysisSettings {
            model: analysis_file
                .model
                .or_else(|| cli.gemini_model.clone())
                .unwrap_or(defaults.model),
            base_url: analysis_file
                .base_url
                .or_else(|| cli.gemini_base_url.clone())
                .unwrap_or(defaults.base_url),
            request_timeout_sec: analysis_file
                .request_timeout_sec
                .unwrap_or(cli.request_timeout_sec),
            max_attempts: analysis_file.max_attempts.unwrap_or(cli.max_attempts),
            backoff_unit_ms: analysis_file
                .backoff_unit_ms
                .unwrap_or(defaults.backoff_unit_ms),
            retry_mode,
            output_language: analysis_file
                .output_language
                .unwrap_or(defaults.output_language),
        };

        if analysis.max_attempts == 0 {
            bail!("max_attempts must be at least 1");
        }
        if analysis.request_timeout_sec == 0 {
            bail!("request_timeout_sec must be greater than 0");
        }

        Ok(Self {
            port,
            bind_address,
            metrics_port,
            logging_level,
            frontend_dir_path,
            max_upload_bytes,
            analysis,
        })
    }

    pub fn server_config(&self) -> ServerConfig {
        ServerConfig {
            requests_logging_level: self.logging_level.clone(),
            port: self.port,
            bind_address: self.bind_address.clone(),
            frontend_dir_path: self.frontend_dir_path.clone(),
            max_upload_bytes: self.max_upload_bytes,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AnalysisSettings {
    pub model: String,
    pub base_url: String,
    /// Per-attempt timeout. There is no overall deadline.
    pub request_timeout_sec: u64,
    pub max_attempts: u32,
    pub backoff_unit_ms: u64,
    pub retry_mode: RetryMode,
    pub output_language: String,
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout_sec: 120,
            max_attempts: 5,
            backoff_unit_ms: 1000,
            retry_mode: RetryMode::All,
            output_language: DEFAULT_OUTPUT_LANGUAGE.to_string(),
        }
    }
}

/// Reads the Gemini API key from the process environment.
pub fn read_api_key() -> Result<String> {
    parse_api_key(std::env::var(API_KEY_ENV_VAR).ok())
}

fn parse_api_key(value: Option<String>) -> Result<String> {
    match value.map(|v| v.trim().to_string()) {
        Some(key) if !key.is_empty() => Ok(key),
        _ => bail!("{} not found in environment variables", API_KEY_ENV_VAR),
    }
}

/// Parses a logging level string into RequestsLoggingLevel.
/// Uses clap's ValueEnum trait for parsing.
fn parse_logging_level(s: &str) -> Option<RequestsLoggingLevel> {
    RequestsLoggingLevel::from_str(s, true).ok()
}
