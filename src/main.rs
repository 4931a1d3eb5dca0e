use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, level_filters::LevelFilter, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use video_analyzer_server::analysis::{GeminiClient, MediaAnalyzer, RetryPolicy, RetryingAnalyzer};
use video_analyzer_server::config::{self, DEFAULT_MAX_UPLOAD_BYTES};
use video_analyzer_server::server::{metrics, run_server, RequestsLoggingLevel};

fn parse_path(s: &str) -> Result<PathBuf, String> {
    let path_buf = PathBuf::from(s);
    if path_buf.is_absolute() {
        return Ok(path_buf);
    }
    let cwd = std::env::current_dir().map_err(|e| format!("Failed to get current dir: {}", e))?;
    Ok(cwd.join(path_buf))
}

#[derive(Parser, Debug)]
struct CliArgs {
    /// Path to TOML configuration file. Values in the file override CLI arguments.
    #[clap(long, value_parser = parse_path)]
    pub config: Option<PathBuf>,

    /// The port to listen on.
    #[clap(short, long, default_value_t = 8000)]
    pub port: u16,

    /// The address to bind to.
    #[clap(long, default_value = "0.0.0.0")]
    pub bind_address: String,

    /// The port for the metrics server (Prometheus scraping). Set to 0 to disable.
    #[clap(long, default_value_t = 9091)]
    pub metrics_port: u16,

    /// The level of logging to perform on each request.
    #[clap(long, default_value = "path")]
    pub logging_level: RequestsLoggingLevel,

    /// Path to a frontend directory to serve instead of the built-in page.
    #[clap(long)]
    pub frontend_dir_path: Option<String>,

    /// Gemini model used for the analysis.
    #[clap(long)]
    pub gemini_model: Option<String>,

    /// Base URL of the Gemini REST API.
    #[clap(long)]
    pub gemini_base_url: Option<String>,

    /// Timeout in seconds for a single request to the model.
    #[clap(long, default_value_t = 120)]
    pub request_timeout_sec: u64,

    /// Number of attempts per analysis, the first one included.
    #[clap(long, default_value_t = 5)]
    pub max_attempts: u32,

    /// Largest accepted upload, in bytes.
    #[clap(long, default_value_t = DEFAULT_MAX_UPLOAD_BYTES)]
    pub max_upload_bytes: usize,
}

/// Convert CLI args to CliConfig for config resolution
impl From<&CliArgs> for config::CliConfig {
    fn from(args: &CliArgs) -> Self {
        config::CliConfig {
            port: args.port,
            bind_address: args.bind_address.clone(),
            metrics_port: args.metrics_port,
            logging_level: args.logging_level.clone(),
            frontend_dir_path: args.frontend_dir_path.clone(),
            gemini_model: args.gemini_model.clone(),
            gemini_base_url: args.gemini_base_url.clone(),
            request_timeout_sec: args.request_timeout_sec,
            max_attempts: args.max_attempts,
            max_upload_bytes: args.max_upload_bytes,
        }
    }
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Received Ctrl+C, initiating graceful shutdown"),
        Err(err) => warn!("Failed to listen for Ctrl+C: {}", err),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli_args = CliArgs::parse();

    // Before the subscriber, so LOG_LEVEL can come from .env
    let dotenv_path = dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .with_env_var("LOG_LEVEL")
                .from_env_lossy(),
        )
        .try_init()
        .context("Failed to initialize logging")?;

    if let Some(path) = dotenv_path {
        info!("Loaded environment from {:?}", path);
    }
    let api_key = config::read_api_key()?;

    // Load TOML config if provided
    let file_config = match &cli_args.config {
        Some(path) => {
            info!("Loading configuration from {:?}", path);
            Some(config::FileConfig::load(path)?)
        }
        None => None,
    };

    // Resolve final configuration (TOML overrides CLI)
    let cli_config: config::CliConfig = (&cli_args).into();
    let app_config = config::AppConfig::resolve(&cli_config, file_config)?;

    info!("Configuration loaded:");
    info!("  bind: {}:{}", app_config.bind_address, app_config.port);
    info!("  model: {}", app_config.analysis.model);
    info!(
        "  attempts: {} ({} retry mode)",
        app_config.analysis.max_attempts,
        app_config.analysis.retry_mode.as_str()
    );
    info!(
        "  max upload: {:#}",
        byte_unit::Byte::from(app_config.max_upload_bytes)
    );

    info!("Initializing metrics...");
    metrics::init_metrics();

    let gemini = GeminiClient::new(api_key, &app_config.analysis)?;
    let policy = RetryPolicy::new(&app_config.analysis);
    let analyzer: Arc<dyn MediaAnalyzer> =
        Arc::new(RetryingAnalyzer::new(Arc::new(gemini), policy));

    run_server(
        app_config.server_config(),
        analyzer,
        app_config.metrics_port,
        shutdown_signal(),
    )
    .await
}
