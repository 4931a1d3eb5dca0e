//! Test server lifecycle management
//!
//! This module manages spawning and shutting down test HTTP servers.
//! Each test gets an isolated server with its own analyzer.

use super::constants::*;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use video_analyzer_server::analysis::{GeminiClient, MediaAnalyzer, RetryPolicy, RetryingAnalyzer};
use video_analyzer_server::config::AnalysisSettings;
use video_analyzer_server::server::{make_app, RequestsLoggingLevel, ServerConfig};

/// Test server instance
///
/// When dropped, the server gracefully shuts down.
pub struct TestServer {
    /// Base URL for making requests (e.g., "http://127.0.0.1:12345")
    pub base_url: String,

    /// The port the server is listening on
    #[allow(dead_code)]
    pub port: u16,

    // Private fields - keep resources alive until drop
    _shutdown_tx: Option<tokio::sync::oneshot::Sender<()>>,
}

impl TestServer {
    /// Spawns a new test server on a random port, analyzing with `analyzer`
    ///
    /// # Panics
    ///
    /// Panics if:
    /// - Port binding fails
    /// - Server fails to start
    /// - Server doesn't become ready within timeout
    pub async fn spawn_with(analyzer: Arc<dyn MediaAnalyzer>) -> Self {
        // Bind to random port
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind to random port");

        let port = listener
            .local_addr()
            .expect("Failed to get local address")
            .port();

        let base_url = format!("http://127.0.0.1:{}", port);

        // Create shutdown channel
        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();

        let config = ServerConfig {
            port,
            bind_address: "127.0.0.1".to_string(),
            requests_logging_level: RequestsLoggingLevel::None,
            frontend_dir_path: None,
            max_upload_bytes: MAX_UPLOAD_BYTES,
        };

        let app = make_app(config, analyzer);

        // Spawn server in background task with graceful shutdown
        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    shutdown_rx.await.ok();
                })
                .await
                .expect("Server failed");
        });

        let server = Self {
            base_url,
            port,
            _shutdown_tx: Some(shutdown_tx),
        };

        server.wait_for_ready().await;

        server
    }

    /// Spawns a server wired like production: a retrying Gemini client
    /// pointed at `gemini_base_url`, with a millisecond backoff unit.
    #[allow(dead_code)]
    pub async fn spawn_with_gemini(gemini_base_url: &str, max_attempts: u32) -> Self {
        let settings = AnalysisSettings {
            model: TEST_MODEL.to_string(),
            base_url: gemini_base_url.to_string(),
            request_timeout_sec: 5,
            max_attempts,
            backoff_unit_ms: TEST_BACKOFF_UNIT_MS,
            ..Default::default()
        };
        let gemini =
            GeminiClient::new(TEST_API_KEY, &settings).expect("Failed to build Gemini client");
        let analyzer = RetryingAnalyzer::new(Arc::new(gemini), RetryPolicy::new(&settings));

        Self::spawn_with(Arc::new(analyzer)).await
    }

    /// Waits for the server to become ready by polling the /health endpoint
    async fn wait_for_ready(&self) {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(100))
            .build()
            .expect("Failed to build reqwest client");

        let start = std::time::Instant::now();
        let timeout = Duration::from_millis(SERVER_READY_TIMEOUT_MS);

        loop {
            if start.elapsed() > timeout {
                panic!(
                    "Server did not become ready within {}ms",
                    SERVER_READY_TIMEOUT_MS
                );
            }

            match client.get(format!("{}/health", self.base_url)).send().await {
                Ok(response) if response.status().is_success() => return,
                _ => {
                    tokio::time::sleep(Duration::from_millis(SERVER_READY_POLL_INTERVAL_MS)).await;
                }
            }
        }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(tx) = self._shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}
