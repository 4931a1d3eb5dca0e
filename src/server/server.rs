use anyhow::{Context, Result};
use std::future::Future;
use std::time::Duration;

use axum::{
    extract::State,
    middleware,
    response::{Html, IntoResponse},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tracing::{error, info};

use super::analyze_routes::make_analyze_routes;
use super::metrics::metrics_handler;
use super::state::{GuardedAnalyzer, ServerState};
use super::{log_requests, ServerConfig};

const INDEX_HTML: &str = include_str!("../../static/index.html");

#[derive(Serialize)]
struct ServerStats {
    pub status: &'static str,
    pub uptime: String,
    pub hash: String,
}

fn format_uptime(duration: Duration) -> String {
    let total_seconds = duration.as_secs();

    let days = total_seconds / 86_400;
    let hours = (total_seconds % 86_400) / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    format!("{}d {:02}:{:02}:{:02}", days, hours, minutes, seconds)
}

async fn index_page() -> Html<&'static str> {
    Html(INDEX_HTML)
}

async fn health(State(state): State<ServerState>) -> impl IntoResponse {
    Json(ServerStats {
        status: "ok",
        uptime: format_uptime(state.start_time.elapsed()),
        hash: state.hash.clone(),
    })
}

pub fn make_app(config: ServerConfig, analyzer: GuardedAnalyzer) -> Router {
    let state = ServerState::new(config.clone(), analyzer);

    let home_router: Router = match config.frontend_dir_path {
        Some(frontend_path) => {
            let static_files_service =
                ServeDir::new(frontend_path).append_index_html_on_directories(true);
            Router::new().fallback_service(static_files_service)
        }
        None => Router::new().route("/", get(index_page)),
    };

    let health_routes: Router = Router::new()
        .route("/health", get(health))
        .with_state(state.clone());

    home_router
        .merge(health_routes)
        .merge(make_analyze_routes(state.clone()))
        .layer(CorsLayer::permissive())
        .layer(middleware::from_fn_with_state(state, log_requests))
}

async fn serve_metrics(bind_address: &str, metrics_port: u16) -> Result<()> {
    let metrics_app = Router::new().route("/metrics", get(metrics_handler));
    let listener = tokio::net::TcpListener::bind(format!("{}:{}", bind_address, metrics_port))
        .await
        .with_context(|| format!("Failed to bind metrics port {}", metrics_port))?;

    tokio::spawn(async move {
        if let Err(err) = axum::serve(listener, metrics_app).await {
            error!("Metrics server stopped: {}", err);
        }
    });
    Ok(())
}

/// Serves the app until `shutdown` resolves. A `metrics_port` of 0 disables
/// the metrics listener.
pub async fn run_server<F>(
    config: ServerConfig,
    analyzer: GuardedAnalyzer,
    metrics_port: u16,
    shutdown: F,
) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    if metrics_port != 0 {
        serve_metrics(&config.bind_address, metrics_port).await?;
        info!("Metrics available at port {}!", metrics_port);
    }

    let address = format!("{}:{}", config.bind_address, config.port);
    let app = make_app(config, analyzer);

    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {}", address))?;
    info!("Ready to serve at {}!", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;
    info!("HTTP server stopped");
    Ok(())
}
