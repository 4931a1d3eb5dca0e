use axum::{http::StatusCode, response::IntoResponse};
use lazy_static::lazy_static;
use prometheus::{
    CounterVec, Encoder, Gauge, Histogram, HistogramOpts, HistogramVec, Opts, Registry,
    TextEncoder,
};
use std::time::Duration;

/// Metric name prefix for all video analyzer metrics
const PREFIX: &str = "video_analyzer";

lazy_static! {
    // Global Prometheus registry
    pub static ref REGISTRY: Registry = Registry::new();

    // HTTP Request Metrics
    pub static ref HTTP_REQUESTS_TOTAL: CounterVec = CounterVec::new(
        Opts::new(format!("{PREFIX}_http_requests_total"), "Total number of HTTP requests"),
        &["method", "path", "status"]
    ).expect("Failed to create http_requests_total metric");

    pub static ref HTTP_REQUEST_DURATION_SECONDS: HistogramVec = HistogramVec::new(
        HistogramOpts::new(
            format!("{PREFIX}_http_request_duration_seconds"),
            "HTTP request duration in seconds"
        )
        .buckets(vec![0.001, 0.01, 0.1, 0.5, 1.0, 5.0, 10.0, 30.0, 60.0, 120.0]),
        &["method", "path"]
    ).expect("Failed to create http_request_duration_seconds metric");

    // Analysis Metrics
    pub static ref ANALYSIS_ATTEMPTS_TOTAL: CounterVec = CounterVec::new(
        Opts::new(
            format!("{PREFIX}_analysis_attempts_total"),
            "Calls to the remote model by outcome"
        ),
        &["outcome"]
    ).expect("Failed to create analysis_attempts_total metric");

    pub static ref ANALYSIS_DURATION_SECONDS: HistogramVec = HistogramVec::new(
        HistogramOpts::new(
            format!("{PREFIX}_analysis_duration_seconds"),
            "Time to produce an analysis, retries and backoff included"
        )
        .buckets(vec![1.0, 5.0, 10.0, 30.0, 60.0, 120.0, 300.0, 600.0]),
        &["status"]
    ).expect("Failed to create analysis_duration_seconds metric");

    // Upload Metrics
    pub static ref UPLOADS_REJECTED_TOTAL: CounterVec = CounterVec::new(
        Opts::new(format!("{PREFIX}_uploads_rejected_total"), "Rejected uploads by reason"),
        &["reason"]
    ).expect("Failed to create uploads_rejected_total metric");

    pub static ref UPLOAD_SIZE_BYTES: Histogram = Histogram::with_opts(
        HistogramOpts::new(
            format!("{PREFIX}_upload_size_bytes"),
            "Size of accepted uploads in bytes"
        )
        .buckets(prometheus::exponential_buckets(65536.0, 4.0, 7).unwrap_or_default())
    ).expect("Failed to create upload_size_bytes metric");

    pub static ref PROCESS_MEMORY_BYTES: Gauge = Gauge::new(
        format!("{PREFIX}_process_memory_bytes"),
        "Process memory usage in bytes"
    ).expect("Failed to create process_memory_bytes metric");
}

/// Initialize all metrics and register them with the Prometheus registry
pub fn init_metrics() {
    // Register all metrics - ignore errors if already registered (for tests)
    let _ = REGISTRY.register(Box::new(HTTP_REQUESTS_TOTAL.clone()));
    let _ = REGISTRY.register(Box::new(HTTP_REQUEST_DURATION_SECONDS.clone()));
    let _ = REGISTRY.register(Box::new(ANALYSIS_ATTEMPTS_TOTAL.clone()));
    let _ = REGISTRY.register(Box::new(ANALYSIS_DURATION_SECONDS.clone()));
    let _ = REGISTRY.register(Box::new(UPLOADS_REJECTED_TOTAL.clone()));
    let _ = REGISTRY.register(Box::new(UPLOAD_SIZE_BYTES.clone()));
    let _ = REGISTRY.register(Box::new(PROCESS_MEMORY_BYTES.clone()));

    tracing::info!("Metrics system initialized successfully");
}

/// Record an HTTP request
pub fn record_http_request(method: &str, path: &str, status: u16, duration: Duration) {
    HTTP_REQUESTS_TOTAL
        .with_label_values(&[method, path, &status.to_string()])
        .inc();

    HTTP_REQUEST_DURATION_SECONDS
        .with_label_values(&[method, path])
        .observe(duration.as_secs_f64());
}

/// Record one call to the remote model. `outcome` is "success" or an error label.
pub fn record_analysis_attempt(outcome: &str) {
    ANALYSIS_ATTEMPTS_TOTAL.with_label_values(&[outcome]).inc();
}

/// Record a finished analysis, successful or not
pub fn record_analysis(success: bool, duration: Duration) {
    let status = if success { "success" } else { "failure" };
    ANALYSIS_DURATION_SECONDS
        .with_label_values(&[status])
        .observe(duration.as_secs_f64());
}

/// Record an upload rejected before analysis
pub fn record_upload_rejected(reason: &str) {
    UPLOADS_REJECTED_TOTAL.with_label_values(&[reason]).inc();
}

/// Record the size of an accepted upload
pub fn record_upload_size(bytes: usize) {
    UPLOAD_SIZE_BYTES.observe(bytes as f64);
}

/// Update process memory usage
pub fn update_memory_usage() {
    // Get current process memory usage
    #[cfg(target_os = "linux")]
    {
        if let Ok(status) = std::fs::read_to_string("/proc/self/status") {
            for line in status.lines() {
                if line.starts_with("VmRSS:") {
                    // Parse the RSS (Resident Set Size) in kB
                    if let Some(kb_str) = line.split_whitespace().nth(1) {
                        if let Ok(kb) = kb_str.parse::<f64>() {
                            PROCESS_MEMORY_BYTES.set(kb * 1024.0);
                            return;
                        }
                    }
                }
            }
        }
    }
}

/// Handler for the /metrics endpoint
pub async fn metrics_handler() -> impl IntoResponse {
    update_memory_usage();

    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();

    let mut buffer = vec![];
    match encoder.encode(&metric_families, &mut buffer) {
        Ok(()) => {
            let response = String::from_utf8(buffer).unwrap_or_else(|_| String::from(""));
            (StatusCode::OK, response)
        }
        Err(e) => {
            tracing::error!("Failed to encode metrics: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to encode metrics: {}", e),
            )
        }
    }
}
