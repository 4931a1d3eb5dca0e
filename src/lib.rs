//! Video Analyzer Server Library
//!
//! Accepts video uploads over HTTP and describes them through a remote
//! multimodal model. The modules are exposed for the binary and for
//! integration tests.

pub mod analysis;
pub mod config;
pub mod server;

// Re-export commonly used types for convenience
pub use analysis::{
    AnalysisError, AnalysisResult, GeminiClient, MediaAnalyzer, RetryPolicy, RetryingAnalyzer,
    UploadedMedia,
};
pub use server::{make_app, run_server, RequestsLoggingLevel, ServerConfig};
