//! Video analysis through a remote multimodal model.
//!
//! The [`MediaAnalyzer`] trait is the capability the HTTP layer depends on.
//! [`GeminiClient`] performs a single request against the Gemini
//! `generateContent` API, and [`RetryingAnalyzer`] wraps any analyzer with a
//! bounded exponential backoff.

mod analyzer;
mod error;
mod gemini;
mod models;
mod prompt;
mod retry;

pub use analyzer::MediaAnalyzer;
#[cfg(any(test, feature = "mock"))]
pub use analyzer::MockMediaAnalyzer;
pub use error::AnalysisError;
pub use gemini::{GeminiClient, DEFAULT_BASE_URL, DEFAULT_MODEL};
pub use models::{AnalysisRequest, AnalysisResult, UploadedMedia};
pub use prompt::{AnalysisPrompt, DEFAULT_OUTPUT_LANGUAGE, USER_INSTRUCTION};
pub use retry::{RetryMode, RetryPolicy, RetryState, RetryingAnalyzer};
