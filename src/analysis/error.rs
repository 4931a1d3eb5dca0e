use thiserror::Error;

/// Errors produced while analyzing a video.
///
/// The first five variants describe a single failed attempt. `Exhausted` and
/// `Unreachable` are terminal and only come out of the retry wrapper.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Request timeout")]
    Timeout,

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Model output is not valid JSON: {0}")]
    InvalidJson(String),

    #[error("AI processing failed: {last_error}")]
    Exhausted {
        attempts: u32,
        last_error: Box<AnalysisError>,
    },

    #[error("Could not reach the AI server after several attempts.")]
    Unreachable,
}

impl AnalysisError {
    /// Whether repeating the same request could plausibly succeed.
    ///
    /// Only consulted in [`RetryMode::TransientOnly`](super::RetryMode);
    /// the default mode retries every attempt failure.
    pub fn is_retryable(&self) -> bool {
        match self {
            AnalysisError::Api { status, .. } => !matches!(status, 400 | 401 | 403 | 404),
            AnalysisError::Exhausted { .. } | AnalysisError::Unreachable => false,
            _ => true,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AnalysisError::Connection(_) => "connection",
            AnalysisError::Timeout => "timeout",
            AnalysisError::Api { .. } => "api",
            AnalysisError::InvalidResponse(_) => "invalid_response",
            AnalysisError::InvalidJson(_) => "invalid_json",
            AnalysisError::Exhausted { .. } => "exhausted",
            AnalysisError::Unreachable => "unreachable",
        }
    }
}

impl From<reqwest::Error> for AnalysisError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            AnalysisError::Timeout
        } else {
            AnalysisError::Connection(err.to_string())
        }
    }
}
