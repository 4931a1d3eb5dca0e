//! Analyzer trait definition.

use async_trait::async_trait;

use super::error::AnalysisError;
use super::models::{AnalysisResult, UploadedMedia};

/// Something that can turn a video into an [`AnalysisResult`].
///
/// Implementations of this trait can talk to a remote model directly
/// ([`GeminiClient`](super::GeminiClient)) or decorate another analyzer
/// ([`RetryingAnalyzer`](super::RetryingAnalyzer)). The HTTP layer only sees
/// this trait, so tests can swap in a fake without network access.
#[cfg_attr(any(test, feature = "mock"), mockall::automock)]
#[async_trait]
pub trait MediaAnalyzer: Send + Sync {
    /// Analyze one uploaded video.
    ///
    /// The caller is responsible for validating the MIME type and size.
    async fn analyze(&self, media: &UploadedMedia) -> Result<AnalysisResult, AnalysisError>;
}
