//! Retry policy for analysis requests.
//!
//! Implements exponential backoff over a fixed attempt budget. The loop is
//! expressed as a small state machine so the schedule and the termination
//! condition can be checked without running any I/O.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use super::analyzer::MediaAnalyzer;
use super::error::AnalysisError;
use super::models::{AnalysisResult, UploadedMedia};
use crate::config::AnalysisSettings;
use crate::server::metrics;

/// Which attempt failures are worth another try.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RetryMode {
    /// Every failure is retried until the budget runs out.
    #[default]
    All,
    /// Failures that would repeat identically (bad request, auth) stop the loop.
    TransientOnly,
}

impl RetryMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            RetryMode::All => "all",
            RetryMode::TransientOnly => "transient_only",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "all" => Some(RetryMode::All),
            "transient_only" => Some(RetryMode::TransientOnly),
            _ => None,
        }
    }
}

/// Retry policy implementing exponential backoff.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total number of attempts, the first one included.
    pub max_attempts: u32,
    /// Attempt `i` (0-indexed, `i > 0`) waits `2^i` units before running.
    pub backoff_unit: Duration,
    pub mode: RetryMode,
}

/// Where the retry loop currently stands.
#[derive(Debug)]
pub enum RetryState {
    /// Attempt `attempt` (0-indexed) runs after sleeping `delay`.
    Attempting {
        attempt: u32,
        delay: Duration,
    },
    Success(AnalysisResult),
    Failed(AnalysisError),
}

impl RetryPolicy {
    /// Create a new RetryPolicy from configuration settings.
    pub fn new(settings: &AnalysisSettings) -> Self {
        Self {
            max_attempts: settings.max_attempts,
            backoff_unit: Duration::from_millis(settings.backoff_unit_ms),
            mode: settings.retry_mode,
        }
    }

    /// Delay inserted before `attempt`. The first attempt never waits.
    ///
    /// There is no cap: growth is bounded by `max_attempts` alone.
    pub fn backoff(&self, attempt: u32) -> Duration {
        if attempt == 0 {
            return Duration::ZERO;
        }
        self.backoff_unit
            .saturating_mul(2u32.saturating_pow(attempt))
    }

    /// Sum of every backoff delay when all attempts fail.
    pub fn total_backoff(&self) -> Duration {
        (1..self.max_attempts)
            .map(|attempt| self.backoff(attempt))
            .fold(Duration::ZERO, Duration::saturating_add)
    }

    /// Check if a failed attempt should be followed by another one.
    ///
    /// Returns true if:
    /// - `attempt` is not the last one in the budget
    /// - the mode allows retrying this kind of error
    pub fn should_retry(&self, error: &AnalysisError, attempt: u32) -> bool {
        let has_budget = attempt.saturating_add(1) < self.max_attempts;
        let allowed = match self.mode {
            RetryMode::All => true,
            RetryMode::TransientOnly => error.is_retryable(),
        };
        has_budget && allowed
    }

    /// Initial state of the loop.
    ///
    /// With an empty budget the loop fails straight away with
    /// [`AnalysisError::Unreachable`].
    pub fn start(&self) -> RetryState {
        if self.max_attempts == 0 {
            RetryState::Failed(AnalysisError::Unreachable)
        } else {
            RetryState::Attempting {
                attempt: 0,
                delay: Duration::ZERO,
            }
        }
    }

    /// Transition after attempt `attempt` produced `outcome`.
    pub fn advance(
        &self,
        attempt: u32,
        outcome: Result<AnalysisResult, AnalysisError>,
    ) -> RetryState {
        match outcome {
            Ok(result) => RetryState::Success(result),
            Err(error) if self.should_retry(&error, attempt) => {
                let next = attempt + 1;
                RetryState::Attempting {
                    attempt: next,
                    delay: self.backoff(next),
                }
            }
            Err(error) => RetryState::Failed(AnalysisError::Exhausted {
                attempts: attempt + 1,
                last_error: Box::new(error),
            }),
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            backoff_unit: Duration::from_secs(1),
            mode: RetryMode::All,
        }
    }
}

/// Analyzer decorator that retries the inner analyzer per [`RetryPolicy`].
pub struct RetryingAnalyzer {
    inner: Arc<dyn MediaAnalyzer>,
    policy: RetryPolicy,
}

impl RetryingAnalyzer {
    pub fn new(inner: Arc<dyn MediaAnalyzer>, policy: RetryPolicy) -> Self {
        Self { inner, policy }
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }
}

#[async_trait]
impl MediaAnalyzer for RetryingAnalyzer {
    async fn analyze(&self, media: &UploadedMedia) -> Result<AnalysisResult, AnalysisError> {
        let mut state = self.policy.start();
        loop {
            state = match state {
                RetryState::Attempting { attempt, delay } => {
                    if !delay.is_zero() {
                        debug!(
                            attempt = attempt + 1,
                            delay_ms = delay.as_millis() as u64,
                            "Backing off before next analysis attempt"
                        );
                        tokio::time::sleep(delay).await;
                    }

                    let outcome = self.inner.analyze(media).await;
                    match &outcome {
                        Ok(_) => metrics::record_analysis_attempt("success"),
                        Err(e) => {
                            metrics::record_analysis_attempt(e.as_str());
                            warn!(
                                attempt = attempt + 1,
                                max_attempts = self.policy.max_attempts,
                                error = %e,
                                "Analysis attempt failed"
                            );
                        }
                    }
                    self.policy.advance(attempt, outcome)
                }
                RetryState::Success(result) => return Ok(result),
                RetryState::Failed(error) => return Err(error),
            };
        }
    }
}
