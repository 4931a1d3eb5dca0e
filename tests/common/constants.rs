//! Shared constants for end-to-end tests
//!
//! When upload limits or fixture data change, update only this file.
#![allow(dead_code)]

// ============================================================================
// Upload sizes
// ============================================================================

pub const MIB: usize = 1024 * 1024;

/// Upload limit the server is configured with
pub const MAX_UPLOAD_BYTES: usize = 20 * MIB;

/// Comfortably below the limit
pub const ACCEPTED_VIDEO_BYTES: usize = 15 * MIB;

/// Just over the limit
pub const OVERSIZED_VIDEO_BYTES: usize = 21 * MIB;

// ============================================================================
// MIME types
// ============================================================================

pub const VIDEO_MP4: &str = "video/mp4";

pub const VIDEO_WEBM: &str = "video/webm";

pub const IMAGE_PNG: &str = "image/png";

// ============================================================================
// Gemini mock
// ============================================================================

/// Model name the Gemini mock expects
pub const TEST_MODEL: &str = "test-model";

/// Key the Gemini mock expects in the x-goog-api-key header
pub const TEST_API_KEY: &str = "test-api-key";

/// Backoff unit used when retrying against the mock
pub const TEST_BACKOFF_UNIT_MS: u64 = 1;

// ============================================================================
// Timeouts
// ============================================================================

/// How long to wait for the server to become ready
pub const SERVER_READY_TIMEOUT_MS: u64 = 5000;

/// Timeout for individual HTTP requests in tests
pub const REQUEST_TIMEOUT_SECS: u64 = 30;

/// How often to poll the server while waiting for readiness
pub const SERVER_READY_POLL_INTERVAL_MS: u64 = 50;
