//! Common test infrastructure
//!
//! This module provides all the infrastructure needed for end-to-end tests.
//! Tests should only import from this module, not from internal submodules.
//!
//! # Example
//!
//! ```no_run
//! mod common;
//! use common::{sample_video, ScriptedAnalyzer, TestClient, TestServer, VIDEO_MP4};
//! use reqwest::StatusCode;
//! use std::sync::Arc;
//!
//! #[tokio::test]
//! async fn test_analyze() {
//!     let analyzer = Arc::new(ScriptedAnalyzer::always_succeeding());
//!     let server = TestServer::spawn_with(analyzer.clone()).await;
//!     let client = TestClient::new(server.base_url.clone());
//!
//!     let response = client.analyze(sample_video(1024), VIDEO_MP4).await;
//!     assert_eq!(response.status(), StatusCode::OK);
//! }
//! ```

mod client;
mod constants;
mod fixtures;
mod server;

// Public API - this is what tests import
pub use client::TestClient;
pub use constants::*;
#[allow(unused_imports)]
pub use fixtures::{gemini_response_body, sample_analysis, sample_video, ScriptedAnalyzer};
pub use server::TestServer;
