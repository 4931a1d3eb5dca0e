//! HTTP client for end-to-end tests
//!
//! Wraps reqwest with one method per server endpoint.
//! When API routes or request formats change, update only this file.

use super::constants::*;
use reqwest::multipart::{Form, Part};
use reqwest::Response;
use std::time::Duration;

pub struct TestClient {
    /// The underlying reqwest client (public for custom requests in tests)
    pub client: reqwest::Client,
    /// The base URL of the test server
    pub base_url: String,
}

#[allow(dead_code)]
impl TestClient {
    pub fn new(base_url: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .expect("Failed to build reqwest client");

        Self { client, base_url }
    }

    /// GET /
    pub async fn get_index(&self) -> Response {
        self.client
            .get(format!("{}/", self.base_url))
            .send()
            .await
            .expect("Index request failed")
    }

    /// GET /health
    pub async fn get_health(&self) -> Response {
        self.client
            .get(format!("{}/health", self.base_url))
            .send()
            .await
            .expect("Health request failed")
    }

    /// POST /analyze with `data` in the `file` field
    pub async fn analyze(&self, data: Vec<u8>, mime_type: &str) -> Response {
        let part = Part::bytes(data)
            .file_name("clip")
            .mime_str(mime_type)
            .expect("Invalid MIME type");
        self.analyze_form(Form::new().part("file", part)).await
    }

    /// POST /analyze with an arbitrary multipart form
    pub async fn analyze_form(&self, form: Form) -> Response {
        self.client
            .post(format!("{}/analyze", self.base_url))
            .multipart(form)
            .send()
            .await
            .expect("Analyze request failed")
    }
}
