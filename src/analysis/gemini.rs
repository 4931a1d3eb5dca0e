//! Gemini `generateContent` client.
//!
//! Sends the video inline (base64) together with the analysis prompt and asks
//! for a JSON-typed response. One call is one attempt; retries live in
//! [`RetryingAnalyzer`](super::RetryingAnalyzer).

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::time::Duration;
use tracing::debug;

use super::analyzer::MediaAnalyzer;
use super::error::AnalysisError;
use super::models::{AnalysisRequest, AnalysisResult, UploadedMedia};
use super::prompt::AnalysisPrompt;
use crate::config::AnalysisSettings;

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash-preview-09-2025";

const API_KEY_HEADER: &str = "x-goog-api-key";
const JSON_MIME_TYPE: &str = "application/json";

/// Client for the Gemini REST API.
pub struct GeminiClient {
    client: Client,
    base_url: String,
    model: String,
    api_key: String,
    prompt: AnalysisPrompt,
}

impl Debug for GeminiClient {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("GeminiClient")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

impl GeminiClient {
    /// Create a new client.
    ///
    /// # Arguments
    /// * `api_key` - Gemini API key, sent on every request.
    /// * `settings` - Model, endpoint, per-attempt timeout and output language.
    pub fn new(api_key: impl Into<String>, settings: &AnalysisSettings) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.request_timeout_sec))
            .build()
            .context("Failed to create HTTP client for Gemini API")?;

        Ok(Self {
            client,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            model: settings.model.clone(),
            api_key: api_key.into(),
            prompt: AnalysisPrompt::new(&settings.output_language),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }
}

#[async_trait]
impl MediaAnalyzer for GeminiClient {
    async fn analyze(&self, media: &UploadedMedia) -> Result<AnalysisResult, AnalysisError> {
        let request = AnalysisRequest::new(media, &self.prompt);
        let body = GenerateContentRequest::from(&request);

        debug!(
            model = %self.model,
            mime_type = %media.mime_type(),
            size = media.len(),
            "Sending generateContent request to Gemini"
        );

        let response = self
            .client
            .post(self.endpoint())
            .header(API_KEY_HEADER, &self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if status != StatusCode::OK {
            let message = response.text().await.unwrap_or_default();
            return Err(AnalysisError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: GenerateContentResponse = response.json().await.map_err(|e| {
            AnalysisError::InvalidResponse(format!("Failed to parse Gemini response: {}", e))
        })?;

        let text = parsed.into_first_text().ok_or_else(|| {
            AnalysisError::InvalidResponse("No candidate text in Gemini response".to_string())
        })?;

        AnalysisResult::from_text(&text)
    }
}

// Gemini API types

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
    system_instruction: Content<'a>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
enum Part<'a> {
    Text(&'a str),
    InlineData(InlineData<'a>),
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct InlineData<'a> {
    mime_type: &'a str,
    data: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: &'static str,
}

impl<'a> From<&AnalysisRequest<'a>> for GenerateContentRequest<'a> {
    fn from(request: &AnalysisRequest<'a>) -> Self {
        GenerateContentRequest {
            contents: vec![Content {
                parts: vec![
                    Part::Text(request.instruction),
                    Part::InlineData(InlineData {
                        mime_type: request.mime_type,
                        data: request.data,
                    }),
                ],
            }],
            system_instruction: Content {
                parts: vec![Part::Text(request.system_instruction)],
            },
            generation_config: GenerationConfig {
                response_mime_type: JSON_MIME_TYPE,
            },
        }
    }
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

impl GenerateContentResponse {
    /// Text of the first part of the first candidate.
    fn into_first_text(self) -> Option<String> {
        self.candidates
            .into_iter()
            .next()?
            .content?
            .parts
            .into_iter()
            .next()?
            .text
    }
}
