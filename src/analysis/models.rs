//! Data carried through a single analysis call.

use base64::Engine;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::sync::OnceLock;

use super::error::AnalysisError;
use super::prompt::AnalysisPrompt;

/// A video received from a client, held in memory for one request.
#[derive(Debug)]
pub struct UploadedMedia {
    mime_type: String,
    data: Vec<u8>,
    /// Base64 form of `data`, computed once and shared by every attempt.
    encoded: OnceLock<String>,
}

impl UploadedMedia {
    pub fn new(mime_type: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            mime_type: mime_type.into(),
            data,
            encoded: OnceLock::new(),
        }
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Standard (padded) base64 encoding of the media bytes.
    pub fn encoded(&self) -> &str {
        self.encoded
            .get_or_init(|| base64::engine::general_purpose::STANDARD.encode(&self.data))
    }
}

/// Everything sent to the model for one attempt.
///
/// Borrows from the upload and the prompt so that retries don't copy the
/// (potentially large) encoded payload.
#[derive(Debug, Clone, Copy)]
pub struct AnalysisRequest<'a> {
    pub instruction: &'a str,
    pub system_instruction: &'a str,
    pub mime_type: &'a str,
    pub data: &'a str,
}

impl<'a> AnalysisRequest<'a> {
    pub fn new(media: &'a UploadedMedia, prompt: &'a AnalysisPrompt) -> Self {
        Self {
            instruction: prompt.instruction(),
            system_instruction: prompt.system_instruction(),
            mime_type: media.mime_type(),
            data: media.encoded(),
        }
    }
}

/// JSON object produced by the model.
///
/// Returned to clients verbatim: conformance to the requested schema is only
/// as good as the model's compliance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnalysisResult(Map<String, Value>);

impl AnalysisResult {
    /// Parse the model's text output. Anything but a JSON object is rejected.
    pub fn from_text(text: &str) -> Result<Self, AnalysisError> {
        let value: Value = serde_json::from_str(text.trim())
            .map_err(|e| AnalysisError::InvalidJson(e.to_string()))?;

        match value {
            Value::Object(map) => Ok(Self(map)),
            other => Err(AnalysisError::InvalidJson(format!(
                "expected a JSON object, got {}",
                json_kind(&other)
            ))),
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
