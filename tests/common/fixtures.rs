//! Test fixtures: sample payloads and a scripted analyzer.
#![allow(dead_code)]

use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use video_analyzer_server::analysis::{
    AnalysisError, AnalysisResult, MediaAnalyzer, UploadedMedia,
};

/// Minimal analysis following the expected output schema.
pub fn sample_analysis() -> Value {
    json!({
        "video_title": "City walk at dusk",
        "duration_seconds": 42,
        "scene_description": "A handheld walk through a busy street.",
        "key_elements": ["street", "neon signs"],
        "mood_atmosphere": "lively",
        "camera_movement": "handheld tracking",
        "audio_suggestions": [],
        "branding_watermark": "",
        "target_audience": ["travelers"],
        "tags": ["city", "night"],
        "video_analysis": {
            "basic_info": {
                "title": "City walk at dusk",
                "source_url": "",
                "duration_seconds": 42,
                "format": "mp4",
                "platform": "",
                "primary_objective": "",
                "core_message": ""
            },
            "audience_analysis": {
                "primary": [],
                "secondary": [],
                "pain_points_addressed": [],
                "value_provided": []
            },
            "scene_breakdown": [
                {
                    "timestamp": "00:00",
                    "description": "Street opening shot",
                    "visual_elements": ["crowd"],
                    "audio_elements": "traffic"
                }
            ],
            "ai_production_recommendations": []
        }
    })
}

/// Deterministic fake video content of the given size.
pub fn sample_video(size: usize) -> Vec<u8> {
    (0..size).map(|i| (i % 251) as u8).collect()
}

/// Gemini `generateContent` response wrapping `text` as the first candidate.
pub fn gemini_response_body(text: &str) -> String {
    json!({
        "candidates": [{
            "content": { "role": "model", "parts": [{ "text": text }] },
            "finishReason": "STOP"
        }]
    })
    .to_string()
}

fn to_result(value: &Value) -> AnalysisResult {
    AnalysisResult::from_text(&value.to_string()).expect("fixture must be a JSON object")
}

/// Analyzer that replays a fixed script of outcomes and counts its calls.
///
/// Once the script is used up every further call succeeds with
/// [`sample_analysis`].
pub struct ScriptedAnalyzer {
    script: Mutex<VecDeque<Result<Value, AnalysisError>>>,
    calls: AtomicUsize,
    last_upload: Mutex<Option<(String, usize)>>,
}

impl ScriptedAnalyzer {
    pub fn new(script: Vec<Result<Value, AnalysisError>>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            calls: AtomicUsize::new(0),
            last_upload: Mutex::new(None),
        }
    }

    pub fn always_succeeding() -> Self {
        Self::new(Vec::new())
    }

    /// Fails `failures` times with a 503, then succeeds.
    pub fn failing_times(failures: usize) -> Self {
        let script = (0..failures)
            .map(|_| {
                Err(AnalysisError::Api {
                    status: 503,
                    message: "The model is overloaded".to_string(),
                })
            })
            .collect();
        Self::new(script)
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// MIME type and size of the last analyzed upload.
    pub fn last_upload(&self) -> Option<(String, usize)> {
        self.last_upload.lock().unwrap().clone()
    }
}

#[async_trait]
impl MediaAnalyzer for ScriptedAnalyzer {
    async fn analyze(&self, media: &UploadedMedia) -> Result<AnalysisResult, AnalysisError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_upload.lock().unwrap() = Some((media.mime_type().to_string(), media.len()));

        let next = self.script.lock().unwrap().pop_front();
        match next {
            Some(Ok(value)) => Ok(to_result(&value)),
            Some(Err(err)) => Err(err),
            None => Ok(to_result(&sample_analysis())),
        }
    }
}
