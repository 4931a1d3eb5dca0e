//! Fixed instructions sent with every analysis request.

/// Language used for text values when none is configured.
pub const DEFAULT_OUTPUT_LANGUAGE: &str = "Indonesian";

/// User-turn text accompanying the inline video.
pub const USER_INSTRUCTION: &str =
    "Analyze this video according to the system instructions provided.";

const OUTPUT_SCHEMA: &str = r#"{
  "video_title": "",
  "duration_seconds": 0,
  "scene_description": "",
  "key_elements": [],
  "mood_atmosphere": "",
  "camera_movement": "",
  "audio_suggestions": [],
  "branding_watermark": "",
  "target_audience": [],
  "tags": [],
  "video_analysis": {
    "basic_info": { "title": "", "source_url": "", "duration_seconds": 0, "format": "", "platform": "", "primary_objective": "", "core_message": "" },
    "audience_analysis": { "primary": [], "secondary": [], "pain_points_addressed": [], "value_provided": [] },
    "scene_breakdown": [ { "timestamp": "MM:SS", "description": "", "visual_elements": [], "audio_elements": "" } ],
    "ai_production_recommendations": [ { "tool_name": "", "use_case": "" } ]
  }
}"#;

/// Instruction pair for the model. Built once at startup and shared.
#[derive(Debug, Clone)]
pub struct AnalysisPrompt {
    instruction: String,
    system_instruction: String,
}

impl AnalysisPrompt {
    pub fn new(output_language: &str) -> Self {
        Self {
            instruction: USER_INSTRUCTION.to_string(),
            system_instruction: build_system_instruction(output_language),
        }
    }

    pub fn instruction(&self) -> &str {
        &self.instruction
    }

    pub fn system_instruction(&self) -> &str {
        &self.system_instruction
    }
}

impl Default for AnalysisPrompt {
    fn default() -> Self {
        Self::new(DEFAULT_OUTPUT_LANGUAGE)
    }
}

fn build_system_instruction(output_language: &str) -> String {
    format!(
        "You are a professional video production expert. Analyze the provided video \
objectively, based only on what can be seen and heard. Do NOT assume, guess or \
invent information that is not directly observable.

Follow the JSON structure below strictly. For every field:
- If an element is NOT VISIBLE or CANNOT BE CONFIRMED from the video, use an empty string \"\" (for text) or an empty array [] (for lists).
- Durations must be computed from the actual timestamps.
- All timestamps use the \"MM:SS\" format.
- Write every text value in {output_language}.

Required output structure:
{OUTPUT_SCHEMA}"
    )
}
