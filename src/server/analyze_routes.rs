//! `POST /analyze`: upload a video, get its analysis back.

use axum::{
    extract::{multipart::MultipartRejection, DefaultBodyLimit, Multipart, State},
    routing::post,
    Json, Router,
};
use std::time::Instant;
use tracing::{info, warn};

use super::error::ApiError;
use super::metrics::{record_analysis, record_upload_rejected, record_upload_size};
use super::state::ServerState;
use super::upload::read_video_upload;
use crate::analysis::AnalysisResult;

async fn analyze_video(
    State(state): State<ServerState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<AnalysisResult>, ApiError> {
    let mut multipart = multipart.map_err(|rejection| {
        record_upload_rejected("malformed");
        ApiError::bad_request(rejection.body_text())
    })?;

    let media = match read_video_upload(&mut multipart, state.config.max_upload_bytes).await {
        Ok(media) => media,
        Err(err) => {
            record_upload_rejected(err.reason());
            return Err(err.into());
        }
    };
    record_upload_size(media.len());

    info!(
        mime_type = %media.mime_type(),
        size = %byte_unit::Byte::from(media.len()),
        "Analyzing uploaded video"
    );

    let start = Instant::now();
    let outcome = state.analyzer.analyze(&media).await;
    let elapsed = start.elapsed();
    record_analysis(outcome.is_ok(), elapsed);

    match outcome {
        Ok(result) => {
            info!(
                elapsed_ms = elapsed.as_millis() as u64,
                "Analysis completed"
            );
            Ok(Json(result))
        }
        Err(err) => {
            warn!(elapsed_ms = elapsed.as_millis() as u64, error = %err, "Analysis failed");
            Err(err.into())
        }
    }
}

/// Routes for video analysis.
///
/// The body limit leaves room above the upload limit so that oversized files
/// are drained and answered with a JSON error instead of a dropped connection.
pub fn make_analyze_routes(state: ServerState) -> Router {
    let body_limit = state.config.max_upload_bytes.saturating_mul(2);
    Router::new()
        .route("/analyze", post(analyze_video))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}
