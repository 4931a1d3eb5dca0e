//! Reading and validating the uploaded video.

use axum::extract::multipart::{Field, MultipartError};
use axum::extract::Multipart;
use axum::http::StatusCode;
use byte_unit::{Byte, UnitType};
use thiserror::Error;
use tracing::debug;

use crate::analysis::UploadedMedia;

/// Multipart field carrying the video.
pub const FILE_FIELD: &str = "file";

const VIDEO_MIME_PREFIX: &str = "video/";

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("File must be a video.")]
    NotAVideo(String),

    #[error("Maximum file size is {}.", format_limit(*.limit))]
    TooLarge { limit: usize },

    #[error("No file uploaded. Send the video in the 'file' field.")]
    MissingFile,

    #[error("Could not read the uploaded file: {0}")]
    Malformed(String),
}

impl UploadError {
    /// Label used for the rejected uploads metric.
    pub fn reason(&self) -> &'static str {
        match self {
            UploadError::NotAVideo(_) => "not_a_video",
            UploadError::TooLarge { .. } => "too_large",
            UploadError::MissingFile => "missing_file",
            UploadError::Malformed(_) => "malformed",
        }
    }

    fn from_multipart(err: MultipartError, limit: usize) -> Self {
        if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
            UploadError::TooLarge { limit }
        } else {
            UploadError::Malformed(err.body_text())
        }
    }
}

fn format_limit(limit: usize) -> String {
    Byte::from(limit)
        .get_appropriate_unit(UnitType::Binary)
        .to_string()
}

/// Reads the `file` field of a multipart body into memory.
///
/// The size limit is checked before the content type, so an oversized
/// upload is reported as such whatever its declared type. Once the limit is
/// crossed the rest of the field is drained without being stored.
pub async fn read_video_upload(
    multipart: &mut Multipart,
    max_bytes: usize,
) -> Result<UploadedMedia, UploadError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| UploadError::from_multipart(e, max_bytes))?
    {
        if field.name() != Some(FILE_FIELD) {
            debug!("Skipping multipart field {:?}", field.name());
            continue;
        }

        let mime_type = field.content_type().unwrap_or_default().to_string();
        let (data, size) = read_field(field, max_bytes).await?;

        if size > max_bytes {
            return Err(UploadError::TooLarge { limit: max_bytes });
        }
        if !mime_type.starts_with(VIDEO_MIME_PREFIX) {
            return Err(UploadError::NotAVideo(mime_type));
        }

        debug!(mime_type = %mime_type, size, "Received video upload");
        return Ok(UploadedMedia::new(mime_type, data));
    }

    Err(UploadError::MissingFile)
}

/// Returns the stored bytes (at most `max_bytes`) and the full field size.
async fn read_field(
    mut field: Field<'_>,
    max_bytes: usize,
) -> Result<(Vec<u8>, usize), UploadError> {
    let mut data = Vec::new();
    let mut size = 0usize;
    while let Some(chunk) = field
        .chunk()
        .await
        .map_err(|e| UploadError::from_multipart(e, max_bytes))?
    {
        size = size.saturating_add(chunk.len());
        if size <= max_bytes {
            data.extend_from_slice(&chunk);
        }
    }
    Ok((data, size))
}
