//! Submission handlers: file upload and YouTube link.

use axum::extract::multipart::MultipartError;
use axum::extract::multipart::MultipartRejection;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use tracing::debug;

use vblog_models::{JobSource, SubmissionResponse};

use crate::error::{ApiError, ApiResult};
use crate::metrics::{record_submission, SubmissionOutcome};
use crate::services::submission::{FileUpload, SubmissionService, NO_VIDEO_FILE};
use crate::state::AppState;

/// Multipart field carrying the video.
pub const VIDEO_FIELD: &str = "video";

/// `POST /api/upload-video`
///
/// 200 with generated content, 202 when placeholder content was returned.
pub async fn upload_video(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResult<(StatusCode, Json<SubmissionResponse>)> {
    let upload = read_upload(&state.submissions, multipart)
        .await
        .inspect_err(|_| record_submission(JobSource::File, SubmissionOutcome::Rejected))?;

    let response = state.submissions.submit_file(upload).await?;
    let status = if response.is_mock_data {
        StatusCode::ACCEPTED
    } else {
        StatusCode::OK
    };

    Ok((status, Json(response)))
}

/// Body of `POST /api/youtube-url`.
#[derive(Debug, Deserialize)]
pub struct YoutubeUrlRequest {
    #[serde(default, alias = "youtubeUrl")]
    pub url: Option<String>,
}

/// `POST /api/youtube-url`
pub async fn submit_youtube_url(
    State(state): State<AppState>,
    payload: Result<Json<YoutubeUrlRequest>, JsonRejection>,
) -> ApiResult<Json<SubmissionResponse>> {
    let Json(request) = payload?;
    let url = request.url.unwrap_or_default();

    let response = state.submissions.submit_url(&url).await?;
    Ok(Json(response))
}

/// Pull the `video` field out of the multipart body.
///
/// The MIME type is checked from the part headers before any bytes are read,
/// and the size limit is enforced while streaming, so rejected uploads never
/// reach the artifact store.
async fn read_upload(
    service: &SubmissionService,
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResult<FileUpload> {
    let mut multipart = multipart.map_err(|e| {
        debug!(error = %e.body_text(), "Upload request is not multipart");
        ApiError::bad_request(NO_VIDEO_FILE)
    })?;

    while let Some(mut field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(service, e))?
    {
        if field.name() != Some(VIDEO_FIELD) {
            continue;
        }

        let file_name = field.file_name().unwrap_or_default().to_string();
        let content_type = field.content_type().unwrap_or_default().to_string();
        service.check_content_type(&content_type)?;

        let mut bytes = Vec::new();
        while let Some(chunk) = field
            .chunk()
            .await
            .map_err(|e| multipart_error(service, e))?
        {
            service.check_size(bytes.len() + chunk.len())?;
            bytes.extend_from_slice(&chunk);
        }

        return Ok(FileUpload {
            file_name,
            content_type,
            bytes,
        });
    }

    Err(ApiError::bad_request(NO_VIDEO_FILE))
}

fn multipart_error(service: &SubmissionService, e: MultipartError) -> ApiError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        service.size_limit_error()
    } else {
        ApiError::bad_request(e.body_text())
    }
}
