//! Submission orchestration.
//!
//! Validates raw input, stores uploads for the duration of the request,
//! calls the AI service and normalizes whatever comes back. Uploaded files
//! are always released before a response leaves this module.

use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use serde_json::Value;
use tracing::{debug, error, info, info_span, warn, Instrument, Span};

use vblog_ai_client::{AiClient, GatewayOutcome, ProcessVideoRequest, ProcessYoutubeRequest};
use vblog_models::{normalize, JobId, JobSource, SubmissionResponse, YoutubeUrl};
use vblog_storage::ArtifactStore;

use crate::error::{ApiError, ApiResult};
use crate::metrics::{
    record_cleanup_failure, record_submission, record_submission_duration, record_upload_bytes,
    SubmissionOutcome,
};

/// Accepted upload MIME types.
pub const ALLOWED_VIDEO_TYPES: [&str; 5] = [
    "video/mp4",
    "video/webm",
    "video/quicktime",
    "video/x-msvideo",
    "video/x-matroska",
];

pub const NO_VIDEO_FILE: &str = "No video file provided";
pub const INVALID_FILE_TYPE: &str = "Invalid file type. Only video files are allowed.";
pub const NO_YOUTUBE_URL: &str = "No YouTube URL provided";
pub const YOUTUBE_UNAVAILABLE: &str = "AI service unavailable for YouTube processing";
pub const INTERNAL_ERROR: &str = "An internal error occurred";

/// A video received from the client, fully buffered and not yet stored.
#[derive(Debug, Clone)]
pub struct FileUpload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Orchestrates file and URL submissions.
#[derive(Clone)]
pub struct SubmissionService {
    ai: Arc<AiClient>,
    store: ArtifactStore,
    max_upload_size: usize,
    expose_error_details: bool,
}

impl SubmissionService {
    pub fn new(ai: Arc<AiClient>, store: ArtifactStore, max_upload_size: usize) -> Self {
        Self {
            ai,
            store,
            max_upload_size,
            expose_error_details: true,
        }
    }

    /// Whether 500 responses carry the underlying cause. Off in production.
    pub fn with_error_details(mut self, expose: bool) -> Self {
        self.expose_error_details = expose;
        self
    }

    /// Reject MIME types outside the video allow-list.
    pub fn check_content_type(&self, content_type: &str) -> ApiResult<()> {
        // Ignore parameters such as "; codecs=..."
        let essence = content_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();

        if ALLOWED_VIDEO_TYPES.contains(&essence.as_str()) {
            Ok(())
        } else {
            Err(ApiError::bad_request(INVALID_FILE_TYPE))
        }
    }

    /// Reject payloads over the configured upload limit.
    pub fn check_size(&self, size: usize) -> ApiResult<()> {
        if size > self.max_upload_size {
            Err(self.size_limit_error())
        } else {
            Ok(())
        }
    }

    pub fn size_limit_error(&self) -> ApiError {
        ApiError::bad_request(format!(
            "File size exceeds {} MB limit",
            self.max_upload_size / (1024 * 1024)
        ))
    }

    fn internal_error(&self, job_id: &JobId, context: &str, cause: &dyn fmt::Display) -> ApiError {
        let message = if self.expose_error_details {
            format!("{}: {}", context, cause)
        } else {
            INTERNAL_ERROR.to_string()
        };
        ApiError::internal_for(job_id.clone(), message)
    }

    fn validate_upload(&self, upload: &FileUpload) -> ApiResult<()> {
        if upload.bytes.is_empty() {
            return Err(ApiError::bad_request(NO_VIDEO_FILE));
        }
        self.check_size(upload.bytes.len())?;
        self.check_content_type(&upload.content_type)
    }

    /// Process an uploaded video file.
    ///
    /// Responds with placeholder content (`isMockData: true`) when the AI
    /// service cannot be used. The stored file is deleted on every path.
    pub async fn submit_file(&self, upload: FileUpload) -> ApiResult<SubmissionResponse> {
        if let Err(e) = self.validate_upload(&upload) {
            record_submission(JobSource::File, SubmissionOutcome::Rejected);
            return Err(e);
        }

        let job_id = JobId::new();
        let span = job_span(&job_id, JobSource::File);
        let started = Instant::now();

        let result = self.process_file(&job_id, upload).instrument(span).await;

        record_submission_duration(JobSource::File, started.elapsed().as_secs_f64());
        match &result {
            Ok(response) if response.is_mock_data => {
                record_submission(JobSource::File, SubmissionOutcome::Degraded)
            }
            Ok(_) => record_submission(JobSource::File, SubmissionOutcome::Completed),
            Err(_) => record_submission(JobSource::File, SubmissionOutcome::Failed),
        }

        result
    }

    async fn process_file(&self, job_id: &JobId, upload: FileUpload) -> ApiResult<SubmissionResponse> {
        info!(
            file = %upload.file_name,
            bytes = upload.bytes.len(),
            content_type = %upload.content_type,
            "Upload accepted"
        );
        record_upload_bytes(upload.bytes.len() as u64);

        let artifact = self
            .store
            .save(&upload.bytes, &upload.file_name, &upload.content_type)
            .await
            .map_err(|e| {
                error!(error = %e, "Could not store upload");
                self.internal_error(job_id, "Error processing video", &e)
            })?;
        // Release the buffered copy before the long AI call.
        drop(upload);

        let request = ProcessVideoRequest::new(
            job_id.clone(),
            artifact.path().display().to_string(),
            artifact.stored_name(),
        );

        debug!(artifact = %request.filename, "Sending file to AI service");
        let outcome = self.ai.process_file(&request).await;

        if !self.store.release(artifact).await {
            record_cleanup_failure();
        }

        let (payload, warning) = match outcome {
            GatewayOutcome::Live(payload) => (payload, None),
            GatewayOutcome::Degraded {
                payload,
                warning,
                reason,
            } => {
                warn!(reason = %reason, "Using placeholder content");
                (payload, Some(warning))
            }
        };
        log_foreign_job_id(job_id, &payload);

        let result = normalize(&payload).map_err(|e| {
            error!(error = %e, "AI response rejected");
            self.internal_error(job_id, "Error processing video", &e)
        })?;

        let response = match warning {
            Some(warning) => {
                SubmissionResponse::degraded(job_id.clone(), JobSource::File, result, warning)
            }
            None => SubmissionResponse::completed(job_id.clone(), JobSource::File, result),
        };

        info!(mock = response.is_mock_data, "File submission completed");
        Ok(response)
    }

    /// Process a YouTube link. There is no placeholder fallback: AI service
    /// failures surface as errors carrying the job id.
    pub async fn submit_url(&self, raw_url: &str) -> ApiResult<SubmissionResponse> {
        let url = match parse_youtube_url(raw_url) {
            Ok(url) => url,
            Err(e) => {
                record_submission(JobSource::Youtube, SubmissionOutcome::Rejected);
                return Err(e);
            }
        };

        let job_id = JobId::new();
        let span = job_span(&job_id, JobSource::Youtube);
        let started = Instant::now();

        let result = self.process_url(&job_id, url).instrument(span).await;

        record_submission_duration(JobSource::Youtube, started.elapsed().as_secs_f64());
        record_submission(
            JobSource::Youtube,
            if result.is_ok() {
                SubmissionOutcome::Completed
            } else {
                SubmissionOutcome::Failed
            },
        );

        result
    }

    async fn process_url(&self, job_id: &JobId, url: YoutubeUrl) -> ApiResult<SubmissionResponse> {
        info!(video_id = %url.video_id, "YouTube submission accepted");

        let request = ProcessYoutubeRequest::new(job_id.clone(), url.raw.clone());
        let payload = self.ai.process_url(&request).await.map_err(|e| {
            error!(error = %e, kind = e.kind(), "AI service failed");
            ApiError::upstream(job_id.clone(), YOUTUBE_UNAVAILABLE)
        })?;
        log_foreign_job_id(job_id, &payload);

        let result = normalize(&payload).map_err(|e| {
            error!(error = %e, "AI response rejected");
            self.internal_error(job_id, "Error processing YouTube URL", &e)
        })?;

        // Prefer the id reported by the AI service when it sends one.
        let video_id = payload
            .get("videoId")
            .and_then(Value::as_str)
            .filter(|id| !id.is_empty())
            .map(str::to_string)
            .unwrap_or(url.video_id);

        info!(video_id = %video_id, "YouTube submission completed");
        Ok(SubmissionResponse::completed(job_id.clone(), JobSource::Youtube, result)
            .with_video_id(video_id))
    }
}

fn job_span(job_id: &JobId, source: JobSource) -> Span {
    info_span!("job", job_id = %job_id, source = %source)
}

fn parse_youtube_url(raw_url: &str) -> ApiResult<YoutubeUrl> {
    let trimmed = raw_url.trim();
    if trimmed.is_empty() {
        return Err(ApiError::bad_request(NO_YOUTUBE_URL));
    }
    YoutubeUrl::parse(trimmed).map_err(|e| ApiError::bad_request(e.to_string()))
}

/// Job ids are ours; an id echoed back by the AI service is only logged.
fn log_foreign_job_id(job_id: &JobId, payload: &Value) {
    if let Some(upstream) = payload.get("jobId").and_then(Value::as_str) {
        if upstream != job_id.as_str() {
            debug!(
                job_id = %job_id,
                upstream_job_id = %upstream,
                "Ignoring job id returned by AI service"
            );
        }
    }
}
