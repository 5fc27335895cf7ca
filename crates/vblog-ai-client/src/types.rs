//! AI service request/response types.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use vblog_models::JobId;

/// Body of `POST /api/process-video`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessVideoRequest {
    pub job_id: JobId,
    /// Path of the stored upload, readable by the AI service
    pub video_path: String,
    /// Stored file name
    pub filename: String,
}

impl ProcessVideoRequest {
    pub fn new(job_id: JobId, video_path: impl Into<String>, filename: impl Into<String>) -> Self {
        Self {
            job_id,
            video_path: video_path.into(),
            filename: filename.into(),
        }
    }
}

/// Body of `POST /api/process-youtube`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessYoutubeRequest {
    pub job_id: JobId,
    pub youtube_url: String,
}

impl ProcessYoutubeRequest {
    pub fn new(job_id: JobId, youtube_url: impl Into<String>) -> Self {
        Self {
            job_id,
            youtube_url: youtube_url.into(),
        }
    }
}

/// Health check response.
#[derive(Debug, Clone, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    #[serde(default)]
    pub message: Option<String>,
}

/// Result of a file submission to the AI service.
///
/// File submissions never fail outright: when the service cannot be used the
/// client substitutes placeholder content and says why.
#[derive(Debug, Clone, PartialEq)]
pub enum GatewayOutcome {
    /// Raw payload returned by the AI service
    Live(Value),
    /// Placeholder payload standing in for the AI service
    Degraded {
        payload: Value,
        warning: String,
        reason: String,
    },
}

impl GatewayOutcome {
    pub fn is_degraded(&self) -> bool {
        matches!(self, GatewayOutcome::Degraded { .. })
    }

    pub fn payload(&self) -> &Value {
        match self {
            GatewayOutcome::Live(payload) | GatewayOutcome::Degraded { payload, .. } => payload,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_process_video_request_camel_case() {
        let request = ProcessVideoRequest::new(
            JobId::from_string("job-1"),
            "uploads/talk-123.mp4",
            "talk-123.mp4",
        );
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({
                "jobId": "job-1",
                "videoPath": "uploads/talk-123.mp4",
                "filename": "talk-123.mp4"
            })
        );
    }

    #[test]
    fn test_process_youtube_request_camel_case() {
        let request = ProcessYoutubeRequest::new(JobId::from_string("job-2"), "https://youtu.be/x");
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({ "jobId": "job-2", "youtubeUrl": "https://youtu.be/x" })
        );
    }

    #[test]
    fn test_outcome_payload() {
        let live = GatewayOutcome::Live(json!({ "blog": {} }));
        assert!(!live.is_degraded());
        assert_eq!(live.payload()["blog"], json!({}));
    }
}
