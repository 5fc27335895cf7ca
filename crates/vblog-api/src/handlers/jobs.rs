//! Job status handler.
//!
//! Submissions complete synchronously and nothing is persisted, so every
//! job id reports `completed`. The response shape is kept for clients that
//! poll.

use axum::extract::Path;
use axum::Json;
use serde::Serialize;

use vblog_models::{JobId, JobStatus};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobStatusResponse {
    pub job_id: JobId,
    pub status: JobStatus,
    pub message: String,
}

/// `GET /api/status/:job_id`
pub async fn job_status(Path(job_id): Path<String>) -> Json<JobStatusResponse> {
    Json(JobStatusResponse {
        job_id: JobId::from_string(job_id),
        status: JobStatus::Completed,
        message: "Job status tracking is not persisted; submissions complete synchronously"
            .to_string(),
    })
}
