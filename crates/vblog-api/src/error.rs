//! API error types.
//!
//! Every error renders as JSON `{error, jobId?}`. Errors raised after a job
//! id was assigned carry it so clients can correlate failures.
//!
//! Messages are rendered as-is; callers decide what detail is safe to expose.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

use vblog_models::JobId;

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    #[error("Rate limit exceeded. Please try again later.")]
    RateLimited,

    /// The AI service failed for a submission that has no fallback
    #[error("{message}")]
    Upstream { job_id: JobId, message: String },

    /// A pass-through call to the AI service failed
    #[error("{0}")]
    Proxy(String),

    #[error("{message}")]
    Internal {
        job_id: Option<JobId>,
        message: String,
    },
}

impl ApiError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::BadRequest(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn upstream(job_id: JobId, msg: impl Into<String>) -> Self {
        Self::Upstream {
            job_id,
            message: msg.into(),
        }
    }

    pub fn internal_for(job_id: JobId, msg: impl Into<String>) -> Self {
        Self::Internal {
            job_id: Some(job_id),
            message: msg.into(),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            ApiError::Upstream { .. } => StatusCode::BAD_GATEWAY,
            ApiError::Proxy(_) | ApiError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn job_id(&self) -> Option<&JobId> {
        match self {
            ApiError::Upstream { job_id, .. } => Some(job_id),
            ApiError::Internal { job_id, .. } => job_id.as_ref(),
            _ => None,
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    job_id: Option<JobId>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorResponse {
            error: self.to_string(),
            job_id: self.job_id().cloned(),
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use serde_json::Value;

    async fn body_json(error: ApiError) -> (StatusCode, Value) {
        let response = error.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_bad_request_body() {
        let (status, body) = body_json(ApiError::bad_request("No video file provided")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, serde_json::json!({ "error": "No video file provided" }));
    }

    #[tokio::test]
    async fn test_upstream_carries_job_id() {
        let job_id = JobId::from_string("job-9");
        let (status, body) = body_json(ApiError::upstream(job_id, "AI down")).await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["error"], "AI down");
        assert_eq!(body["jobId"], "job-9");
    }

    #[tokio::test]
    async fn test_internal_with_job_id() {
        let error = ApiError::internal_for(JobId::from_string("job-3"), "bad shape");
        assert_eq!(error.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(error.job_id().map(JobId::as_str), Some("job-3"));
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(ApiError::RateLimited.status_code(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(ApiError::not_found("x").status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            ApiError::Proxy("Failed to export content".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
