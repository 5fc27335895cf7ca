//! Client-facing submission response.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::blog::BlogResult;
use crate::job::{JobId, JobSource, JobStatus};

/// Warning attached to degraded (placeholder) results.
pub const MOCK_DATA_WARNING: &str = "AI service unavailable - using mock data";

/// Response body for a completed submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionResponse {
    pub job_id: JobId,
    pub status: JobStatus,
    pub source: JobSource,
    /// YouTube video id, for URL submissions
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_id: Option<String>,
    #[serde(flatten)]
    pub result: BlogResult,
    /// True when the content is a synthetic placeholder
    #[serde(default)]
    pub is_mock_data: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

impl SubmissionResponse {
    /// Response carrying genuine AI output.
    pub fn completed(job_id: JobId, source: JobSource, result: BlogResult) -> Self {
        Self {
            job_id,
            status: JobStatus::Completed,
            source,
            video_id: None,
            result,
            is_mock_data: false,
            warning: None,
        }
    }

    /// Response carrying placeholder content, marked so clients can tell.
    pub fn degraded(
        job_id: JobId,
        source: JobSource,
        result: BlogResult,
        warning: impl Into<String>,
    ) -> Self {
        Self {
            is_mock_data: true,
            warning: Some(warning.into()),
            ..Self::completed(job_id, source, result)
        }
    }

    pub fn with_video_id(mut self, video_id: impl Into<String>) -> Self {
        self.video_id = Some(video_id.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::normalize;
    use serde_json::json;

    #[test]
    fn test_response_flattens_result() {
        let result = normalize(&json!({ "blog": { "title": "T" } })).unwrap();
        let response = SubmissionResponse::completed(
            JobId::from_string("job-1"),
            JobSource::Youtube,
            result,
        )
        .with_video_id("dQw4w9WgXcQ");

        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["jobId"], "job-1");
        assert_eq!(value["status"], "completed");
        assert_eq!(value["source"], "youtube");
        assert_eq!(value["videoId"], "dQw4w9WgXcQ");
        assert_eq!(value["blog"]["title"], "T");
        assert_eq!(value["seo"]["title"], "T");
        assert_eq!(value["isMockData"], false);
        assert!(value.get("warning").is_none());
    }

    #[test]
    fn test_degraded_response_is_marked() {
        let result = normalize(&json!({ "blog": {} })).unwrap();
        let response = SubmissionResponse::degraded(
            JobId::new(),
            JobSource::File,
            result,
            MOCK_DATA_WARNING,
        );

        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["isMockData"], true);
        assert_eq!(value["warning"], MOCK_DATA_WARNING);
        assert!(value.get("videoId").is_none());
    }
}
