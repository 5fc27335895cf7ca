//! Prometheus metrics for the API server.

use std::sync::OnceLock;
use std::time::Instant;

use axum::body::Body;
use axum::http::{Request, Response};
use axum::middleware::Next;
use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};
use regex_lite::Regex;

use vblog_models::JobSource;

/// Install the Prometheus metrics recorder.
/// Returns a handle that can be used to render metrics.
pub fn init_metrics() -> Result<PrometheusHandle, BuildError> {
    PrometheusBuilder::new().install_recorder()
}

/// Metric names as constants for consistency.
pub mod names {
    // HTTP metrics
    pub const HTTP_REQUESTS_TOTAL: &str = "vblog_http_requests_total";
    pub const HTTP_REQUEST_DURATION_SECONDS: &str = "vblog_http_request_duration_seconds";
    pub const HTTP_REQUESTS_IN_FLIGHT: &str = "vblog_http_requests_in_flight";

    // Submission metrics
    pub const SUBMISSIONS_TOTAL: &str = "vblog_submissions_total";
    pub const SUBMISSION_DURATION_SECONDS: &str = "vblog_submission_duration_seconds";
    pub const UPLOAD_BYTES: &str = "vblog_upload_bytes";
    pub const ARTIFACT_CLEANUP_FAILURES_TOTAL: &str = "vblog_artifact_cleanup_failures_total";

    // Rate limiting metrics
    pub const RATE_LIMIT_HITS_TOTAL: &str = "vblog_rate_limit_hits_total";
}

/// How a submission ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionOutcome {
    /// Genuine AI output returned
    Completed,
    /// Placeholder content returned
    Degraded,
    /// Accepted but failed downstream
    Failed,
    /// Rejected by input validation
    Rejected,
}

impl SubmissionOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubmissionOutcome::Completed => "completed",
            SubmissionOutcome::Degraded => "degraded",
            SubmissionOutcome::Failed => "failed",
            SubmissionOutcome::Rejected => "rejected",
        }
    }
}

/// Record an HTTP request.
pub fn record_http_request(method: &str, path: &str, status: u16, duration_secs: f64) {
    let labels = [
        ("method", method.to_string()),
        ("path", sanitize_path(path)),
        ("status", status.to_string()),
    ];

    counter!(names::HTTP_REQUESTS_TOTAL, &labels).increment(1);
    histogram!(names::HTTP_REQUEST_DURATION_SECONDS, &labels).record(duration_secs);
}

/// Record the end of a submission.
pub fn record_submission(source: JobSource, outcome: SubmissionOutcome) {
    let labels = [
        ("source", source.as_str().to_string()),
        ("outcome", outcome.as_str().to_string()),
    ];
    counter!(names::SUBMISSIONS_TOTAL, &labels).increment(1);
}

/// Record end-to-end submission latency.
pub fn record_submission_duration(source: JobSource, duration_secs: f64) {
    let labels = [("source", source.as_str().to_string())];
    histogram!(names::SUBMISSION_DURATION_SECONDS, &labels).record(duration_secs);
}

/// Record the size of an accepted upload.
pub fn record_upload_bytes(bytes: u64) {
    histogram!(names::UPLOAD_BYTES).record(bytes as f64);
}

/// Record an artifact that could not be deleted.
pub fn record_cleanup_failure() {
    counter!(names::ARTIFACT_CLEANUP_FAILURES_TOTAL).increment(1);
}

/// Record rate limit hit.
pub fn record_rate_limit_hit(endpoint: &str) {
    let labels = [("endpoint", sanitize_path(endpoint))];
    counter!(names::RATE_LIMIT_HITS_TOTAL, &labels).increment(1);
}

/// Sanitize path for metrics labels (remove IDs, etc.).
fn sanitize_path(path: &str) -> String {
    static UUID: OnceLock<Regex> = OnceLock::new();
    static STATUS: OnceLock<Regex> = OnceLock::new();

    let uuid = UUID.get_or_init(|| {
        Regex::new(r"[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}")
            .expect("valid uuid pattern")
    });
    let status = STATUS
        .get_or_init(|| Regex::new(r"^/api/status/[^/]+").expect("valid status pattern"));

    let path = uuid.replace_all(path, ":id");
    let path = status.replace(&path, "/api/status/:job_id");
    path.to_string()
}

/// Metrics middleware for HTTP requests.
pub async fn metrics_middleware(request: Request<Body>, next: Next) -> Response<Body> {
    let method = request.method().to_string();
    let path = request.uri().path().to_string();
    let start = Instant::now();

    gauge!(names::HTTP_REQUESTS_IN_FLIGHT).increment(1.0);

    let response = next.run(request).await;

    gauge!(names::HTTP_REQUESTS_IN_FLIGHT).decrement(1.0);

    let status = response.status().as_u16();
    let duration = start.elapsed().as_secs_f64();

    record_http_request(&method, &path, status, duration);

    response
}
