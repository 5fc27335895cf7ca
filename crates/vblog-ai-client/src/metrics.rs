//! AI client metrics.
//!
//! - Request counters by operation and outcome
//! - Latency histograms
//! - Retry counters

use metrics::{counter, histogram};

/// Metric name constants for consistency.
pub mod names {
    /// Total AI service requests by operation and outcome.
    pub const REQUESTS_TOTAL: &str = "vblog_ai_requests_total";

    /// Total retry attempts by operation.
    pub const RETRIES_TOTAL: &str = "vblog_ai_retries_total";

    /// Request latency in seconds by operation.
    pub const LATENCY_SECONDS: &str = "vblog_ai_request_duration_seconds";
}

/// Record one completed HTTP exchange with the AI service.
pub fn record_request(operation: &str, outcome: &str, latency_secs: f64) {
    counter!(
        names::REQUESTS_TOTAL,
        "operation" => operation.to_string(),
        "outcome" => outcome.to_string()
    )
    .increment(1);

    histogram!(
        names::LATENCY_SECONDS,
        "operation" => operation.to_string()
    )
    .record(latency_secs);
}

/// Record a retry attempt.
pub fn record_retry(operation: &str) {
    counter!(
        names::RETRIES_TOTAL,
        "operation" => operation.to_string()
    )
    .increment(1);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metric_names() {
        assert!(names::REQUESTS_TOTAL.contains("requests"));
        assert!(names::RETRIES_TOTAL.contains("retries"));
        assert!(names::LATENCY_SECONDS.ends_with("seconds"));
    }
}
