//! AI client error types.

use thiserror::Error;

pub type AiResult<T> = Result<T, AiError>;

/// Longest response body kept in an error message.
const MAX_ERROR_BODY_LEN: usize = 500;

#[derive(Debug, Error)]
pub enum AiError {
    /// 5xx, 408 or 429 from the AI service
    #[error("AI service unavailable ({status}): {message}")]
    ServiceUnavailable { status: u16, message: String },

    /// Any other non-success status
    #[error("AI service rejected request ({status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Timeout after {0} seconds")]
    Timeout(u64),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Client configuration error: {0}")]
    Config(String),
}

impl AiError {
    /// Classify a non-success HTTP status.
    pub fn from_http_status(status: u16, body: &str) -> Self {
        let message = truncate(body);
        match status {
            408 | 429 | 500..=599 => AiError::ServiceUnavailable { status, message },
            _ => AiError::Rejected { status, message },
        }
    }

    /// Transport failures, timeouts, 408, 429 and 5xx are worth another attempt.
    /// Other 4xx responses and malformed bodies are not.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            AiError::ServiceUnavailable { .. } | AiError::Timeout(_) | AiError::Network(_)
        )
    }

    /// HTTP status returned by the AI service, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            AiError::ServiceUnavailable { status, .. } | AiError::Rejected { status, .. } => {
                Some(*status)
            }
            AiError::Network(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Short label for logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            AiError::ServiceUnavailable { .. } => "unavailable",
            AiError::Rejected { .. } => "rejected",
            AiError::InvalidResponse(_) => "invalid_response",
            AiError::Timeout(_) => "timeout",
            AiError::Network(_) => "network",
            AiError::Config(_) => "config",
        }
    }
}

fn truncate(body: &str) -> String {
    match body.char_indices().nth(MAX_ERROR_BODY_LEN) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_http_status_classification() {
        assert!(matches!(
            AiError::from_http_status(503, "down"),
            AiError::ServiceUnavailable { status: 503, .. }
        ));
        assert!(matches!(
            AiError::from_http_status(429, ""),
            AiError::ServiceUnavailable { status: 429, .. }
        ));
        assert!(matches!(
            AiError::from_http_status(408, ""),
            AiError::ServiceUnavailable { status: 408, .. }
        ));
        assert!(matches!(
            AiError::from_http_status(400, "bad"),
            AiError::Rejected { status: 400, .. }
        ));
        assert!(matches!(
            AiError::from_http_status(404, ""),
            AiError::Rejected { status: 404, .. }
        ));
    }

    #[test]
    fn test_is_retryable() {
        assert!(AiError::from_http_status(500, "").is_retryable());
        assert!(AiError::from_http_status(502, "").is_retryable());
        assert!(AiError::from_http_status(429, "").is_retryable());
        assert!(AiError::Timeout(120).is_retryable());

        assert!(!AiError::from_http_status(400, "").is_retryable());
        assert!(!AiError::from_http_status(422, "").is_retryable());
        assert!(!AiError::InvalidResponse("not json".into()).is_retryable());
        assert!(!AiError::Config("bad".into()).is_retryable());
    }

    #[test]
    fn test_status_and_kind() {
        let err = AiError::from_http_status(503, "down");
        assert_eq!(err.status(), Some(503));
        assert_eq!(err.kind(), "unavailable");
        assert_eq!(AiError::Timeout(5).status(), None);
        assert_eq!(AiError::Timeout(5).kind(), "timeout");
    }

    #[test]
    fn test_long_body_truncated() {
        let body = "x".repeat(2000);
        let err = AiError::from_http_status(500, &body);
        let message = err.to_string();
        assert!(message.len() < 600);
        assert!(message.ends_with("..."));
    }
}
