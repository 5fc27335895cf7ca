//! AI service HTTP client.

use std::str::FromStr;
use std::time::{Duration, Instant};

use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use vblog_models::MOCK_DATA_WARNING;

use crate::error::{AiError, AiResult};
use crate::metrics::record_request;
use crate::placeholder::placeholder_payload;
use crate::retry::{RetryPolicy, DEFAULT_MAX_RETRIES, DEFAULT_RETRY_DELAY};
use crate::types::{GatewayOutcome, HealthResponse, ProcessVideoRequest, ProcessYoutubeRequest};

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Lower bound for the URL submission budget, in seconds.
pub const MIN_URL_TIMEOUT_SECS: u64 = 120;

/// Upper bound for the URL submission budget, in seconds.
pub const MAX_URL_TIMEOUT_SECS: u64 = 180;

const PROCESS_VIDEO_PATH: &str = "/api/process-video";
const PROCESS_YOUTUBE_PATH: &str = "/api/process-youtube";
const HEALTH_PATH: &str = "/health";

/// Configuration for the AI client.
#[derive(Debug, Clone)]
pub struct AiClientConfig {
    /// Base URL of the AI service, without trailing slash
    pub base_url: String,
    /// Total budget for a file submission, retries included
    pub file_timeout: Duration,
    /// Total budget for a YouTube submission, retries included
    pub url_timeout: Duration,
    /// Budget for pass-through calls (snippets, export)
    pub proxy_timeout: Duration,
    pub health_timeout: Duration,
    pub connect_timeout: Duration,
    /// Retries after the first attempt for submissions
    pub max_retries: u32,
    /// Fixed delay between submission attempts
    pub retry_delay: Duration,
}

impl Default for AiClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            file_timeout: Duration::from_secs(300), // 5 minutes for transcription
            url_timeout: Duration::from_secs(MIN_URL_TIMEOUT_SECS),
            proxy_timeout: Duration::from_secs(60),
            health_timeout: Duration::from_secs(5),
            connect_timeout: Duration::from_secs(10),
            max_retries: DEFAULT_MAX_RETRIES,
            retry_delay: DEFAULT_RETRY_DELAY,
        }
    }
}

impl AiClientConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let base_url = std::env::var("AI_SERVICE_URL")
            .or_else(|_| std::env::var("PYTHON_SERVICE_URL"))
            .unwrap_or(defaults.base_url);

        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            file_timeout: env_parse("AI_FILE_TIMEOUT")
                .map(Duration::from_secs)
                .unwrap_or(defaults.file_timeout),
            url_timeout: Duration::from_secs(clamp_url_timeout(
                env_parse("AI_URL_TIMEOUT").unwrap_or(MIN_URL_TIMEOUT_SECS),
            )),
            proxy_timeout: env_parse("AI_PROXY_TIMEOUT")
                .map(Duration::from_secs)
                .unwrap_or(defaults.proxy_timeout),
            health_timeout: defaults.health_timeout,
            connect_timeout: defaults.connect_timeout,
            max_retries: env_parse("AI_SERVICE_RETRIES").unwrap_or(defaults.max_retries),
            retry_delay: env_parse("AI_RETRY_DELAY_MS")
                .map(Duration::from_millis)
                .unwrap_or(defaults.retry_delay),
        }
    }
}

/// Keep the URL submission budget within 120-180 seconds.
pub fn clamp_url_timeout(secs: u64) -> u64 {
    secs.clamp(MIN_URL_TIMEOUT_SECS, MAX_URL_TIMEOUT_SECS)
}

fn env_parse<T: FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|s| s.trim().parse().ok())
}

/// Client for the external AI content service.
#[derive(Debug, Clone)]
pub struct AiClient {
    http: Client,
    config: AiClientConfig,
    retry: RetryPolicy,
}

impl AiClient {
    /// Create a new AI client. The retry policy is built from the config.
    pub fn new(config: AiClientConfig) -> AiResult<Self> {
        // Timeouts are applied per request, so no client-wide timeout here.
        let http = Client::builder()
            .connect_timeout(config.connect_timeout)
            .build()
            .map_err(|e| AiError::Config(e.to_string()))?;

        let retry = RetryPolicy::fixed(config.max_retries, config.retry_delay);

        Ok(Self { http, config, retry })
    }

    /// Create from environment variables.
    pub fn from_env() -> AiResult<Self> {
        Self::new(AiClientConfig::from_env())
    }

    /// Replace the retry policy used for submissions.
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn config(&self) -> &AiClientConfig {
        &self.config
    }

    /// Check if the AI service is healthy.
    pub async fn health_check(&self) -> AiResult<bool> {
        let url = self.endpoint(HEALTH_PATH);

        match self
            .http
            .get(&url)
            .timeout(self.config.health_timeout)
            .send()
            .await
        {
            Ok(response) if response.status().is_success() => {
                let health: HealthResponse = response
                    .json()
                    .await
                    .map_err(|e| AiError::InvalidResponse(e.to_string()))?;
                Ok(health.status == "healthy" || health.status == "ok")
            }
            Ok(response) => {
                warn!("AI service health check failed: {}", response.status());
                Ok(false)
            }
            Err(e) => {
                warn!("AI service health check error: {}", e);
                Ok(false)
            }
        }
    }

    /// Submit a stored upload for processing.
    ///
    /// Never fails: if every attempt fails (transport error, timeout,
    /// non-success status, unparseable body) the outcome is a placeholder
    /// payload marked as degraded.
    pub async fn process_file(&self, request: &ProcessVideoRequest) -> GatewayOutcome {
        debug!(
            job_id = %request.job_id,
            file = %request.filename,
            "Sending file to AI service"
        );

        let result = self
            .submit(
                "process_video",
                PROCESS_VIDEO_PATH,
                request,
                self.config.file_timeout,
            )
            .await;

        match result {
            Ok(payload) => {
                info!(job_id = %request.job_id, "AI service processed file");
                GatewayOutcome::Live(payload)
            }
            Err(e) => {
                warn!(
                    job_id = %request.job_id,
                    error = %e,
                    kind = e.kind(),
                    "AI service unavailable, using placeholder content"
                );
                GatewayOutcome::Degraded {
                    payload: placeholder_payload(),
                    warning: MOCK_DATA_WARNING.to_string(),
                    reason: e.to_string(),
                }
            }
        }
    }

    /// Submit a YouTube URL for processing.
    pub async fn process_url(&self, request: &ProcessYoutubeRequest) -> AiResult<Value> {
        debug!(job_id = %request.job_id, url = %request.youtube_url, "Sending URL to AI service");

        let payload = self
            .submit(
                "process_youtube",
                PROCESS_YOUTUBE_PATH,
                request,
                self.config.url_timeout,
            )
            .await?;

        info!(job_id = %request.job_id, "AI service processed URL");
        Ok(payload)
    }

    /// Forward a JSON body to an AI service endpoint and return its JSON reply.
    /// Single attempt.
    pub async fn forward(&self, operation: &str, path: &str, body: &Value) -> AiResult<Value> {
        self.post_json(operation, path, body, self.config.proxy_timeout)
            .await
    }

    /// Run the retry policy under a single deadline. Each attempt is also
    /// capped at `budget`, so a slow first attempt leaves no room for a retry.
    async fn submit<B: Serialize + ?Sized>(
        &self,
        operation: &str,
        path: &str,
        body: &B,
        budget: Duration,
    ) -> AiResult<Value> {
        let attempts = self
            .retry
            .run(operation, || self.post_json(operation, path, body, budget));

        match tokio::time::timeout(budget, attempts).await {
            Ok(result) => result,
            Err(_) => {
                warn!(
                    operation = %operation,
                    budget_ms = budget.as_millis() as u64,
                    "AI request budget exhausted"
                );
                Err(AiError::Timeout(budget.as_secs()))
            }
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }

    /// One HTTP exchange, bounded by `timeout`. Never retries.
    async fn post_json<B: Serialize + ?Sized>(
        &self,
        operation: &str,
        path: &str,
        body: &B,
        timeout: Duration,
    ) -> AiResult<Value> {
        let url = self.endpoint(path);
        let started = Instant::now();

        let result = self.exchange(&url, body, timeout).await;

        let outcome = match &result {
            Ok(_) => "success",
            Err(e) => e.kind(),
        };
        record_request(operation, outcome, started.elapsed().as_secs_f64());

        result
    }

    async fn exchange<B: Serialize + ?Sized>(
        &self,
        url: &str,
        body: &B,
        timeout: Duration,
    ) -> AiResult<Value> {
        let response = self
            .http
            .post(url)
            .timeout(timeout)
            .json(body)
            .send()
            .await
            .map_err(|e| transport_error(e, timeout))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AiError::from_http_status(status.as_u16(), &body));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| transport_error(e, timeout))?;

        serde_json::from_slice(&bytes).map_err(|e| AiError::InvalidResponse(e.to_string()))
    }
}

fn transport_error(e: reqwest::Error, timeout: Duration) -> AiError {
    if e.is_timeout() {
        AiError::Timeout(timeout.as_secs())
    } else {
        AiError::Network(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use vblog_models::JobId;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(base_url: &str) -> AiClient {
        AiClient::new(AiClientConfig {
            base_url: base_url.to_string(),
            file_timeout: Duration::from_secs(5),
            url_timeout: Duration::from_secs(5),
            retry_delay: Duration::ZERO,
            ..Default::default()
        })
        .unwrap()
    }

    fn video_request() -> ProcessVideoRequest {
        ProcessVideoRequest::new(
            JobId::from_string("job-1"),
            "uploads/talk-1.mp4",
            "talk-1.mp4",
        )
    }

    #[test]
    fn test_config_defaults() {
        let config = AiClientConfig::default();
        assert_eq!(config.base_url, "http://localhost:8000");
        assert_eq!(config.file_timeout, Duration::from_secs(300));
        assert_eq!(config.url_timeout, Duration::from_secs(120));
        assert_eq!(config.max_retries, 1);
        assert_eq!(config.retry_delay, Duration::from_secs(1));
    }

    #[test]
    fn test_clamp_url_timeout() {
        assert_eq!(clamp_url_timeout(30), 120);
        assert_eq!(clamp_url_timeout(150), 150);
        assert_eq!(clamp_url_timeout(600), 180);
    }

    #[tokio::test]
    async fn test_process_file_live() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/process-video"))
            .and(body_json(json!({
                "jobId": "job-1",
                "videoPath": "uploads/talk-1.mp4",
                "filename": "talk-1.mp4"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "blog": { "title": "Real" }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let outcome = client_for(&server.uri()).process_file(&video_request()).await;

        assert_eq!(outcome, GatewayOutcome::Live(json!({ "blog": { "title": "Real" } })));
    }

    #[tokio::test]
    async fn test_process_file_degrades_after_retry() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/process-video"))
            .respond_with(ResponseTemplate::new(503))
            .expect(2)
            .mount(&server)
            .await;

        let outcome = client_for(&server.uri()).process_file(&video_request()).await;

        match outcome {
            GatewayOutcome::Degraded {
                payload,
                warning,
                reason,
            } => {
                assert_eq!(payload, placeholder_payload());
                assert_eq!(warning, MOCK_DATA_WARNING);
                assert!(reason.contains("503"), "{}", reason);
            }
            other => panic!("expected degraded outcome, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_process_file_client_error_not_retried() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/process-video"))
            .respond_with(ResponseTemplate::new(400).set_body_string("bad request"))
            .expect(1)
            .mount(&server)
            .await;

        let outcome = client_for(&server.uri()).process_file(&video_request()).await;
        assert!(outcome.is_degraded());
    }

    #[tokio::test]
    async fn test_process_file_unparseable_body_degrades() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/process-video"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .expect(1)
            .mount(&server)
            .await;

        let outcome = client_for(&server.uri()).process_file(&video_request()).await;
        assert!(outcome.is_degraded());
    }

    #[tokio::test]
    async fn test_process_file_unreachable_degrades() {
        // Nothing listens on the discard port.
        let outcome = client_for("http://127.0.0.1:9")
            .with_retry_policy(RetryPolicy::none())
            .process_file(&video_request())
            .await;

        assert!(outcome.is_degraded());
        assert_eq!(outcome.payload()["blog"]["title"], "Video Content Summary");
    }

    #[tokio::test]
    async fn test_process_file_timeout_stays_within_budget() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/process-video"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "blog": {} }))
                    .set_delay(Duration::from_secs(3)),
            )
            .mount(&server)
            .await;

        // Default policy still allows one retry.
        let client = AiClient::new(AiClientConfig {
            base_url: server.uri(),
            file_timeout: Duration::from_millis(500),
            retry_delay: Duration::ZERO,
            ..Default::default()
        })
        .unwrap();

        let started = Instant::now();
        let outcome = client.process_file(&video_request()).await;
        let elapsed = started.elapsed();

        assert!(outcome.is_degraded());
        assert!(
            elapsed < Duration::from_millis(900),
            "took {:?} for a 500ms budget",
            elapsed
        );
    }

    #[tokio::test]
    async fn test_process_url_success() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/process-youtube"))
            .and(body_json(json!({
                "jobId": "job-2",
                "youtubeUrl": "https://youtu.be/dQw4w9WgXcQ"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "blog": { "title": "T", "sections": [] },
                "seo": {}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let request =
            ProcessYoutubeRequest::new(JobId::from_string("job-2"), "https://youtu.be/dQw4w9WgXcQ");
        let payload = client_for(&server.uri()).process_url(&request).await.unwrap();

        assert_eq!(payload["blog"]["title"], "T");
    }

    #[tokio::test]
    async fn test_process_url_timeout() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/process-youtube"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "blog": {} }))
                    .set_delay(Duration::from_secs(2)),
            )
            .mount(&server)
            .await;

        let client = AiClient::new(AiClientConfig {
            base_url: server.uri(),
            url_timeout: Duration::from_millis(200),
            ..Default::default()
        })
        .unwrap()
        .with_retry_policy(RetryPolicy::none());

        let request = ProcessYoutubeRequest::new(JobId::new(), "https://youtu.be/dQw4w9WgXcQ");
        let err = client.process_url(&request).await.unwrap_err();

        assert!(matches!(err, AiError::Timeout(_)), "{:?}", err);
    }

    #[tokio::test]
    async fn test_process_url_rejected_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/process-youtube"))
            .respond_with(ResponseTemplate::new(422).set_body_string("private video"))
            .expect(1)
            .mount(&server)
            .await;

        let request = ProcessYoutubeRequest::new(JobId::new(), "https://youtu.be/dQw4w9WgXcQ");
        let err = client_for(&server.uri())
            .process_url(&request)
            .await
            .unwrap_err();

        assert_eq!(err.status(), Some(422));
        assert!(!err.is_retryable());
    }

    #[tokio::test]
    async fn test_forward_passes_body_through() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/social-snippets"))
            .and(body_json(json!({ "blog": { "title": "T" } })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "twitter": { "singleTweet": "hi" }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let reply = client_for(&server.uri())
            .forward(
                "social_snippets",
                "/api/social-snippets",
                &json!({ "blog": { "title": "T" } }),
            )
            .await
            .unwrap();

        assert_eq!(reply["twitter"]["singleTweet"], "hi");
    }

    #[tokio::test]
    async fn test_health_check() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/health"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "ok" })))
            .mount(&server)
            .await;

        assert!(client_for(&server.uri()).health_check().await.unwrap());
        assert!(!client_for("http://127.0.0.1:9").health_check().await.unwrap());
    }
}
