//! Client for the external AI content service.
//!
//! The AI service does the transcription, summarization and SEO work. This
//! crate wraps its HTTP API with per-request timeouts and an injectable
//! [`RetryPolicy`]. File submissions degrade to placeholder content when the
//! service is unavailable; URL submissions surface a typed [`AiError`].

pub mod client;
pub mod error;
pub mod metrics;
pub mod placeholder;
pub mod retry;
pub mod types;

pub use client::{AiClient, AiClientConfig};
pub use error::{AiError, AiResult};
pub use placeholder::placeholder_payload;
pub use retry::RetryPolicy;
pub use types::{GatewayOutcome, HealthResponse, ProcessVideoRequest, ProcessYoutubeRequest};
