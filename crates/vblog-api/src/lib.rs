//! Axum HTTP API server for video-to-blog submissions.
//!
//! This crate provides:
//! - File upload and YouTube link submission endpoints
//! - Pass-through endpoints for social snippets and export
//! - Rate limiting and security headers
//! - Prometheus metrics

pub mod config;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod routes;
pub mod services;
pub mod state;

pub use config::ApiConfig;
pub use error::{ApiError, ApiResult};
pub use routes::create_router;
pub use services::{FileUpload, SubmissionService};
pub use state::AppState;
