//! API routes.

use axum::extract::{DefaultBodyLimit, OriginalUri};
use axum::http::Method;
use axum::middleware;
use axum::routing::{get, post};
use axum::Router;
use metrics_exporter_prometheus::PrometheusHandle;
use tracing::warn;

use crate::error::ApiError;
use crate::handlers::{
    export, health, job_status, ready, social_snippets, submit_youtube_url, upload_video,
};
use crate::metrics::metrics_middleware;
use crate::middleware::{
    cors_layer, rate_limit_middleware, request_context, response_headers, ClientRateLimiter,
};
use crate::state::AppState;

/// Create the API router.
pub fn create_router(state: AppState, metrics_handle: Option<PrometheusHandle>) -> Router {
    let max_body_size = state.config.max_body_size();

    let submission_routes = Router::new()
        .route("/upload-video", post(upload_video))
        .route("/youtube-url", post(submit_youtube_url))
        .route("/status/:job_id", get(job_status));

    // Pass-through to the AI service
    let content_routes = Router::new()
        .route("/social-snippets", post(social_snippets))
        .route("/export", post(export));

    let rate_limiter = ClientRateLimiter::new(state.config.rate_limit_rps);

    let api_routes = Router::new()
        .merge(submission_routes)
        .merge(content_routes)
        .fallback(api_not_found)
        .layer(middleware::from_fn_with_state(
            rate_limiter,
            rate_limit_middleware,
        ));

    let health_routes = Router::new()
        .route("/health", get(health))
        .route("/healthz", get(health))
        .route("/ready", get(ready));

    let metrics_routes = if let Some(handle) = metrics_handle {
        Router::new().route("/metrics", get(move || async move { handle.render() }))
    } else {
        Router::new()
    };

    Router::new()
        .nest("/api", api_routes)
        .merge(health_routes)
        .merge(metrics_routes)
        .fallback(not_found)
        // Oversized bodies fail inside the extractors, which answer with JSON
        .layer(DefaultBodyLimit::max(max_body_size))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(middleware::from_fn(response_headers))
        .layer(middleware::from_fn(request_context))
        .layer(cors_layer(&state.config.cors_origins))
        .with_state(state)
}

/// Unmatched `/api/*` routes.
async fn api_not_found(method: Method, OriginalUri(uri): OriginalUri) -> ApiError {
    warn!(method = %method, path = %uri.path(), "Unmatched API route");
    ApiError::not_found(format!("API route not found: {} {}", method, uri.path()))
}

async fn not_found() -> ApiError {
    ApiError::not_found("Not found")
}
