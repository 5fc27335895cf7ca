//! Pass-through endpoints to the AI service.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use serde_json::Value;
use tracing::error;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// `POST /api/social-snippets`
pub async fn social_snippets(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Json<Value>> {
    let Json(body) = payload?;
    forward(
        &state,
        "social_snippets",
        "/api/social-snippets",
        &body,
        "Failed to generate snippets",
    )
    .await
}

/// `POST /api/export`
pub async fn export(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Json<Value>> {
    let Json(body) = payload?;
    forward(&state, "export", "/api/export", &body, "Failed to export content").await
}

async fn forward(
    state: &AppState,
    operation: &str,
    path: &str,
    body: &Value,
    failure: &str,
) -> ApiResult<Json<Value>> {
    state
        .ai_client
        .forward(operation, path, body)
        .await
        .map(Json)
        .map_err(|e| {
            error!(operation = %operation, error = %e, "AI service pass-through failed");
            ApiError::Proxy(failure.to_string())
        })
}
