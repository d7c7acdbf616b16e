//! System status endpoint.

use axum::{Json, extract::State};
use std::sync::Arc;

use super::{ApiError, ApiResponse, AppState, SystemStatus};

/// GET /system/status
pub async fn get_status(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<SystemStatus>>, ApiError> {
    let config = state.shared.config().await;

    let user_count = state
        .shared
        .store
        .count_users()
        .await
        .map_err(|e| ApiError::internal(format!("Failed to count users: {e}")))?;

    Ok(Json(ApiResponse::success(SystemStatus {
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime: state.start_time.elapsed().as_secs(),
        user_count,
        api_key_configured: config.openai.api_key.is_some(),
        model: config.openai.model,
        max_code_chars: config.review.max_code_chars,
        allowed_extensions: config.review.allowed_extensions,
    })))
}
