//! Review endpoints: the pass-through to the upstream model and the
//! tone list for the UI selector.

use axum::{Json, extract::State};
use std::sync::Arc;

use super::{ApiError, ApiResponse, AppState, ReviewRequestDto, ToneDto};
use crate::services::{ReviewError, ReviewFeedback, ReviewRequest};

impl From<ReviewError> for ApiError {
    fn from(err: ReviewError) -> Self {
        match err {
            ReviewError::EmptyCode | ReviewError::UnsupportedExtension(_) => {
                Self::ValidationError(err.to_string())
            }
            ReviewError::InputTooLarge { .. } => Self::PayloadTooLarge(err.to_string()),
            ReviewError::MissingApiKey => Self::InternalError(err.to_string()),
            ReviewError::Upstream(msg) => Self::review_upstream_error(msg),
        }
    }
}

/// POST /review
/// Validate the submission and forward it to the text-generation
/// service. Oversized or empty code never leaves the process.
pub async fn run_review(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<ReviewRequestDto>,
) -> Result<Json<ApiResponse<ReviewFeedback>>, ApiError> {
    let feedback = state
        .review_service()
        .review(ReviewRequest {
            code: payload.code,
            tone: payload.tone,
            filename: payload.filename,
        })
        .await?;

    Ok(Json(ApiResponse::success(feedback)))
}

/// GET /review/tones
/// Enumerate the tone presets
pub async fn list_tones(
    State(state): State<Arc<AppState>>,
) -> Json<ApiResponse<Vec<ToneDto>>> {
    let tones = state
        .review_service()
        .tones()
        .iter()
        .map(|t| ToneDto {
            name: t.name(),
            instruction: t.instruction(),
        })
        .collect();

    Json(ApiResponse::success(tones))
}
