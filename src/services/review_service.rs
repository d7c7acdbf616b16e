//! Domain service for the code review pass-through.
//!
//! Validates a submission locally (length cap, extension filter)
//! before anything is sent to the upstream model.

use serde::Serialize;
use thiserror::Error;

use crate::models::review::Tone;

/// Errors specific to review operations.
#[derive(Debug, Error)]
pub enum ReviewError {
    #[error("No code provided. Paste or upload some code before running a review.")]
    EmptyCode,

    #[error("Code exceeds {max} characters limit ({len} submitted). Please shorten it.")]
    InputTooLarge { len: usize, max: usize },

    #[error("File type '.{0}' is not supported")]
    UnsupportedExtension(String),

    #[error("No API key configured. Set OPENAI_API_KEY and restart.")]
    MissingApiKey,

    #[error("Upstream review service error: {0}")]
    Upstream(String),
}

/// A review submission. The filename is optional and only used for the
/// extension filter when the code came from an upload.
#[derive(Debug, Clone)]
pub struct ReviewRequest {
    pub code: String,
    pub tone: Option<String>,
    pub filename: Option<String>,
}

/// Free-form feedback text, conceptually partitioned into
/// Style/Errors/Clarity sections by the prompt.
#[derive(Debug, Clone, Serialize)]
pub struct ReviewFeedback {
    pub feedback: String,
    pub model: String,
    pub tone: String,
}

/// Domain service trait for reviews.
#[async_trait::async_trait]
pub trait ReviewService: Send + Sync {
    /// Validates the submission and forwards it upstream.
    ///
    /// # Errors
    ///
    /// Returns [`ReviewError::InputTooLarge`] before any network call
    /// when the code exceeds the configured cap.
    async fn review(&self, request: ReviewRequest) -> Result<ReviewFeedback, ReviewError>;

    /// The tones offered by the UI selector.
    fn tones(&self) -> &'static [Tone];
}
