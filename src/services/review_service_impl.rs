//! OpenAI-backed implementation of the `ReviewService` trait.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::clients::openai::OpenAiClient;
use crate::config::Config;
use crate::models::review::{Tone, build_prompt};
use crate::services::review_service::{
    ReviewError, ReviewFeedback, ReviewRequest, ReviewService,
};

pub struct OpenAiReviewService {
    config: Arc<RwLock<Config>>,
    client: Arc<OpenAiClient>,
}

impl OpenAiReviewService {
    #[must_use]
    pub const fn new(config: Arc<RwLock<Config>>, client: Arc<OpenAiClient>) -> Self {
        Self { config, client }
    }
}

fn validate_filename(filename: &str, config: &Config) -> Result<(), ReviewError> {
    let extension = filename
        .rsplit_once('.')
        .map_or("", |(_, ext)| ext);

    if extension.is_empty() || !config.extension_allowed(extension) {
        return Err(ReviewError::UnsupportedExtension(extension.to_string()));
    }

    Ok(())
}

#[async_trait]
impl ReviewService for OpenAiReviewService {
    async fn review(&self, request: ReviewRequest) -> Result<ReviewFeedback, ReviewError> {
        let config = self.config.read().await.clone();

        if request.code.trim().is_empty() {
            return Err(ReviewError::EmptyCode);
        }

        let len = request.code.chars().count();
        let max = config.review.max_code_chars;
        if len > max {
            return Err(ReviewError::InputTooLarge { len, max });
        }

        if let Some(filename) = request.filename.as_deref() {
            validate_filename(filename, &config)?;
        }

        if config.openai.api_key.is_none() {
            return Err(ReviewError::MissingApiKey);
        }

        let tone_name = request.tone.as_deref();
        let instruction = Tone::instruction_for(tone_name);
        let prompt = build_prompt(instruction, &request.code);

        let feedback = self
            .client
            .chat_completion(&config.openai, &prompt)
            .await
            .map_err(|e| {
                tracing::warn!("Review call failed: {e}");
                ReviewError::Upstream(e.to_string())
            })?;

        tracing::info!(
            chars = len,
            tone = tone_name.unwrap_or("default"),
            model = %config.openai.model,
            "Review completed"
        );

        Ok(ReviewFeedback {
            feedback,
            model: config.openai.model,
            tone: tone_name
                .and_then(Tone::from_name)
                .map_or_else(|| "Default".to_string(), |t| t.name().to_string()),
        })
    }

    fn tones(&self) -> &'static [Tone] {
        &Tone::ALL
    }
}
