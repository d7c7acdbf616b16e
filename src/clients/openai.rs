//! Client for OpenAI-compatible chat-completions APIs.

use anyhow::{Result, anyhow};
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::config::OpenAiConfig;

#[derive(Debug, Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
    #[serde(rename = "type", default)]
    error_type: Option<String>,
}

#[derive(Clone)]
pub struct OpenAiClient {
    client: Client,
}

impl OpenAiClient {
    #[must_use]
    pub const fn with_shared_client(client: Client) -> Self {
        Self { client }
    }

    /// Sends a single user message and returns the completion text.
    /// The caller supplies the prompt; tone handling happens upstream
    /// of this client.
    pub async fn chat_completion(&self, config: &OpenAiConfig, prompt: &str) -> Result<String> {
        let api_key = config
            .api_key
            .as_deref()
            .ok_or_else(|| anyhow!("No API key configured"))?;

        let request = ChatCompletionRequest {
            model: config.model.clone(),
            messages: vec![ChatMessage {
                role: "user",
                content: prompt.to_string(),
            }],
            temperature: config.temperature,
        };

        let url = format!("{}/chat/completions", config.base_url.trim_end_matches('/'));

        tracing::debug!(model = %config.model, "Sending chat completion request");

        let response = self
            .client
            .post(&url)
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();

            if let Ok(parsed) = serde_json::from_str::<ErrorResponse>(&body) {
                let kind = parsed.error.error_type.unwrap_or_default();
                return Err(anyhow!("API error ({kind}): {}", parsed.error.message));
            }

            let hint = match status.as_u16() {
                401 => "invalid API key",
                429 => "rate limit or quota exceeded",
                _ => "request failed",
            };
            return Err(anyhow!("API returned {status} ({hint}): {body}"));
        }

        let completion: ChatCompletionResponse = response.json().await?;

        completion
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|content| !content.is_empty())
            .ok_or_else(|| anyhow!("Empty completion in response"))
    }
}
