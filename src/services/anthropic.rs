use reqwest::Client;
use serde_json::{json, Value};
use std::time::Duration;
use thiserror::Error;

use crate::config::ModelSettings;

const MESSAGES_PATH: &str = "/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Errors that can occur when calling the model provider
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("API returned error: {0}")]
    ApiError(String),

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),
}

/// Client for the hosted chat-completion endpoint
///
/// Stateless and synchronous per call: one prompt in, the first text block
/// of the completion out. No retries; the only timeout is the one configured
/// on the underlying HTTP client.
pub struct AnthropicClient {
    base_url: String,
    api_key: String,
    model_id: String,
    client: Client,
}

impl AnthropicClient {
    /// Create a new client from model settings
    pub fn new(settings: &ModelSettings) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.request_timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            api_key: settings.api_key.clone(),
            model_id: settings.model_id.clone(),
            client,
        }
    }

    /// Submit one prompt and return the first text block of the completion
    pub async fn complete(&self, prompt: &str, max_tokens: u32) -> Result<String, GatewayError> {
        let url = format!("{}{}", self.base_url, MESSAGES_PATH);

        let payload = json!({
            "model": self.model_id,
            "max_tokens": max_tokens,
            "messages": [
                { "role": "user", "content": prompt }
            ],
        });

        tracing::debug!("Submitting prompt to {} ({} chars)", self.model_id, prompt.len());

        let response = self
            .client
            .post(&url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&payload)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read body".to_string());
            tracing::error!("Model call failed: {} - {}", status, body);
            return Err(GatewayError::ApiError(format!(
                "Model call failed: {}",
                status
            )));
        }

        let body: Value = response.json().await?;

        let text = body
            .get("content")
            .and_then(Value::as_array)
            .and_then(|blocks| {
                blocks
                    .iter()
                    .find_map(|block| block.get("text").and_then(Value::as_str))
            })
            .ok_or_else(|| {
                GatewayError::InvalidResponse("Missing text content block".to_string())
            })?;

        Ok(text.to_string())
    }
}
