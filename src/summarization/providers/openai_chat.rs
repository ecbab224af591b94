//! OpenAI chat completions client for summary generation.

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, error, info};

use super::SummaryProvider;

const TEMPERATURE: f64 = 0.3;
const MAX_TOKENS: u32 = 2000;

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: String,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: String,
    r#type: Option<String>,
    code: Option<String>,
}

pub struct OpenAiChatProvider {
    client: reqwest::Client,
    api_key: String,
    endpoint: String,
    model: String,
}

impl OpenAiChatProvider {
    pub fn new(api_key: String, api_base: &str, model: String) -> Self {
        let endpoint = format!("{}/chat/completions", api_base.trim_end_matches('/'));

        info!("Initialized OpenAI chat provider with endpoint: {}", endpoint);

        Self {
            client: reqwest::Client::new(),
            api_key,
            endpoint,
            model,
        }
    }
}

#[async_trait]
impl SummaryProvider for OpenAiChatProvider {
    fn name(&self) -> &'static str {
        "OpenAI Chat"
    }

    async fn complete(&self, system: &str, prompt: &str) -> Result<String> {
        let body = json!({
            "model": self.model,
            "messages": [
                Message { role: "system", content: system },
                Message { role: "user", content: prompt },
            ],
            "temperature": TEMPERATURE,
            "max_tokens": MAX_TOKENS,
        });

        debug!("Sending chat completion request with model {}", self.model);

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .context("Failed to send request to OpenAI API")?;

        let status = response.status();
        let response_text = response
            .text()
            .await
            .context("Failed to read response body")?;

        if !status.is_success() {
            error!(
                "OpenAI chat request failed with status {}: {}",
                status, response_text
            );

            if let Ok(error_response) = serde_json::from_str::<ErrorResponse>(&response_text) {
                return Err(anyhow::anyhow!(
                    "OpenAI API error: {} (type: {:?}, code: {:?})",
                    error_response.error.message,
                    error_response.error.r#type,
                    error_response.error.code
                ));
            }

            return Err(anyhow::anyhow!(
                "OpenAI chat request failed with status {}: {}",
                status,
                response_text
            ));
        }

        let chat: ChatResponse = serde_json::from_str(&response_text)
            .context("Failed to parse chat completion response")?;

        let content = chat
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .context("Chat completion response contained no choices")?;

        info!("Chat completion received: {} chars", content.len());

        Ok(content)
    }
}
