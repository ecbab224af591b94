//! OpenAI Whisper transcription over the audio transcriptions endpoint.

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use std::path::Path;
use tokio::fs;
use tracing::{debug, error, info};

use super::TranscriptionProvider;

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

pub struct OpenAiWhisperProvider {
    client: reqwest::Client,
    api_key: String,
    endpoint: String,
    model: String,
}

impl OpenAiWhisperProvider {
    pub fn new(api_key: String, api_base: &str, model: String) -> Self {
        let endpoint = format!("{}/audio/transcriptions", api_base.trim_end_matches('/'));

        info!("Initialized OpenAI Whisper provider with endpoint: {}", endpoint);

        Self {
            client: reqwest::Client::new(),
            api_key,
            endpoint,
            model,
        }
    }
}

#[async_trait]
impl TranscriptionProvider for OpenAiWhisperProvider {
    fn name(&self) -> &'static str {
        "OpenAI Whisper"
    }

    async fn transcribe(&self, audio_path: &Path) -> Result<String> {
        info!("Transcribing audio file via OpenAI API: {:?}", audio_path);

        let bytes = fs::read(audio_path)
            .await
            .with_context(|| format!("Failed to read audio file {:?}", audio_path))?;

        let file_name = audio_path
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_else(|| "audio.wav".to_string());

        let part = reqwest::multipart::Part::bytes(bytes).file_name(file_name);
        let form = reqwest::multipart::Form::new()
            .part("file", part)
            .text("model", self.model.clone())
            .text("response_format", "text");

        debug!("Sending transcription request with model {}", self.model);

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .multipart(form)
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
                "OpenAI transcription request failed with status {}: {}",
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
                "OpenAI transcription request failed with status {}: {}",
                status,
                response_text
            ));
        }

        // With response_format=text the body is the transcript itself.
        let text = response_text.trim().to_string();
        info!("Transcription complete: {} chars", text.len());

        Ok(text)
    }
}
