//! Transcription stage: audio artifact → raw transcript text.
//!
//! The stage never fails outward. Without a configured provider it returns
//! the demo transcript immediately; with one it retries a bounded number of
//! times with linear backoff and falls back to the demo transcript when every
//! attempt fails.

use std::path::Path;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{info, warn};

use crate::config::PipelineConfig;
use crate::demo::DEMO_TRANSCRIPT;

pub mod providers;

pub use providers::{OpenAiWhisperProvider, TranscriptionProvider};

pub struct TranscriptionStage {
    provider: Option<Box<dyn TranscriptionProvider>>,
    attempts: u32,
    backoff_base: Duration,
}

impl TranscriptionStage {
    pub fn new(provider: Option<Box<dyn TranscriptionProvider>>, config: &PipelineConfig) -> Self {
        Self {
            provider,
            attempts: config.retry_attempts.max(1),
            backoff_base: Duration::from_secs(config.retry_backoff_seconds),
        }
    }

    #[cfg(test)]
    fn with_backoff(mut self, backoff_base: Duration) -> Self {
        self.backoff_base = backoff_base;
        self
    }

    /// Transcribe the audio artifact. Always yields text; provider errors are
    /// absorbed into the demo fallback. The artifact is only read, never
    /// deleted here.
    pub async fn transcribe(&self, audio_path: &Path) -> String {
        let Some(provider) = &self.provider else {
            info!("No transcription provider configured, using demo transcript");
            return DEMO_TRANSCRIPT.to_string();
        };

        for attempt in 1..=self.attempts {
            info!(
                "Transcription attempt {}/{} via {}",
                attempt,
                self.attempts,
                provider.name()
            );

            match provider.transcribe(audio_path).await {
                Ok(text) => {
                    info!("Transcription successful: {} chars", text.len());
                    return text;
                }
                Err(e) => {
                    warn!("Transcription attempt {} failed: {}", attempt, e);
                    if attempt < self.attempts {
                        sleep(self.backoff_base * attempt).await;
                    }
                }
            }
        }

        warn!("All transcription attempts failed, falling back to demo transcript");
        DEMO_TRANSCRIPT.to_string()
    }
}
