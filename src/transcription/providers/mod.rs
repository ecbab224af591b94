use anyhow::Result;
use async_trait::async_trait;
use std::path::Path;

pub mod openai_whisper;

pub use openai_whisper::OpenAiWhisperProvider;

/// A remote speech-to-text backend. Implementations are fallible; the
/// transcription stage owns retry and fallback on top of this.
#[async_trait]
pub trait TranscriptionProvider: Send + Sync {
    fn name(&self) -> &'static str;

    async fn transcribe(&self, audio_path: &Path) -> Result<String>;
}
