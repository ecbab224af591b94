use anyhow::Result;
use async_trait::async_trait;

pub mod openai_chat;

pub use openai_chat::OpenAiChatProvider;

/// A remote structured-generation backend. Returns the model's raw text
/// response; the summarization stage owns retry, parsing, and fallback.
#[async_trait]
pub trait SummaryProvider: Send + Sync {
    fn name(&self) -> &'static str;

    async fn complete(&self, system: &str, prompt: &str) -> Result<String>;
}
