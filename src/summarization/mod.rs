//! Summarization stage: transcript → structured summary.
//!
//! Never fails outward. A transcript carrying the demo sentinel (or a missing
//! provider) short-circuits to the demo summary. Otherwise the stage builds a
//! bounded prompt, calls the provider with bounded linear-backoff retry, and
//! strictly parses the response after fence stripping; a malformed response
//! falls back to the demo summary instead of retrying.

use std::time::Duration;
use tokio::time::sleep;
use tracing::{info, warn};

use crate::config::PipelineConfig;
use crate::demo::{demo_summary, DEMO_SENTINEL};
use crate::meeting::StructuredSummary;

pub mod parse;
pub mod prompt;
pub mod providers;

pub use parse::{parse_summary_response, strip_code_fences};
pub use prompt::{build_prompt, SYSTEM_INSTRUCTION};
pub use providers::{OpenAiChatProvider, SummaryProvider};

pub struct SummarizationStage {
    provider: Option<Box<dyn SummaryProvider>>,
    attempts: u32,
    backoff_base: Duration,
    transcript_cap: usize,
}

impl SummarizationStage {
    pub fn new(provider: Option<Box<dyn SummaryProvider>>, config: &PipelineConfig) -> Self {
        Self {
            provider,
            attempts: config.retry_attempts.max(1),
            backoff_base: Duration::from_secs(config.retry_backoff_seconds),
            transcript_cap: config.transcript_cap_chars,
        }
    }

    #[cfg(test)]
    fn with_backoff(mut self, backoff_base: Duration) -> Self {
        self.backoff_base = backoff_base;
        self
    }

    /// Summarize a transcript. Always yields a structured summary; provider
    /// and parse failures are absorbed into the demo fallback.
    pub async fn summarize(&self, transcript: &str) -> StructuredSummary {
        if transcript.contains(DEMO_SENTINEL) {
            info!("Transcript is demo data, using demo summary");
            return demo_summary();
        }

        let Some(provider) = &self.provider else {
            info!("No summarization provider configured, using demo summary");
            return demo_summary();
        };

        let prompt = build_prompt(transcript, self.transcript_cap);

        for attempt in 1..=self.attempts {
            info!(
                "Summary generation attempt {}/{} via {}",
                attempt,
                self.attempts,
                provider.name()
            );

            match provider.complete(SYSTEM_INSTRUCTION, &prompt).await {
                Ok(response) => match parse_summary_response(&response) {
                    Ok(structured) => {
                        info!(
                            "Summary generated with {} action items",
                            structured.action_items.len()
                        );
                        return structured;
                    }
                    Err(e) => {
                        // The call itself succeeded; a garbled payload is not
                        // worth another round trip.
                        warn!("Failed to parse summary response, using demo summary: {}", e);
                        return demo_summary();
                    }
                },
                Err(e) => {
                    warn!("Summary generation attempt {} failed: {}", attempt, e);
                    if attempt < self.attempts {
                        sleep(self.backoff_base * attempt).await;
                    }
                }
            }
        }

        warn!("All summary generation attempts failed, falling back to demo summary");
        demo_summary()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::demo::DEMO_TRANSCRIPT;
    use anyhow::bail;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;
    use tokio::time::Instant;

    struct ScriptedProvider {
        calls: Arc<AtomicU32>,
        response: Option<String>,
    }

    #[async_trait]
    impl SummaryProvider for ScriptedProvider {
        fn name(&self) -> &'static str {
            "scripted"
        }

        async fn complete(&self, _system: &str, _prompt: &str) -> anyhow::Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.response {
                Some(response) => Ok(response.clone()),
                None => bail!("provider down"),
            }
        }
    }

    struct PromptCapture {
        seen: Arc<tokio::sync::Mutex<Vec<String>>>,
    }

    #[async_trait]
    impl SummaryProvider for PromptCapture {
        fn name(&self) -> &'static str {
            "capture"
        }

        async fn complete(&self, _system: &str, prompt: &str) -> anyhow::Result<String> {
            self.seen.lock().await.push(prompt.to_string());
            Ok(r#"{"summary": "captured"}"#.to_string())
        }
    }

    fn stage_with(provider: Option<Box<dyn SummaryProvider>>) -> SummarizationStage {
        SummarizationStage::new(provider, &PipelineConfig::default())
            .with_backoff(Duration::from_millis(10))
    }

    #[tokio::test]
    async fn test_demo_transcript_short_circuits() {
        let calls = Arc::new(AtomicU32::new(0));
        let stage = stage_with(Some(Box::new(ScriptedProvider {
            calls: calls.clone(),
            response: Some(r#"{"summary": "should not be used"}"#.to_string()),
        })));

        let summary = stage.summarize(DEMO_TRANSCRIPT).await;
        assert_eq!(summary, demo_summary());
        // No real call wasted on synthetic input.
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_no_provider_returns_demo_summary() {
        let stage = stage_with(None);
        let summary = stage.summarize("We talked about hiring.").await;
        assert_eq!(summary, demo_summary());
    }

    #[tokio::test]
    async fn test_valid_response_parsed() {
        let stage = stage_with(Some(Box::new(ScriptedProvider {
            calls: Arc::new(AtomicU32::new(0)),
            response: Some(
                r#"```json
{"summary": "Hiring sync", "keyDecisions": ["Open two roles"], "actionItems": [{"task": "Post listings"}]}
```"#
                    .to_string(),
            ),
        })));

        let summary = stage.summarize("We talked about hiring.").await;
        assert_eq!(summary.summary, "Hiring sync");
        assert_eq!(summary.key_decisions, vec!["Open two roles".to_string()]);
        assert_eq!(summary.action_items[0].owner, "TBD");
    }

    #[tokio::test]
    async fn test_malformed_response_falls_back_without_retry() {
        let calls = Arc::new(AtomicU32::new(0));
        let stage = stage_with(Some(Box::new(ScriptedProvider {
            calls: calls.clone(),
            response: Some("Sorry, I cannot help with that.".to_string()),
        })));

        let summary = stage.summarize("We talked about hiring.").await;
        assert_eq!(summary, demo_summary());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_exhausted_attempts_fall_back_to_demo() {
        let calls = Arc::new(AtomicU32::new(0));
        let stage = stage_with(Some(Box::new(ScriptedProvider {
            calls: calls.clone(),
            response: None,
        })));

        let summary = stage.summarize("We talked about hiring.").await;
        assert_eq!(summary, demo_summary());
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_linear_backoff_between_attempts() {
        let calls = Arc::new(AtomicU32::new(0));
        let stage = SummarizationStage::new(
            Some(Box::new(ScriptedProvider {
                calls: calls.clone(),
                response: None,
            })),
            &PipelineConfig {
                retry_attempts: 3,
                retry_backoff_seconds: 2,
                ..Default::default()
            },
        );

        let start = Instant::now();
        stage.summarize("We talked about hiring.").await;

        assert_eq!(start.elapsed(), Duration::from_secs(6));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_prompt_is_bounded() {
        let seen = Arc::new(tokio::sync::Mutex::new(Vec::new()));
        let stage = SummarizationStage::new(
            Some(Box::new(PromptCapture { seen: seen.clone() })),
            &PipelineConfig {
                transcript_cap_chars: 100,
                ..Default::default()
            },
        );

        let transcript = "a".repeat(500);
        stage.summarize(&transcript).await;

        let prompts = seen.lock().await;
        assert!(prompts[0].contains(&"a".repeat(100)));
        assert!(!prompts[0].contains(&"a".repeat(101)));
        assert!(prompts[0].contains(prompt::TRUNCATION_MARKER));
    }
}
