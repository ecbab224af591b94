//! Meeting processing pipeline.
//!
//! One run per upload: load record → transcribe → persist transcript →
//! summarize → persist summary and mark completed → delete the audio
//! artifact. Any unrecovered failure after the load marks the record failed
//! and still deletes the artifact. Both stages absorb their own provider
//! failures, so in practice only a missing record or a storage error reaches
//! the caller, but the failure path holds regardless of where the error came
//! from.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info, warn};

use crate::meeting::MeetingStatus;
use crate::summarization::SummarizationStage;
use crate::transcription::TranscriptionStage;

pub mod store;

pub use store::{MeetingStore, SqliteMeetingStore};

/// Errors that escape a pipeline run. Everything else (provider failures,
/// parse failures, cleanup failures) is absorbed along the way.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Meeting record not found: {0}")]
    RecordNotFound(String),
    #[error("Storage error: {0}")]
    Storage(anyhow::Error),
}

pub struct ProcessingPipeline {
    store: Arc<dyn MeetingStore>,
    transcription: TranscriptionStage,
    summarization: SummarizationStage,
}

impl ProcessingPipeline {
    pub fn new(
        store: Arc<dyn MeetingStore>,
        transcription: TranscriptionStage,
        summarization: SummarizationStage,
    ) -> Self {
        Self {
            store,
            transcription,
            summarization,
        }
    }

    /// Fire-and-forget launch. The caller gets no handle back; completion or
    /// failure is observable only through the record's status, so the spawned
    /// task just logs its outcome.
    pub fn launch(self: &Arc<Self>, meeting_id: String, audio_path: PathBuf) {
        let pipeline = Arc::clone(self);
        tokio::spawn(async move {
            match pipeline.run(&meeting_id, &audio_path).await {
                Ok(()) => info!("Processing completed for meeting {}", meeting_id),
                Err(e) => error!("Processing failed for meeting {}: {}", meeting_id, e),
            }
        });
    }

    /// Run the pipeline once for one meeting. Exactly one run ever holds
    /// write authority over a record: uploads mint fresh ids and launch once.
    pub async fn run(&self, meeting_id: &str, audio_path: &Path) -> Result<(), PipelineError> {
        info!("Processing meeting: {}", meeting_id);

        match self.process(meeting_id, audio_path).await {
            Ok(()) => Ok(()),
            Err(err) => {
                self.mark_failed(meeting_id).await;
                remove_artifact(audio_path);
                Err(err)
            }
        }
    }

    async fn process(&self, meeting_id: &str, audio_path: &Path) -> Result<(), PipelineError> {
        let mut record = self
            .store
            .load(meeting_id)
            .await
            .map_err(PipelineError::Storage)?
            .ok_or_else(|| PipelineError::RecordNotFound(meeting_id.to_string()))?;

        info!("Transcribing audio for meeting {}", meeting_id);
        let transcript = self.transcription.transcribe(audio_path).await;
        info!("Transcription yielded {} chars", transcript.len());

        // Persist the transcript before summarizing so a later failure still
        // leaves it available for inspection.
        record.transcript = transcript.clone();
        self.store
            .save(&record)
            .await
            .map_err(PipelineError::Storage)?;

        info!("Generating summary for meeting {}", meeting_id);
        let structured = self.summarization.summarize(&transcript).await;
        info!(
            "Summary generated with {} action items",
            structured.action_items.len()
        );

        record.complete_with(structured);
        self.store
            .save(&record)
            .await
            .map_err(PipelineError::Storage)?;

        remove_artifact(audio_path);

        info!("Successfully processed meeting {}", meeting_id);
        Ok(())
    }

    /// Best-effort failure transition. Cleanup problems here must not mask
    /// the original error, so everything is logged and swallowed.
    async fn mark_failed(&self, meeting_id: &str) {
        match self.store.load(meeting_id).await {
            Ok(Some(mut record)) => {
                record.status = MeetingStatus::Failed;
                if let Err(e) = self.store.save(&record).await {
                    warn!("Failed to mark meeting {} as failed: {}", meeting_id, e);
                }
            }
            Ok(None) => {}
            Err(e) => warn!(
                "Could not reload meeting {} to mark it failed: {}",
                meeting_id, e
            ),
        }
    }
}

/// Delete the transient audio artifact, ignoring errors. The pipeline owns
/// the file from launch until this point; deletion happens exactly once per
/// run on whichever exit path is taken.
fn remove_artifact(audio_path: &Path) {
    if !audio_path.exists() {
        return;
    }

    match std::fs::remove_file(audio_path) {
        Ok(()) => info!("Cleaned up audio file: {:?}", audio_path),
        Err(e) => warn!("Failed to clean up audio file {:?}: {}", audio_path, e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PipelineConfig;
    use crate::demo::{demo_summary, DEMO_TRANSCRIPT};
    use crate::meeting::MeetingRecord;
    use anyhow::{anyhow, Result};
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::io::Write;
    use std::sync::atomic::{AtomicU32, Ordering};
    use tokio::sync::Mutex;

    /// In-memory store with optional scripted save failures.
    #[derive(Default)]
    struct MemoryStore {
        records: Mutex<HashMap<String, MeetingRecord>>,
        save_calls: AtomicU32,
        /// Fail the nth save call (1-based).
        fail_save_on: Option<u32>,
    }

    impl MemoryStore {
        fn with_record(record: MeetingRecord) -> Self {
            let store = Self::default();
            store
                .records
                .try_lock()
                .unwrap()
                .insert(record.id.clone(), record);
            store
        }

        async fn get(&self, id: &str) -> Option<MeetingRecord> {
            self.records.lock().await.get(id).cloned()
        }
    }

    #[async_trait]
    impl MeetingStore for MemoryStore {
        async fn load(&self, id: &str) -> Result<Option<MeetingRecord>> {
            Ok(self.records.lock().await.get(id).cloned())
        }

        async fn save(&self, record: &MeetingRecord) -> Result<()> {
            let call = self.save_calls.fetch_add(1, Ordering::SeqCst) + 1;
            if self.fail_save_on == Some(call) {
                return Err(anyhow!("disk full"));
            }
            self.records
                .lock()
                .await
                .insert(record.id.clone(), record.clone());
            Ok(())
        }
    }

    fn demo_pipeline(store: Arc<dyn MeetingStore>) -> Arc<ProcessingPipeline> {
        let config = PipelineConfig::default();
        Arc::new(ProcessingPipeline::new(
            store,
            TranscriptionStage::new(None, &config),
            SummarizationStage::new(None, &config),
        ))
    }

    fn write_artifact(dir: &tempfile::TempDir, name: &str) -> PathBuf {
        let path = dir.path().join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(b"fake audio bytes").unwrap();
        path
    }

    #[tokio::test]
    async fn test_demo_mode_end_to_end() {
        let dir = tempfile::tempdir().unwrap();
        let audio = write_artifact(&dir, "m1.wav");
        let store = Arc::new(MemoryStore::with_record(MeetingRecord::new(
            "m1".to_string(),
            Some("standup.wav".to_string()),
            audio.to_string_lossy().to_string(),
        )));

        let pipeline = demo_pipeline(store.clone());
        pipeline.run("m1", &audio).await.unwrap();

        let record = store.get("m1").await.unwrap();
        assert_eq!(record.status, MeetingStatus::Completed);
        assert_eq!(record.transcript, DEMO_TRANSCRIPT);
        let expected = demo_summary();
        assert_eq!(record.summary, expected.summary);
        assert_eq!(record.key_decisions, expected.key_decisions);
        assert_eq!(record.action_items.len(), 4);
        for item in &record.action_items {
            assert!(!item.owner.is_empty());
            assert!(!item.deadline.is_empty());
        }
        // The artifact is gone after the run.
        assert!(!audio.exists());
    }

    #[tokio::test]
    async fn test_record_not_found_aborts_without_save() {
        let dir = tempfile::tempdir().unwrap();
        let audio = write_artifact(&dir, "orphan.wav");
        let store = Arc::new(MemoryStore::default());

        let pipeline = demo_pipeline(store.clone());
        let err = pipeline.run("missing", &audio).await.unwrap_err();

        assert!(matches!(err, PipelineError::RecordNotFound(_)));
        assert_eq!(store.save_calls.load(Ordering::SeqCst), 0);
        assert!(!audio.exists());
    }

    #[tokio::test]
    async fn test_summary_save_failure_marks_failed_and_cleans_up() {
        let dir = tempfile::tempdir().unwrap();
        let audio = write_artifact(&dir, "m1.wav");
        let mut store = MemoryStore::with_record(MeetingRecord::new(
            "m1".to_string(),
            None,
            audio.to_string_lossy().to_string(),
        ));
        // First save (transcript) succeeds, second save (summary) fails.
        store.fail_save_on = Some(2);
        let store = Arc::new(store);

        let pipeline = demo_pipeline(store.clone());
        let err = pipeline.run("m1", &audio).await.unwrap_err();

        assert!(matches!(err, PipelineError::Storage(_)));
        let record = store.get("m1").await.unwrap();
        assert_eq!(record.status, MeetingStatus::Failed);
        // Transcript from the first save survives for inspection.
        assert_eq!(record.transcript, DEMO_TRANSCRIPT);
        assert!(!audio.exists());
    }

    #[tokio::test]
    async fn test_transcript_save_failure_marks_failed() {
        let dir = tempfile::tempdir().unwrap();
        let audio = write_artifact(&dir, "m1.wav");
        let mut store = MemoryStore::with_record(MeetingRecord::new(
            "m1".to_string(),
            None,
            audio.to_string_lossy().to_string(),
        ));
        store.fail_save_on = Some(1);
        let store = Arc::new(store);

        let pipeline = demo_pipeline(store.clone());
        let err = pipeline.run("m1", &audio).await.unwrap_err();

        assert!(matches!(err, PipelineError::Storage(_)));
        let record = store.get("m1").await.unwrap();
        assert_eq!(record.status, MeetingStatus::Failed);
        assert!(record.summary.is_empty());
        assert!(!audio.exists());
    }

    #[tokio::test]
    async fn test_missing_artifact_does_not_block_completion() {
        let store = Arc::new(MemoryStore::with_record(MeetingRecord::new(
            "m1".to_string(),
            None,
            "/tmp/recap-never-existed.wav".to_string(),
        )));

        let pipeline = demo_pipeline(store.clone());
        pipeline
            .run("m1", Path::new("/tmp/recap-never-existed.wav"))
            .await
            .unwrap();

        let record = store.get("m1").await.unwrap();
        assert_eq!(record.status, MeetingStatus::Completed);
    }

    #[tokio::test]
    async fn test_launch_completes_in_background() {
        let dir = tempfile::tempdir().unwrap();
        let audio = write_artifact(&dir, "m1.wav");
        let store = Arc::new(MemoryStore::with_record(MeetingRecord::new(
            "m1".to_string(),
            None,
            audio.to_string_lossy().to_string(),
        )));

        let pipeline = demo_pipeline(store.clone());
        pipeline.launch("m1".to_string(), audio.clone());

        // Poll the record like a client would.
        for _ in 0..50 {
            if let Some(record) = store.get("m1").await {
                if record.status.is_terminal() {
                    assert_eq!(record.status, MeetingStatus::Completed);
                    assert!(!audio.exists());
                    return;
                }
            }
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        }
        panic!("pipeline did not reach a terminal status");
    }
}
