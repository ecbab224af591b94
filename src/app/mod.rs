use crate::api::{ApiServer, MeetingsState};
use crate::config::Config;
use crate::global;
use crate::pipeline::{ProcessingPipeline, SqliteMeetingStore};
use crate::summarization::{OpenAiChatProvider, SummarizationStage, SummaryProvider};
use crate::transcription::{OpenAiWhisperProvider, TranscriptionProvider, TranscriptionStage};
use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::info;

pub async fn run_service(port_override: Option<u16>) -> Result<()> {
    info!("Starting recap service");

    let config = Config::load()?;

    let db_path = global::db_file()?;
    // Create and migrate the database up front so the first upload doesn't
    // pay for it.
    crate::db::open(&db_path)?;

    let uploads_dir = global::uploads_dir()?;
    std::fs::create_dir_all(&uploads_dir).context("Failed to create uploads directory")?;

    let store = Arc::new(SqliteMeetingStore::new(db_path));

    let api_key = config.openai.resolve_api_key();
    if api_key.is_none() {
        info!("No OpenAI API key configured, running in demo mode");
    }

    let transcription_provider: Option<Box<dyn TranscriptionProvider>> =
        api_key.as_ref().map(|key| {
            Box::new(OpenAiWhisperProvider::new(
                key.clone(),
                &config.openai.api_base,
                config.openai.whisper_model.clone(),
            )) as Box<dyn TranscriptionProvider>
        });

    let summary_provider: Option<Box<dyn SummaryProvider>> = api_key.as_ref().map(|key| {
        Box::new(OpenAiChatProvider::new(
            key.clone(),
            &config.openai.api_base,
            config.openai.chat_model.clone(),
        )) as Box<dyn SummaryProvider>
    });

    let pipeline = Arc::new(ProcessingPipeline::new(
        store.clone(),
        TranscriptionStage::new(transcription_provider, &config.pipeline),
        SummarizationStage::new(summary_provider, &config.pipeline),
    ));

    let port = port_override.unwrap_or(config.server.port);
    let api_server = ApiServer::new(
        MeetingsState {
            store,
            pipeline,
            uploads_dir,
        },
        port,
    );

    info!("recap is ready!");

    api_server.start().await
}
