//! Meeting endpoints.
//!
//! - Upload audio and start processing (POST /meetings/upload)
//! - Poll a meeting's state and results (GET /meetings/:id)
//! - List meetings (GET /meetings)
//!
//! Upload responds 202 immediately; the pipeline runs as a spawned task and
//! clients poll the record's status for completion.

use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use crate::api::error::{ApiError, ApiResult};
use crate::meeting::MeetingRecord;
use crate::pipeline::{MeetingStore, ProcessingPipeline, SqliteMeetingStore};

/// Shared state for meeting routes.
#[derive(Clone)]
pub struct MeetingsState {
    pub store: Arc<SqliteMeetingStore>,
    pub pipeline: Arc<ProcessingPipeline>,
    pub uploads_dir: PathBuf,
}

pub fn router(state: MeetingsState) -> Router {
    Router::new()
        .route("/meetings/upload", post(upload_meeting))
        .route("/meetings", get(list_meetings))
        .route("/meetings/:id", get(get_meeting))
        .with_state(state)
}

async fn upload_meeting(
    State(state): State<MeetingsState>,
    mut multipart: Multipart,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let mut upload: Option<(Option<String>, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(format!("Invalid multipart body: {e}")))?
    {
        if field.name() == Some("audio") {
            let original_name = field.file_name().map(|name| name.to_string());
            let bytes = field
                .bytes()
                .await
                .map_err(|e| ApiError::bad_request(format!("Failed to read audio field: {e}")))?;
            upload = Some((original_name, bytes.to_vec()));
            break;
        }
    }

    let Some((original_name, bytes)) = upload else {
        return Err(ApiError::bad_request("No audio file uploaded"));
    };

    info!(
        "Upload received: {} ({} bytes)",
        original_name.as_deref().unwrap_or("<unnamed>"),
        bytes.len()
    );

    // A fresh id per upload; retried uploads never re-enter an in-flight
    // record.
    let meeting_id = Uuid::new_v4().to_string();
    let extension = original_name
        .as_deref()
        .and_then(|name| name.rsplit_once('.').map(|(_, ext)| ext.to_string()))
        .unwrap_or_else(|| "wav".to_string());

    tokio::fs::create_dir_all(&state.uploads_dir)
        .await
        .map_err(|e| ApiError::internal(format!("Failed to create uploads directory: {e}")))?;

    let audio_path = state.uploads_dir.join(format!("{meeting_id}.{extension}"));
    tokio::fs::write(&audio_path, &bytes)
        .await
        .map_err(|e| ApiError::internal(format!("Failed to store audio file: {e}")))?;

    let record = MeetingRecord::new(
        meeting_id.clone(),
        original_name,
        audio_path.to_string_lossy().to_string(),
    );
    state.store.insert(&record).await?;

    info!("Meeting record created: {}", meeting_id);

    state.pipeline.launch(meeting_id.clone(), audio_path);

    Ok((
        StatusCode::ACCEPTED,
        Json(json!({
            "success": true,
            "message": "Meeting uploaded and processing started",
            "data": {
                "meeting_id": meeting_id,
                "status": "processing",
            },
        })),
    ))
}

async fn get_meeting(
    Path(id): Path<String>,
    State(state): State<MeetingsState>,
) -> ApiResult<Json<Value>> {
    let record = state
        .store
        .load(&id)
        .await?
        .ok_or_else(|| ApiError::not_found("Meeting not found"))?;

    Ok(Json(json!({
        "success": true,
        "data": {
            "meeting_id": record.id,
            "original_name": record.original_name,
            "status": record.status.as_str(),
            "transcript": record.transcript,
            "summary": record.summary,
            "key_decisions": record.key_decisions,
            "action_items": record.action_items,
            "created_at": record.created_at,
            "updated_at": record.updated_at,
        },
    })))
}

async fn list_meetings(
    Query(params): Query<HashMap<String, String>>,
    State(state): State<MeetingsState>,
) -> ApiResult<Json<Value>> {
    let limit: usize = params
        .get("limit")
        .and_then(|v| v.parse().ok())
        .unwrap_or(20);

    let meetings = state.store.list(limit).await?;

    let entries: Vec<Value> = meetings
        .iter()
        .map(|record| {
            json!({
                "meeting_id": record.id,
                "original_name": record.original_name,
                "status": record.status.as_str(),
                "created_at": record.created_at,
                "updated_at": record.updated_at,
            })
        })
        .collect();

    Ok(Json(json!({
        "success": true,
        "data": entries,
    })))
}
