//! REST API server for recap.
//!
//! Provides HTTP endpoints for:
//! - Uploading meeting audio
//! - Polling meeting status and results
//! - Listing meetings

pub mod error;
pub mod routes;

use anyhow::Result;
use axum::{extract::DefaultBodyLimit, response::Json, routing::get, Router};
use serde_json::{json, Value};
use tower::ServiceBuilder;
use tracing::info;

pub use routes::meetings::MeetingsState;

/// Upload size ceiling for meeting audio.
const MAX_UPLOAD_BYTES: usize = 50 * 1024 * 1024;

pub struct ApiServer {
    port: u16,
    meetings_state: MeetingsState,
}

impl ApiServer {
    pub fn new(meetings_state: MeetingsState, port: u16) -> Self {
        Self {
            port,
            meetings_state,
        }
    }

    pub async fn start(self) -> Result<()> {
        let app = Router::new()
            .route("/", get(status))
            .route("/version", get(version))
            .merge(routes::meetings::router(self.meetings_state))
            // Audio uploads are large; the 2MB default is far too small.
            .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
            .layer(ServiceBuilder::new());

        let listener = tokio::net::TcpListener::bind(&format!("127.0.0.1:{}", self.port)).await?;

        info!("API server listening on http://127.0.0.1:{}", self.port);
        info!("Endpoints:");
        info!("  GET  /                 - Service info");
        info!("  GET  /version          - Version info");
        info!("  POST /meetings/upload  - Upload meeting audio (multipart field 'audio')");
        info!("  GET  /meetings         - List meetings");
        info!("  GET  /meetings/:id     - Get meeting status and results");

        axum::serve(listener, app).await?;

        Ok(())
    }
}

async fn status() -> Json<Value> {
    Json(json!({
        "service": "recap",
        "version": env!("CARGO_PKG_VERSION"),
        "status": "running"
    }))
}

async fn version() -> Json<Value> {
    Json(json!({
        "version": env!("CARGO_PKG_VERSION"),
        "name": "recap"
    }))
}
