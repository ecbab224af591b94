//! Meeting record store seam.
//!
//! The pipeline only ever loads and saves records; creation happens at upload
//! time and deletion never happens here. The trait keeps the pipeline
//! testable against in-memory stores.

use anyhow::{Context, Result};
use async_trait::async_trait;
use std::path::PathBuf;

use crate::db::{self, meetings::MeetingRepository};
use crate::meeting::MeetingRecord;

#[async_trait]
pub trait MeetingStore: Send + Sync {
    async fn load(&self, id: &str) -> Result<Option<MeetingRecord>>;
    async fn save(&self, record: &MeetingRecord) -> Result<()>;
}

/// SQLite-backed store. Opens a connection per operation on the blocking
/// pool; rusqlite connections are not Send-safe across await points.
pub struct SqliteMeetingStore {
    db_path: PathBuf,
}

impl SqliteMeetingStore {
    pub fn new(db_path: PathBuf) -> Self {
        Self { db_path }
    }

    /// Insert a freshly created record. Used by the upload handler, not the
    /// pipeline.
    pub async fn insert(&self, record: &MeetingRecord) -> Result<()> {
        let db_path = self.db_path.clone();
        let record = record.clone();
        tokio::task::spawn_blocking(move || {
            let conn = db::open(&db_path)?;
            MeetingRepository::insert(&conn, &record)
        })
        .await
        .context("Store task panicked")?
    }

    /// List recent records, newest first. Used by the listing endpoint.
    pub async fn list(&self, limit: usize) -> Result<Vec<MeetingRecord>> {
        let db_path = self.db_path.clone();
        tokio::task::spawn_blocking(move || {
            let conn = db::open(&db_path)?;
            MeetingRepository::list(&conn, limit)
        })
        .await
        .context("Store task panicked")?
    }
}

#[async_trait]
impl MeetingStore for SqliteMeetingStore {
    async fn load(&self, id: &str) -> Result<Option<MeetingRecord>> {
        let db_path = self.db_path.clone();
        let id = id.to_string();
        tokio::task::spawn_blocking(move || {
            let conn = db::open(&db_path)?;
            MeetingRepository::get(&conn, &id)
        })
        .await
        .context("Store task panicked")?
    }

    async fn save(&self, record: &MeetingRecord) -> Result<()> {
        let db_path = self.db_path.clone();
        let record = record.clone();
        tokio::task::spawn_blocking(move || {
            let conn = db::open(&db_path)?;
            MeetingRepository::update(&conn, &record)
        })
        .await
        .context("Store task panicked")?
    }
}
