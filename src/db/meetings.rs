//! Meeting record persistence.
//!
//! CRUD operations for the `meetings` table — raw SQL with rusqlite, no ORM.
//! The decision and action-item lists are stored as JSON text columns.

use anyhow::{Context, Result};
use rusqlite::{params, Connection, Row};

use crate::meeting::{ActionItem, MeetingRecord, MeetingStatus};

/// Repository for meeting records.
pub struct MeetingRepository;

impl MeetingRepository {
    /// Insert a freshly created record (status = processing).
    pub fn insert(conn: &Connection, record: &MeetingRecord) -> Result<()> {
        conn.execute(
            "INSERT INTO meetings (id, original_name, status, audio_path, transcript, \
             summary, key_decisions, action_items, created_at, updated_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            params![
                record.id,
                record.original_name,
                record.status.as_str(),
                record.audio_path,
                record.transcript,
                record.summary,
                serde_json::to_string(&record.key_decisions)?,
                serde_json::to_string(&record.action_items)?,
                record.created_at,
                record.updated_at,
            ],
        )
        .context("Failed to insert meeting")?;
        Ok(())
    }

    /// Write back every mutable field of an existing record, bumping
    /// `updated_at`. Returns an error if the record no longer exists.
    pub fn update(conn: &Connection, record: &MeetingRecord) -> Result<()> {
        let updated = conn
            .execute(
                "UPDATE meetings SET status = ?1, transcript = ?2, summary = ?3, \
                 key_decisions = ?4, action_items = ?5, updated_at = ?6 WHERE id = ?7",
                params![
                    record.status.as_str(),
                    record.transcript,
                    record.summary,
                    serde_json::to_string(&record.key_decisions)?,
                    serde_json::to_string(&record.action_items)?,
                    chrono::Utc::now().to_rfc3339(),
                    record.id,
                ],
            )
            .context("Failed to update meeting")?;

        if updated == 0 {
            anyhow::bail!("Meeting {} does not exist", record.id);
        }
        Ok(())
    }

    /// Get a meeting by id.
    pub fn get(conn: &Connection, id: &str) -> Result<Option<MeetingRecord>> {
        let mut stmt = conn
            .prepare(
                "SELECT id, original_name, status, audio_path, transcript, summary, \
                 key_decisions, action_items, created_at, updated_at \
                 FROM meetings WHERE id = ?1",
            )
            .context("Failed to prepare meeting query")?;

        let mut rows = stmt
            .query_map(params![id], row_to_record)
            .context("Failed to query meeting")?;

        match rows.next() {
            Some(Ok(record)) => Ok(Some(record)),
            Some(Err(e)) => Err(e.into()),
            None => Ok(None),
        }
    }

    /// List meetings, newest first.
    pub fn list(conn: &Connection, limit: usize) -> Result<Vec<MeetingRecord>> {
        let mut stmt = conn
            .prepare(
                "SELECT id, original_name, status, audio_path, transcript, summary, \
                 key_decisions, action_items, created_at, updated_at \
                 FROM meetings ORDER BY created_at DESC, id DESC LIMIT ?1",
            )
            .context("Failed to prepare meetings list query")?;

        let rows = stmt
            .query_map(params![limit as i64], row_to_record)
            .context("Failed to list meetings")?;

        let mut meetings = Vec::new();
        for row in rows {
            meetings.push(row?);
        }

        Ok(meetings)
    }
}

fn row_to_record(row: &Row<'_>) -> rusqlite::Result<MeetingRecord> {
    let status: String = row.get(2)?;
    let key_decisions: String = row.get(6)?;
    let action_items: String = row.get(7)?;

    Ok(MeetingRecord {
        id: row.get(0)?,
        original_name: row.get(1)?,
        status: MeetingStatus::from_str(&status).map_err(|_| rusqlite::Error::InvalidQuery)?,
        audio_path: row.get(3)?,
        transcript: row.get(4)?,
        summary: row.get(5)?,
        key_decisions: serde_json::from_str::<Vec<String>>(&key_decisions)
            .map_err(|_| rusqlite::Error::InvalidQuery)?,
        action_items: serde_json::from_str::<Vec<ActionItem>>(&action_items)
            .map_err(|_| rusqlite::Error::InvalidQuery)?,
        created_at: row.get(8)?,
        updated_at: row.get(9)?,
    })
}
