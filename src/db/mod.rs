use anyhow::{Context, Result};
use rusqlite::Connection;
use std::path::Path;

pub mod meetings;

/// Open the database at the default location, creating and migrating it as
/// needed. Used by service startup and CLI commands.
pub fn init_db() -> Result<Connection> {
    let db_path = crate::global::db_file()?;
    open(&db_path)
}

/// Open a database at an explicit path, creating and migrating it as needed.
pub fn open(db_path: &Path) -> Result<Connection> {
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent).context("Failed to create database directory")?;
    }

    let conn = Connection::open(db_path).context("Failed to open database connection")?;

    migrate(&conn)?;

    Ok(conn)
}

pub fn migrate(conn: &Connection) -> Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS meetings (
            id TEXT PRIMARY KEY,
            original_name TEXT,
            status TEXT NOT NULL DEFAULT 'processing',
            audio_path TEXT NOT NULL,
            transcript TEXT NOT NULL DEFAULT '',
            summary TEXT NOT NULL DEFAULT '',
            key_decisions TEXT NOT NULL DEFAULT '[]',
            action_items TEXT NOT NULL DEFAULT '[]',
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )",
        [],
    )
    .context("Failed to create meetings table")?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_meetings_created_at ON meetings(created_at DESC)",
        [],
    )
    .context("Failed to create meetings created_at index")?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_meetings_status ON meetings(status)",
        [],
    )
    .context("Failed to create meetings status index")?;

    Ok(())
}
