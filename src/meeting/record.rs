//! The persistent meeting record and the structured summary extracted from it.

use serde::{Deserialize, Serialize};

use super::status::MeetingStatus;

fn default_tbd() -> String {
    "TBD".to_string()
}

/// One action item extracted from a meeting. `owner` and `deadline` default
/// to "TBD" when the model omits them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionItem {
    pub task: String,
    #[serde(default = "default_tbd")]
    pub owner: String,
    #[serde(default = "default_tbd")]
    pub deadline: String,
}

/// Structured output of the summarization stage. Field names are camelCase
/// on the wire because that is the shape the model is prompted to produce.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StructuredSummary {
    pub summary: String,
    #[serde(default)]
    pub key_decisions: Vec<String>,
    #[serde(default)]
    pub action_items: Vec<ActionItem>,
}

/// A meeting record as stored and served. Created once at upload time with
/// status `processing`; thereafter mutated only by its pipeline run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeetingRecord {
    pub id: String,
    pub original_name: Option<String>,
    pub status: MeetingStatus,
    /// Path of the transient uploaded audio artifact. The file itself is
    /// deleted when processing ends; the path stays for operator reference.
    pub audio_path: String,
    pub transcript: String,
    pub summary: String,
    pub key_decisions: Vec<String>,
    pub action_items: Vec<ActionItem>,
    pub created_at: String,
    pub updated_at: String,
}

impl MeetingRecord {
    pub fn new(id: String, original_name: Option<String>, audio_path: String) -> Self {
        let now = chrono::Utc::now().to_rfc3339();
        Self {
            id,
            original_name,
            status: MeetingStatus::Processing,
            audio_path,
            transcript: String::new(),
            summary: String::new(),
            key_decisions: Vec::new(),
            action_items: Vec::new(),
            created_at: now.clone(),
            updated_at: now,
        }
    }

    /// Apply the structured summary and mark the record completed.
    pub fn complete_with(&mut self, structured: StructuredSummary) {
        self.summary = structured.summary;
        self.key_decisions = structured.key_decisions;
        self.action_items = structured.action_items;
        self.status = MeetingStatus::Completed;
    }
}
