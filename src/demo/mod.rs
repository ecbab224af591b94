//! Fixed demo payloads used when no external provider is configured or every
//! attempt against one has failed. These are named constants on purpose:
//! tests and operators can assert exact equality against them, and a
//! transcript carrying the sentinel marker deterministically maps to the demo
//! summary without spending a real summarization call.

use crate::meeting::{ActionItem, StructuredSummary};

/// Marker that identifies a synthetic transcript.
pub const DEMO_SENTINEL: &str = "DEMO_TRANSCRIPT";

/// Transcript returned when transcription is unavailable or exhausted.
pub const DEMO_TRANSCRIPT: &str = "DEMO_TRANSCRIPT: Team meeting for Project Phoenix. \
We discussed the Q4 development timeline. John presented the backend API progress \
which is 80% complete. Sarah showed the frontend designs which are ready for \
implementation. We decided to use React with TypeScript for the frontend and Node.js \
for the backend. Database schema has been finalized. Action items: John to complete \
API endpoints by Friday, Sarah to implement login page, David to setup deployment \
pipeline. Next review meeting scheduled for next Monday. Budget approved for \
additional resources.";

/// Structured summary returned when summarization is unavailable, exhausted,
/// or handed a demo transcript.
pub fn demo_summary() -> StructuredSummary {
    StructuredSummary {
        summary: "The team reviewed Project Phoenix progress for Q4. Backend development \
                  is 80% complete and frontend designs are ready. Decisions were made on \
                  technology stack and database schema. Budget was approved for additional \
                  resources."
            .to_string(),
        key_decisions: vec![
            "Use React with TypeScript for frontend development".to_string(),
            "Use Node.js for backend API".to_string(),
            "Finalize database schema as presented".to_string(),
            "Approve budget for additional resources".to_string(),
            "Schedule next review meeting for Monday".to_string(),
        ],
        action_items: vec![
            ActionItem {
                task: "Complete backend API endpoints".to_string(),
                owner: "John".to_string(),
                deadline: "Friday".to_string(),
            },
            ActionItem {
                task: "Implement user login page".to_string(),
                owner: "Sarah".to_string(),
                deadline: "Next week".to_string(),
            },
            ActionItem {
                task: "Setup deployment pipeline".to_string(),
                owner: "David".to_string(),
                deadline: "Friday".to_string(),
            },
            ActionItem {
                task: "Prepare project documentation".to_string(),
                owner: "Team".to_string(),
                deadline: "Next Monday".to_string(),
            },
        ],
    }
}
