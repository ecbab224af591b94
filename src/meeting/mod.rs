//! Meeting domain types: processing status and the persistent record.

pub mod record;
pub mod status;

pub use record::{ActionItem, MeetingRecord, StructuredSummary};
pub use status::MeetingStatus;
