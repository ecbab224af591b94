//! Normalization and parsing of the model's summarization response.
//!
//! Models often wrap JSON in markdown code fences. Fence stripping is the only
//! repair attempted; after it the payload either parses strictly or the caller
//! falls back to demo data.

use anyhow::{Context, Result};

use crate::meeting::StructuredSummary;

/// Remove surrounding markdown code fences (``` or ```json) if present.
pub fn strip_code_fences(response: &str) -> &str {
    let trimmed = response.trim();

    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };

    // Drop the info string (e.g. "json") up to the first newline.
    let body = match rest.split_once('\n') {
        Some((_, body)) => body,
        None => rest,
    };

    body.strip_suffix("```").unwrap_or(body).trim()
}

/// Parse a provider response into a structured summary.
pub fn parse_summary_response(response: &str) -> Result<StructuredSummary> {
    let cleaned = strip_code_fences(response);
    serde_json::from_str(cleaned).context("Summary response is not valid JSON")
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAYLOAD: &str = r#"{"summary": "Recap", "keyDecisions": ["Ship"], "actionItems": [{"task": "Deploy", "owner": "Mia", "deadline": "Monday"}]}"#;

    #[test]
    fn test_strip_json_fence() {
        let fenced = format!("```json\n{PAYLOAD}\n```");
        assert_eq!(strip_code_fences(&fenced), PAYLOAD);
    }

    #[test]
    fn test_strip_bare_fence() {
        let fenced = format!("```\n{PAYLOAD}\n```");
        assert_eq!(strip_code_fences(&fenced), PAYLOAD);
    }

    #[test]
    fn test_unfenced_passthrough() {
        assert_eq!(strip_code_fences(PAYLOAD), PAYLOAD);
        assert_eq!(strip_code_fences(&format!("  {PAYLOAD}\n")), PAYLOAD);
    }

    #[test]
    fn test_parse_fenced_response() {
        let fenced = format!("```json\n{PAYLOAD}\n```");
        let summary = parse_summary_response(&fenced).unwrap();
        assert_eq!(summary.summary, "Recap");
        assert_eq!(summary.key_decisions, vec!["Ship".to_string()]);
        assert_eq!(summary.action_items[0].deadline, "Monday");
    }

    #[test]
    fn test_parse_defaults_owner_and_deadline() {
        let response = r#"{"summary": "Recap", "actionItems": [{"task": "Write minutes"}]}"#;
        let summary = parse_summary_response(response).unwrap();
        assert_eq!(summary.action_items[0].owner, "TBD");
        assert_eq!(summary.action_items[0].deadline, "TBD");
    }

    #[test]
    fn test_parse_malformed_response_errors() {
        assert!(parse_summary_response("I could not summarize this meeting.").is_err());
        assert!(parse_summary_response("```json\nnot json\n```").is_err());
        assert!(parse_summary_response("").is_err());
    }
}
