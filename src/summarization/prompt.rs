//! Prompt construction for the summarization call.
//!
//! The transcript is capped before being embedded so a pathological upload
//! cannot blow past the model's context window; the cap is configuration,
//! defaulting to 8000 characters.

/// System instruction sent alongside every summarization prompt.
pub const SYSTEM_INSTRUCTION: &str = "You are an expert meeting assistant. Extract structured \
information from meeting transcripts and provide output in valid JSON format.";

/// Marker appended when the transcript was cut at the cap.
pub const TRUNCATION_MARKER: &str = "... [truncated]";

/// Build the user prompt for a transcript, truncating at `cap_chars`.
pub fn build_prompt(transcript: &str, cap_chars: usize) -> String {
    let limited = bound_transcript(transcript, cap_chars);

    format!(
        r#"You are an expert meeting assistant. Your task is to analyze the following meeting transcript and extract the key information in a structured JSON format.

<transcript>
{limited}
</transcript>

Please provide a summary with the following structure:

1. **Meeting Summary:** A concise paragraph (3-4 sentences) summarizing the overall discussion and purpose of the meeting.
2. **Key Decisions:** A bulleted list of the most important decisions that were made.
3. **Action Items:** A list of action items. For each action item, specify:
   - Task: A clear description of the task.
   - Owner: The person responsible for the task. If an owner is not explicitly stated, write "TBD".
   - Deadline: The deadline if mentioned, otherwise write "TBD".

Format your final output as a JSON object with the following structure:
{{
  "summary": "Meeting summary text here",
  "keyDecisions": ["Decision 1", "Decision 2", ...],
  "actionItems": [
    {{"task": "Task description", "owner": "Person name", "deadline": "Deadline"}},
    ...
  ]
}}

Ensure the output is valid JSON that can be parsed directly."#
    )
}

fn bound_transcript(transcript: &str, cap_chars: usize) -> String {
    if transcript.chars().count() <= cap_chars {
        return transcript.to_string();
    }

    let truncated: String = transcript.chars().take(cap_chars).collect();
    format!("{truncated}{TRUNCATION_MARKER}")
}
