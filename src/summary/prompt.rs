//! Fixed prompt for turning a raw transcript into a structured summary.

/// User prompt template: placeholder is replaced with the actual transcript.
pub const SUMMARY_PROMPT_TEMPLATE: &str = r#"Analyze the following meeting transcript and create a structured summary:

TRANSCRIPT:
{transcript}

Produce a summary as a JSON object containing:
1. "summary" - the main meeting summary (2-3 paragraphs)
2. "key_topics" - a list of the main topics discussed in the meeting
3. "action_items" - a list of concrete tasks to be done, with the people responsible
4. "decisions" - the decisions that were made
5. "next_meeting" - details about the next meeting (if mentioned)
6. "participants" - a list of participants (if they can be inferred from the transcript)

Respond in JSON format only, with no additional text."#;

/// Build the user prompt with the given transcript.
pub fn summary_prompt(transcript: &str) -> String {
    SUMMARY_PROMPT_TEMPLATE.replace("{transcript}", transcript)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_embeds_transcript() {
        let prompt = summary_prompt("we agreed to ship on Friday");
        assert!(prompt.contains("we agreed to ship on Friday"));
        assert!(!prompt.contains("{transcript}"));
    }
}
