//! Meeting summarization via a chat-completion model.
//!
//! One request, one response. A response that cannot be parsed is not a
//! fatal condition: callers substitute [`MeetingSummary::default`] so the
//! run still produces inspectable notes.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};

mod prompt;

pub use prompt::{summary_prompt, SUMMARY_PROMPT_TEMPLATE};

/// Structured meeting summary document. Every field defaults to empty so a
/// partially-filled model response still parses.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MeetingSummary {
    pub summary: String,
    pub key_topics: Vec<String>,
    pub action_items: Vec<String>,
    pub decisions: Vec<String>,
    pub next_meeting: String,
    pub participants: Vec<String>,
}

#[derive(Debug, Error)]
pub enum SummaryError {
    #[error("summarization request failed: {0}")]
    Request(String),
    #[error("summarization API returned {status}: {body}")]
    Api { status: u16, body: String },
    #[error("could not parse summary response: {0}")]
    Parse(String),
}

#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessageResponse,
}

#[derive(Deserialize)]
struct ChatMessageResponse {
    content: String,
}

pub struct Summarizer {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    model: String,
}

impl Summarizer {
    pub fn new(api_key: &str, api_base: &str, model: &str, timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            client,
            endpoint: format!("{}/chat/completions", api_base.trim_end_matches('/')),
            api_key: api_key.trim().to_string(),
            model: model.to_string(),
        }
    }

    /// Summarize a transcript into the structured document.
    pub async fn summarize(&self, transcript: &str) -> Result<MeetingSummary, SummaryError> {
        info!("Requesting meeting summary (model: {})", self.model);

        let body = ChatRequest {
            model: self.model.clone(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: summary_prompt(transcript),
            }],
            temperature: 0.3,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| SummaryError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SummaryError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| SummaryError::Parse(e.to_string()))?;

        let content = parsed
            .choices
            .first()
            .map(|c| c.message.content.as_str())
            .ok_or_else(|| SummaryError::Parse("response contained no choices".to_string()))?;

        debug!("Raw summary response: {}", content);
        parse_summary(content)
    }
}

/// Parse the model's reply into a summary document. Models sometimes wrap
/// the JSON in Markdown code fences; those are stripped first.
pub fn parse_summary(content: &str) -> Result<MeetingSummary, SummaryError> {
    let json = strip_code_fences(content);
    serde_json::from_str(json).map_err(|e| SummaryError::Parse(e.to_string()))
}

fn strip_code_fences(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    let rest = rest.strip_suffix("```").unwrap_or(rest);
    rest.trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_document() {
        let content = r#"{
            "summary": "We planned the release.",
            "key_topics": ["release", "testing"],
            "action_items": ["Ann: write changelog"],
            "decisions": ["ship Friday"],
            "next_meeting": "Monday 10:00",
            "participants": ["Ann", "Ben"]
        }"#;

        let summary = parse_summary(content).unwrap();
        assert_eq!(summary.summary, "We planned the release.");
        assert_eq!(summary.key_topics, vec!["release", "testing"]);
        assert_eq!(summary.decisions, vec!["ship Friday"]);
        assert_eq!(summary.next_meeting, "Monday 10:00");
    }

    #[test]
    fn test_parse_fenced_document() {
        let content = "```json\n{\"summary\": \"short\"}\n```";
        let summary = parse_summary(content).unwrap();
        assert_eq!(summary.summary, "short");
        assert!(summary.key_topics.is_empty());
    }

    #[test]
    fn test_parse_missing_fields_default_to_empty() {
        let summary = parse_summary("{\"key_topics\": [\"only topic\"]}").unwrap();
        assert_eq!(summary.key_topics, vec!["only topic"]);
        assert!(summary.summary.is_empty());
        assert!(summary.participants.is_empty());
    }

    #[test]
    fn test_parse_malformed_response_is_an_error() {
        assert!(parse_summary("Sure! Here is your summary: ...").is_err());
        assert!(parse_summary("").is_err());
    }

    #[test]
    fn test_default_document_is_all_empty() {
        let summary = MeetingSummary::default();
        assert!(summary.summary.is_empty());
        assert!(summary.key_topics.is_empty());
        assert!(summary.action_items.is_empty());
        assert!(summary.decisions.is_empty());
        assert!(summary.next_meeting.is_empty());
        assert!(summary.participants.is_empty());
    }
}
