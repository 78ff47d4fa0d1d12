//! Meeting notes: JSON persistence and shareable HTML rendering.
//!
//! Filenames are timestamp-derived (`meeting_YYYYMMDD_HHMMSS.json`,
//! `notatki_YYYYMMDD_HHMMSS.html`), matching the layout the tool has
//! always produced.

use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::summary::MeetingSummary;

/// Everything persisted for one meeting run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeetingRecord {
    pub title: String,
    pub generated_at: String,
    #[serde(flatten)]
    pub summary: MeetingSummary,
    pub transcript: String,
}

impl MeetingRecord {
    pub fn new(
        title: impl Into<String>,
        summary: MeetingSummary,
        transcript: impl Into<String>,
        now: &DateTime<Local>,
    ) -> Self {
        Self {
            title: title.into(),
            generated_at: now.format("%d.%m.%Y, %H:%M").to_string(),
            summary,
            transcript: transcript.into(),
        }
    }
}

pub fn default_title(now: &DateTime<Local>) -> String {
    format!("Meeting of {}", now.format("%d.%m.%Y"))
}

/// Writes meeting artifacts into the configured output directory.
pub struct NotesWriter {
    output_dir: PathBuf,
}

impl NotesWriter {
    pub fn new(output_dir: Option<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.unwrap_or_else(|| PathBuf::from(".")),
        }
    }

    pub fn save_json(&self, record: &MeetingRecord, now: &DateTime<Local>) -> Result<PathBuf> {
        let path = self
            .output_dir
            .join(format!("meeting_{}.json", now.format("%Y%m%d_%H%M%S")));
        let content =
            serde_json::to_string_pretty(record).context("Failed to serialize meeting data")?;

        std::fs::create_dir_all(&self.output_dir).context("Failed to create output directory")?;
        std::fs::write(&path, content).context("Failed to write meeting data")?;

        Ok(path)
    }

    pub fn save_html(&self, html: &str, now: &DateTime<Local>) -> Result<PathBuf> {
        let path = self
            .output_dir
            .join(format!("notatki_{}.html", now.format("%Y%m%d_%H%M%S")));

        std::fs::create_dir_all(&self.output_dir).context("Failed to create output directory")?;
        std::fs::write(&path, html).context("Failed to write notes")?;

        Ok(path)
    }
}

/// Render the meeting record as a standalone HTML document.
pub fn render_html(record: &MeetingRecord) -> String {
    let summary = &record.summary;
    let mut html = String::new();

    html.push_str("<!DOCTYPE html>\n<html>\n<head>\n");
    html.push_str("<meta charset=\"UTF-8\">\n");
    html.push_str(&format!("<title>{}</title>\n", escape_html(&record.title)));
    html.push_str(
        "<style>\n\
         body { font-family: Arial, sans-serif; max-width: 800px; margin: 0 auto; padding: 20px; }\n\
         h1 { color: #2c3e50; border-bottom: 2px solid #3498db; }\n\
         h2 { color: #34495e; margin-top: 30px; }\n\
         .action-item { background: #fff3cd; padding: 10px; margin: 5px 0; border-left: 4px solid #ffc107; }\n\
         .decision { background: #d4edda; padding: 10px; margin: 5px 0; border-left: 4px solid #28a745; }\n\
         ul { padding-left: 20px; }\n\
         .date { color: #6c757d; font-size: 0.9em; }\n\
         </style>\n</head>\n<body>\n",
    );

    html.push_str(&format!("<h1>{}</h1>\n", escape_html(&record.title)));
    html.push_str(&format!(
        "<p class=\"date\">Date: {}</p>\n",
        escape_html(&record.generated_at)
    ));

    html.push_str("<h2>Summary</h2>\n");
    html.push_str(&format!(
        "<p>{}</p>\n",
        escape_html(if summary.summary.is_empty() {
            "No summary available"
        } else {
            &summary.summary
        })
    ));

    html.push_str("<h2>Key topics</h2>\n<ul>\n");
    for topic in &summary.key_topics {
        html.push_str(&format!("<li>{}</li>\n", escape_html(topic)));
    }
    html.push_str("</ul>\n");

    html.push_str("<h2>Action items</h2>\n");
    for item in &summary.action_items {
        html.push_str(&format!(
            "<div class=\"action-item\"><strong>{}</strong></div>\n",
            escape_html(item)
        ));
    }

    html.push_str("<h2>Decisions</h2>\n");
    for decision in &summary.decisions {
        html.push_str(&format!(
            "<div class=\"decision\"><strong>{}</strong></div>\n",
            escape_html(decision)
        ));
    }

    html.push_str("<h2>Participants</h2>\n<ul>\n");
    for participant in &summary.participants {
        html.push_str(&format!("<li>{}</li>\n", escape_html(participant)));
    }
    html.push_str("</ul>\n");

    html.push_str("<h2>Next meeting</h2>\n");
    html.push_str(&format!(
        "<p>{}</p>\n",
        escape_html(if summary.next_meeting.is_empty() {
            "Not scheduled"
        } else {
            &summary.next_meeting
        })
    ));

    html.push_str("<hr>\n<p><small>Notes generated automatically by Minutary</small></p>\n");
    html.push_str("</body>\n</html>\n");

    html
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
