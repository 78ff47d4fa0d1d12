//! CLI handlers for the record and process commands.
//!
//! Both feed the same flow: transcribe the audio through the size-aware
//! pipeline, summarize, save JSON + HTML notes, and optionally email them.
//! Every stage reports success or failure on the terminal; a failed remote
//! stage still leaves inspectable artifacts on disk.

use anyhow::{bail, Context, Result};
use chrono::Local;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::warn;

use crate::audio::{recorder, AudioAsset, AudioFormat, Chunker};
use crate::cli::args::{MeetingCliArgs, ProcessCliArgs, RecordCliArgs};
use crate::config::Config;
use crate::email::{NotesDelivery, SmtpMailer};
use crate::notes::{self, MeetingRecord, NotesWriter};
use crate::pipeline::TranscriptionPipeline;
use crate::summary::{MeetingSummary, Summarizer};
use crate::transcription::{OpenAiWhisper, Transcriber};

/// Handle the record CLI command.
pub async fn handle_record_command(args: RecordCliArgs) -> Result<()> {
    let config = Config::load()?;

    let audio_path = recording_path()?;
    eprintln!("Recording meeting audio...");
    if args.duration.is_none() {
        eprintln!("Press Ctrl+C to stop recording.");
    }

    recorder::record_to_file(&audio_path, args.duration, config.audio.sample_rate).await?;
    eprintln!("Recording saved: {}", audio_path.display());

    let asset = AudioAsset::probe(&audio_path).context("Failed to read back the recording")?;
    run_meeting_flow(&config, asset, &args.meeting).await
}

/// Handle the process CLI command.
pub async fn handle_process_command(args: ProcessCliArgs) -> Result<()> {
    validate_file(&args.file)?;

    let config = Config::load()?;
    let asset = AudioAsset::probe(&args.file).context("Failed to read the audio file")?;
    run_meeting_flow(&config, asset, &args.meeting).await
}

/// Transcribe, summarize, persist, and optionally deliver one meeting.
async fn run_meeting_flow(config: &Config, asset: AudioAsset, args: &MeetingCliArgs) -> Result<()> {
    let api_key = config.openai.resolved_api_key().context(
        "OpenAI API key not configured. Run `minutary config setup` or set OPENAI_API_KEY",
    )?;

    let timeout = Duration::from_secs(config.transcription.request_timeout_seconds);
    let language = args
        .language
        .clone()
        .unwrap_or_else(|| config.openai.language.clone());

    let provider = OpenAiWhisper::new(
        &api_key,
        &config.openai.api_base,
        &config.openai.transcription_model,
        timeout,
    )?;
    let transcriber = Transcriber::new(Box::new(provider), &language);
    let chunker = Chunker::new(config.transcription.size_ceiling_bytes());
    let mut pipeline = TranscriptionPipeline::new(chunker, transcriber);

    let pb = spinner("Transcribing...");
    let transcript = pipeline.run(&asset).await;
    pb.finish_and_clear();
    let transcript = transcript?;

    if transcript.is_empty() {
        eprintln!("Transcription produced no text; writing empty notes for inspection.");
    } else {
        eprintln!("Transcription complete ({} chars)", transcript.len());
    }

    let summarizer = Summarizer::new(
        &api_key,
        &config.openai.api_base,
        &config.openai.chat_model,
        timeout,
    );

    let pb = spinner("Summarizing...");
    let summary = match summarizer.summarize(&transcript).await {
        Ok(summary) => {
            pb.finish_and_clear();
            eprintln!("Summary created");
            summary
        }
        Err(e) => {
            pb.finish_and_clear();
            warn!("Summarization failed: {}", e);
            eprintln!("Summarization failed ({}); writing an empty summary", e);
            MeetingSummary::default()
        }
    };

    let now = Local::now();
    let title = args
        .title
        .clone()
        .unwrap_or_else(|| notes::default_title(&now));
    let record = MeetingRecord::new(&title, summary, &transcript, &now);

    let output_dir = args
        .output_dir
        .clone()
        .or_else(|| config.notes.output_dir.clone());
    let writer = NotesWriter::new(output_dir);

    let json_path = writer.save_json(&record, &now)?;
    eprintln!("Meeting data saved: {}", json_path.display());

    let html = notes::render_html(&record);
    let html_path = writer.save_html(&html, &now)?;
    eprintln!("Notes saved: {}", html_path.display());

    if !args.email.is_empty() {
        deliver_notes(config, &html, &args.email, &now).await;
    }

    println!();
    println!("Generated files:");
    println!("  Audio: {}", asset.path.display());
    println!("  Data:  {}", json_path.display());
    println!("  Notes: {}", html_path.display());

    Ok(())
}

/// Best-effort email delivery; the saved artifacts are already on disk.
async fn deliver_notes(
    config: &Config,
    html: &str,
    recipients: &[String],
    now: &chrono::DateTime<Local>,
) {
    match SmtpMailer::from_config(&config.email) {
        Ok(Some(mailer)) => {
            let subject = format!("Meeting notes - {}", now.format("%d.%m.%Y"));
            match mailer.deliver(&subject, html, recipients).await {
                Ok(()) => eprintln!("Notes emailed to {} recipient(s)", recipients.len()),
                Err(e) => eprintln!("Email delivery failed: {}", e),
            }
        }
        Ok(None) => {
            eprintln!("Email requested but SMTP is not configured; skipping delivery.");
        }
        Err(e) => eprintln!("Email delivery failed: {}", e),
    }
}

/// Validate that the file exists and has a supported format.
fn validate_file(path: &Path) -> Result<()> {
    if !path.exists() {
        bail!("File not found: {}", path.display());
    }

    if AudioFormat::from_path(path).is_none() {
        bail!(
            "Unsupported format: {}\nSupported formats: wav, mp3, m4a, flac, ogg, opus",
            path.display(),
        );
    }

    Ok(())
}

fn recording_path() -> Result<PathBuf> {
    let dir = crate::global::recordings_dir()?;
    std::fs::create_dir_all(&dir).context("Failed to create recordings directory")?;
    let timestamp = Local::now().format("%Y%m%d-%H%M%S");
    Ok(dir.join(format!("meeting-{}.wav", timestamp)))
}

/// Create a styled spinner for long-running stages.
fn spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap(),
    );
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_file_supported_audio() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test_audio.wav");
        std::fs::write(&path, b"test").unwrap();
        assert!(validate_file(&path).is_ok());
    }

    #[test]
    fn test_validate_file_unsupported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test_unsupported.xyz");
        std::fs::write(&path, b"test").unwrap();
        assert!(validate_file(&path).is_err());
    }

    #[test]
    fn test_validate_file_not_found() {
        assert!(validate_file(Path::new("/tmp/nonexistent_file.wav")).is_err());
    }
}
