//! OpenAI Whisper transcription provider.

use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use std::future::Future;
use std::path::Path;
use std::pin::Pin;
use std::time::Duration;
use tracing::{debug, error, info};

use super::error::TranscriptionError;
use super::SpeechToText;
use crate::audio::AudioFormat;

#[derive(Debug, Deserialize)]
struct TranscriptionResponse {
    text: String,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: String,
    r#type: Option<String>,
    code: Option<String>,
}

pub struct OpenAiWhisper {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    model: String,
}

impl OpenAiWhisper {
    pub fn new(
        api_key: &str,
        api_base: &str,
        model: &str,
        timeout: Duration,
    ) -> Result<Self, TranscriptionError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TranscriptionError::Request(e.to_string()))?;
        let endpoint = format!("{}/audio/transcriptions", api_base.trim_end_matches('/'));

        info!("Initialized OpenAI Whisper provider with endpoint: {}", endpoint);

        Ok(Self {
            client,
            endpoint,
            api_key: api_key.trim().to_string(),
            model: model.to_string(),
        })
    }
}

impl SpeechToText for OpenAiWhisper {
    fn name(&self) -> &'static str {
        "OpenAI Whisper API"
    }

    fn transcribe<'a>(
        &'a self,
        audio_path: &'a Path,
        language: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<String, TranscriptionError>> + Send + 'a>> {
        Box::pin(async move {
            info!("Transcribing audio file via OpenAI: {:?}", audio_path);

            let bytes = tokio::fs::read(audio_path).await?;
            let filename = audio_path
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or("audio.wav")
                .to_string();
            let mime = AudioFormat::from_path(audio_path)
                .map(|f| f.mime_type())
                .unwrap_or("application/octet-stream");

            let part = Part::bytes(bytes)
                .file_name(filename)
                .mime_str(mime)
                .map_err(|e| TranscriptionError::Request(e.to_string()))?;

            let form = Form::new()
                .part("file", part)
                .text("model", self.model.clone())
                .text("language", language.to_string())
                .text("response_format", "json");

            debug!("Sending transcription request (model: {})", self.model);

            let response = self
                .client
                .post(&self.endpoint)
                .bearer_auth(&self.api_key)
                .multipart(form)
                .send()
                .await
                .map_err(|e| TranscriptionError::Request(e.to_string()))?;

            let status = response.status();
            let response_text = response
                .text()
                .await
                .map_err(|e| TranscriptionError::Request(e.to_string()))?;

            if !status.is_success() {
                error!(
                    "OpenAI transcription request failed with status {}: {}",
                    status, response_text
                );

                let message = match serde_json::from_str::<ErrorResponse>(&response_text) {
                    Ok(parsed) => format!(
                        "{} (type: {:?}, code: {:?})",
                        parsed.error.message, parsed.error.r#type, parsed.error.code
                    ),
                    Err(_) => response_text,
                };

                return Err(TranscriptionError::Api {
                    status: status.as_u16(),
                    message,
                });
            }

            let transcription: TranscriptionResponse = serde_json::from_str(&response_text)
                .map_err(|e| TranscriptionError::MalformedResponse(e.to_string()))?;

            info!("Transcription complete: {} chars", transcription.text.len());
            debug!("Raw transcription: {}", transcription.text);

            Ok(transcription.text)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_from_api_base() {
        let provider = OpenAiWhisper::new(
            "key",
            "https://api.openai.com/v1/",
            "whisper-1",
            Duration::from_secs(30),
        )
        .unwrap();
        assert_eq!(
            provider.endpoint,
            "https://api.openai.com/v1/audio/transcriptions"
        );
    }

    #[test]
    fn test_error_response_parsing() {
        let body = r#"{"error": {"message": "quota exceeded", "type": "insufficient_quota", "code": null}}"#;
        let parsed: ErrorResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.error.message, "quota exceeded");
        assert_eq!(parsed.error.r#type.as_deref(), Some("insufficient_quota"));
        assert!(parsed.error.code.is_none());
    }
}
