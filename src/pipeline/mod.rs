//! The transcription pipeline: split → transcribe → assemble.
//!
//! One linear pass per job, no retries, no concurrency. The pipeline owns
//! every temporary resource it creates and releases them on all exit paths;
//! the source asset is never touched.

use thiserror::Error;
use tracing::{error, info};

use crate::audio::{AudioAsset, AudioError, Chunker};
use crate::transcription::{assemble, Transcriber};

/// Pipeline lifecycle. `Failed` is reachable only from `Splitting`: once
/// the audio is readable, transcription and assembly degrade to partial or
/// empty output instead of failing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelinePhase {
    Idle,
    Splitting,
    Transcribing,
    Assembling,
    Done,
    Failed,
}

impl PipelinePhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Splitting => "splitting",
            Self::Transcribing => "transcribing",
            Self::Assembling => "assembling",
            Self::Done => "done",
            Self::Failed => "failed",
        }
    }
}

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Audio(#[from] AudioError),
}

pub struct TranscriptionPipeline {
    chunker: Chunker,
    transcriber: Transcriber,
    phase: PipelinePhase,
}

impl TranscriptionPipeline {
    pub fn new(chunker: Chunker, transcriber: Transcriber) -> Self {
        Self {
            chunker,
            transcriber,
            phase: PipelinePhase::Idle,
        }
    }

    pub fn phase(&self) -> PipelinePhase {
        self.phase
    }

    /// Run one transcription job and return the assembled transcript.
    ///
    /// The transcript may be empty (a valid outcome when every remote
    /// request failed) and callers are expected to handle it explicitly.
    /// The only fatal error is unreadable source audio, raised before any
    /// remote call is made.
    pub async fn run(&mut self, asset: &AudioAsset) -> Result<String, PipelineError> {
        self.set_phase(PipelinePhase::Splitting);
        let set = match self.chunker.split(asset) {
            Ok(set) => set,
            Err(e) => {
                self.set_phase(PipelinePhase::Failed);
                error!("Audio split failed: {}", e);
                return Err(e.into());
            }
        };

        self.set_phase(PipelinePhase::Transcribing);
        let fragments = match self.transcriber.transcribe(&set).await {
            Ok(fragments) => fragments,
            Err(e) => {
                // Single-request failure: the job degrades to an empty
                // transcript so downstream still writes inspectable output.
                error!("Transcription failed: {}", e);
                Vec::new()
            }
        };

        self.set_phase(PipelinePhase::Assembling);
        let transcript = assemble(&fragments);
        drop(set);

        self.set_phase(PipelinePhase::Done);
        Ok(transcript)
    }

    fn set_phase(&mut self, phase: PipelinePhase) {
        info!("Pipeline phase: {}", phase.as_str());
        self.phase = phase;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transcription::{SpeechToText, TranscriptionError};
    use std::future::Future;
    use std::path::Path;
    use std::pin::Pin;
    use std::sync::Mutex;

    struct ScriptedStt {
        responses: Mutex<Vec<Result<String, TranscriptionError>>>,
    }

    impl ScriptedStt {
        fn new(responses: Vec<Result<String, TranscriptionError>>) -> Self {
            Self {
                responses: Mutex::new(responses),
            }
        }
    }

    impl SpeechToText for ScriptedStt {
        fn name(&self) -> &'static str {
            "scripted"
        }

        fn transcribe<'a>(
            &'a self,
            _audio_path: &'a Path,
            _language: &'a str,
        ) -> Pin<Box<dyn Future<Output = Result<String, TranscriptionError>> + Send + 'a>>
        {
            Box::pin(async move {
                let mut responses = self.responses.lock().unwrap();
                responses.remove(0)
            })
        }
    }

    fn write_test_wav(path: &Path, frames: u32) {
        let spec = hound::WavSpec {
            channels: 1,
            sample_rate: 16000,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut writer = hound::WavWriter::create(path, spec).unwrap();
        for i in 0..frames {
            writer.write_sample((i % 64) as i16).unwrap();
        }
        writer.finalize().unwrap();
    }

    fn pipeline_for(
        responses: Vec<Result<String, TranscriptionError>>,
        ceiling: u64,
    ) -> TranscriptionPipeline {
        let transcriber = Transcriber::new(Box::new(ScriptedStt::new(responses)), "en");
        TranscriptionPipeline::new(Chunker::new(ceiling), transcriber)
    }

    #[tokio::test]
    async fn test_run_single_segment_job() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("meeting.wav");
        write_test_wav(&path, 1600);
        let asset = AudioAsset::probe(&path).unwrap();

        let mut pipeline = pipeline_for(vec![Ok("full transcript".to_string())], asset.byte_size);
        let transcript = pipeline.run(&asset).await.unwrap();

        assert_eq!(transcript, "full transcript");
        assert_eq!(pipeline.phase(), PipelinePhase::Done);
    }

    #[tokio::test]
    async fn test_run_multi_segment_job_with_partial_failure() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("meeting.wav");
        write_test_wav(&path, 16000);
        let asset = AudioAsset::probe(&path).unwrap();

        let mut pipeline = pipeline_for(
            vec![
                Ok("beginning".to_string()),
                Err(TranscriptionError::Request("quota".to_string())),
                Ok("ending".to_string()),
            ],
            asset.byte_size.div_ceil(3) + 1,
        );
        let transcript = pipeline.run(&asset).await.unwrap();

        assert_eq!(transcript, "beginning ending");
        assert_eq!(pipeline.phase(), PipelinePhase::Done);
    }

    #[tokio::test]
    async fn test_run_total_failure_yields_empty_transcript() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("meeting.wav");
        write_test_wav(&path, 16000);
        let asset = AudioAsset::probe(&path).unwrap();

        let mut pipeline = pipeline_for(
            vec![
                Err(TranscriptionError::Request("down".to_string())),
                Err(TranscriptionError::Request("down".to_string())),
                Err(TranscriptionError::Request("down".to_string())),
            ],
            asset.byte_size.div_ceil(3) + 1,
        );
        let transcript = pipeline.run(&asset).await.unwrap();

        // Total failure is a valid empty result, not an error.
        assert_eq!(transcript, "");
        assert_eq!(pipeline.phase(), PipelinePhase::Done);
    }

    #[tokio::test]
    async fn test_run_single_segment_error_degrades_to_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("meeting.wav");
        write_test_wav(&path, 1600);
        let asset = AudioAsset::probe(&path).unwrap();

        let mut pipeline = pipeline_for(
            vec![Err(TranscriptionError::Request("refused".to_string()))],
            asset.byte_size,
        );
        let transcript = pipeline.run(&asset).await.unwrap();

        assert_eq!(transcript, "");
        assert_eq!(pipeline.phase(), PipelinePhase::Done);
    }

    #[tokio::test]
    async fn test_run_unreadable_audio_fails_before_any_request() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("meeting.wav");
        write_test_wav(&path, 1600);
        let mut asset = AudioAsset::probe(&path).unwrap();
        std::fs::write(&path, b"corrupted").unwrap();
        asset.byte_size = 1 << 20;

        // No scripted responses: reaching the provider would panic.
        let mut pipeline = pipeline_for(Vec::new(), 1024);
        let result = pipeline.run(&asset).await;

        assert!(matches!(result, Err(PipelineError::Audio(_))));
        assert_eq!(pipeline.phase(), PipelinePhase::Failed);
    }

    #[tokio::test]
    async fn test_run_cleans_up_segment_storage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("meeting.wav");
        write_test_wav(&path, 16000);
        let asset = AudioAsset::probe(&path).unwrap();

        let mut pipeline = pipeline_for(
            vec![Ok("a".to_string()), Ok("b".to_string())],
            asset.byte_size.div_ceil(2) + 1,
        );
        pipeline.run(&asset).await.unwrap();

        // Only the source recording remains.
        let leftovers: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(leftovers, vec!["meeting.wav"]);
        assert!(path.exists());
    }
}
