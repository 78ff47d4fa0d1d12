//! Remote speech-to-text and the per-segment tolerance policy.

use std::future::Future;
use std::path::Path;
use std::pin::Pin;
use tracing::{debug, info, warn};

use crate::audio::SegmentSet;

pub mod assembler;
pub mod error;
pub mod openai_api;

pub use assembler::{assemble, TranscriptFragment};
pub use error::TranscriptionError;
pub use openai_api::OpenAiWhisper;

/// A remote speech-to-text capability: audio file in, recognized text out.
///
/// Errors are opaque to callers: network trouble, quota, and malformed
/// audio are all the same failure as far as the tolerance policy goes.
pub trait SpeechToText: Send + Sync {
    fn name(&self) -> &'static str;

    fn transcribe<'a>(
        &'a self,
        audio_path: &'a Path,
        language: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<String, TranscriptionError>> + Send + 'a>>;
}

/// Turns an ordered segment set into ordered transcript fragments.
///
/// Requests are issued strictly one at a time in segment order, never
/// concurrently, to bound memory and avoid rate-limit bursts.
pub struct Transcriber {
    provider: Box<dyn SpeechToText>,
    language: String,
}

impl Transcriber {
    pub fn new(provider: Box<dyn SpeechToText>, language: impl Into<String>) -> Self {
        Self {
            provider,
            language: language.into(),
        }
    }

    /// Transcribe every segment in the set.
    ///
    /// With a single segment the request's text is returned verbatim (even
    /// when empty) and a request error propagates: there is nothing else to
    /// salvage, the failure is the job's failure.
    ///
    /// With multiple segments each request failure is absorbed as an empty
    /// fragment and the remaining segments still go out; one bad chunk
    /// never takes down the rest of the meeting. Fragments come back in
    /// ascending segment order regardless of which requests failed.
    ///
    /// Segment files created by the split are deleted as soon as their
    /// fragment exists; caller-owned files are left alone.
    pub async fn transcribe(
        &self,
        set: &SegmentSet,
    ) -> Result<Vec<TranscriptFragment>, TranscriptionError> {
        match set.segments.as_slice() {
            [] => Ok(Vec::new()),
            [only] => {
                let text = self.provider.transcribe(&only.path, &self.language).await?;
                Ok(vec![TranscriptFragment::new(only.index, text)])
            }
            segments => {
                let total = segments.len();
                let mut fragments = Vec::with_capacity(total);

                for segment in segments {
                    info!("Transcribing part {}/{}...", segment.index + 1, total);

                    let fragment = match self
                        .provider
                        .transcribe(&segment.path, &self.language)
                        .await
                    {
                        Ok(text) => {
                            info!("Part {} done", segment.index + 1);
                            TranscriptFragment::new(segment.index, text.trim())
                        }
                        Err(e) => {
                            warn!(
                                "Transcription of part {} failed, continuing without it: {}",
                                segment.index + 1,
                                e
                            );
                            TranscriptFragment::empty(segment.index)
                        }
                    };
                    fragments.push(fragment);

                    if segment.ephemeral {
                        if let Err(e) = std::fs::remove_file(&segment.path) {
                            debug!(
                                "Could not remove segment file {}: {}",
                                segment.path.display(),
                                e
                            );
                        }
                    }
                }

                Ok(fragments)
            }
        }
    }

    pub fn provider_name(&self) -> &'static str {
        self.provider.name()
    }
}
