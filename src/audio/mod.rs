//! Audio handling: asset probing, size-aware chunking, microphone capture.

use std::path::PathBuf;

pub mod asset;
pub mod chunker;
pub mod recorder;

pub use asset::{AudioAsset, AudioFormat};
pub use chunker::{AudioSegment, Chunker, SegmentSet};
pub use recorder::MicRecorder;

/// Errors raised while reading or splitting audio. All of these are fatal:
/// they abort a transcription job before any remote call is made.
#[derive(Debug, thiserror::Error)]
pub enum AudioError {
    #[error("unreadable audio file {path}")]
    Unreadable {
        path: PathBuf,
        #[source]
        source: hound::Error,
    },
    #[error("unsupported audio format: {path}")]
    UnsupportedFormat { path: PathBuf },
    #[error("cannot split {format} audio into chunks; only WAV recordings can be re-cut")]
    UnsupportedSplitFormat { format: &'static str },
    #[error("size ceiling must be greater than zero")]
    InvalidCeiling,
    #[error("failed to write audio segment {path}")]
    SegmentWrite {
        path: PathBuf,
        #[source]
        source: hound::Error,
    },
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
