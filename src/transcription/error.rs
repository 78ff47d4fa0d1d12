/// Errors from a single remote transcription request.
///
/// Network trouble, quota limits, and malformed audio all surface here and
/// are treated identically by the caller: one failed request means one
/// empty fragment when other segments remain, or a failed transcription
/// when the request was the whole job.
#[derive(Debug, thiserror::Error)]
pub enum TranscriptionError {
    #[error("failed to read audio for upload: {0}")]
    Io(#[from] std::io::Error),
    #[error("transcription request failed: {0}")]
    Request(String),
    #[error("transcription API returned {status}: {message}")]
    Api { status: u16, message: String },
    #[error("malformed transcription response: {0}")]
    MalformedResponse(String),
}
