//! Immutable reference to a recorded audio file.

use std::path::{Path, PathBuf};

use super::AudioError;

/// Audio container formats accepted for transcription upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioFormat {
    Wav,
    Mp3,
    M4a,
    Flac,
    Ogg,
    Opus,
}

impl AudioFormat {
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_lowercase();
        match ext.as_str() {
            "wav" => Some(Self::Wav),
            "mp3" => Some(Self::Mp3),
            "m4a" => Some(Self::M4a),
            "flac" => Some(Self::Flac),
            "ogg" => Some(Self::Ogg),
            "opus" => Some(Self::Opus),
            _ => None,
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Wav => "audio/wav",
            Self::Mp3 => "audio/mpeg",
            Self::M4a => "audio/mp4",
            Self::Flac => "audio/flac",
            Self::Ogg => "audio/ogg",
            Self::Opus => "audio/opus",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Wav => "wav",
            Self::Mp3 => "mp3",
            Self::M4a => "m4a",
            Self::Flac => "flac",
            Self::Ogg => "ogg",
            Self::Opus => "opus",
        }
    }
}

/// An immutable reference to a recorded sound file.
///
/// The asset is read-only to the pipeline: it is never mutated in place and
/// never deleted, even when a transcription job fails. Duration and frame
/// count are derived at probe time and only available for WAV input (the
/// only format the chunker can re-cut).
#[derive(Debug, Clone)]
pub struct AudioAsset {
    pub path: PathBuf,
    pub byte_size: u64,
    pub format: AudioFormat,
    pub duration_secs: Option<f64>,
    pub total_frames: Option<u64>,
}

impl AudioAsset {
    /// Inspect a file on disk and build an asset reference for it.
    pub fn probe(path: &Path) -> Result<Self, AudioError> {
        let metadata = std::fs::metadata(path)?;
        let format = AudioFormat::from_path(path).ok_or_else(|| AudioError::UnsupportedFormat {
            path: path.to_path_buf(),
        })?;

        let (duration_secs, total_frames) = if format == AudioFormat::Wav {
            let reader = hound::WavReader::open(path).map_err(|source| AudioError::Unreadable {
                path: path.to_path_buf(),
                source,
            })?;
            let spec = reader.spec();
            let frames = reader.duration() as u64;
            (Some(frames as f64 / spec.sample_rate as f64), Some(frames))
        } else {
            (None, None)
        };

        Ok(Self {
            path: path.to_path_buf(),
            byte_size: metadata.len(),
            format,
            duration_secs,
            total_frames,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_wav(path: &Path, frames: u32, sample_rate: u32) {
        let spec = hound::WavSpec {
            channels: 1,
            sample_rate,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut writer = hound::WavWriter::create(path, spec).unwrap();
        for i in 0..frames {
            writer.write_sample((i % 128) as i16).unwrap();
        }
        writer.finalize().unwrap();
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(
            AudioFormat::from_path(Path::new("a/meeting.WAV")),
            Some(AudioFormat::Wav)
        );
        assert_eq!(
            AudioFormat::from_path(Path::new("meeting.mp3")),
            Some(AudioFormat::Mp3)
        );
        assert_eq!(AudioFormat::from_path(Path::new("meeting.xyz")), None);
        assert_eq!(AudioFormat::from_path(Path::new("meeting")), None);
    }

    #[test]
    fn test_probe_wav_derives_duration() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("probe.wav");
        write_wav(&path, 16000, 16000);

        let asset = AudioAsset::probe(&path).unwrap();
        assert_eq!(asset.format, AudioFormat::Wav);
        assert_eq!(asset.total_frames, Some(16000));
        assert!((asset.duration_secs.unwrap() - 1.0).abs() < 1e-9);
        assert!(asset.byte_size > 0);
    }

    #[test]
    fn test_probe_missing_file_is_io_error() {
        let result = AudioAsset::probe(Path::new("/nonexistent/missing.wav"));
        assert!(matches!(result, Err(AudioError::Io(_))));
    }

    #[test]
    fn test_probe_corrupt_wav_is_unreadable() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("corrupt.wav");
        std::fs::write(&path, b"definitely not a wav").unwrap();

        let result = AudioAsset::probe(&path);
        assert!(matches!(result, Err(AudioError::Unreadable { .. })));
    }
}
