//! Size-aware audio splitting.
//!
//! The remote transcription service caps the upload size per request. Files
//! under the ceiling pass through untouched; larger WAV recordings are cut
//! into duration-based chunks, each written as a self-contained WAV so it
//! stays independently decodable. Splitting is never done on raw bytes:
//! audio containers do not survive byte slicing.

use std::path::{Path, PathBuf};

use hound::{SampleFormat, WavReader, WavSpec, WavWriter};
use tempfile::TempDir;
use tracing::{debug, info};

use super::asset::{AudioAsset, AudioFormat};
use super::AudioError;

/// A contiguous time slice `[start_frame, end_frame)` of a source asset.
///
/// `ephemeral` marks segments whose backing file was created by the split
/// and may be deleted once transcribed; a passthrough segment points at the
/// caller's own file and is never deleted by the pipeline.
#[derive(Debug)]
pub struct AudioSegment {
    pub path: PathBuf,
    pub index: usize,
    pub start_frame: u64,
    pub end_frame: u64,
    pub ephemeral: bool,
}

/// The ordered segments produced for one transcription job.
///
/// Owns the temporary directory backing any ephemeral segments; dropping
/// the set removes whatever is left of them, on every exit path.
#[derive(Debug)]
pub struct SegmentSet {
    pub segments: Vec<AudioSegment>,
    _temp_dir: Option<TempDir>,
}

impl SegmentSet {
    fn passthrough(asset: &AudioAsset) -> Self {
        Self {
            segments: vec![AudioSegment {
                path: asset.path.clone(),
                index: 0,
                start_frame: 0,
                end_frame: asset.total_frames.unwrap_or(0),
                ephemeral: false,
            }],
            _temp_dir: None,
        }
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn is_split(&self) -> bool {
        self._temp_dir.is_some()
    }
}

/// Plan the `[start, end)` frame windows for a split.
///
/// The part count comes from the byte-size ratio, but the cut positions are
/// time-based: equal integer-division windows, with the final window
/// absorbing the remainder so the union covers every frame exactly once.
pub(crate) fn plan_windows(byte_size: u64, ceiling_bytes: u64, total_frames: u64) -> Vec<(u64, u64)> {
    let num_parts = byte_size.div_ceil(ceiling_bytes).max(1);
    let part_frames = total_frames / num_parts;

    (0..num_parts)
        .map(|i| {
            let start = i * part_frames;
            let end = if i == num_parts - 1 {
                total_frames
            } else {
                (i + 1) * part_frames
            };
            (start, end)
        })
        .collect()
}

pub struct Chunker {
    size_ceiling_bytes: u64,
}

impl Chunker {
    pub fn new(size_ceiling_bytes: u64) -> Self {
        Self { size_ceiling_bytes }
    }

    /// Split an asset into independently decodable segments.
    ///
    /// Assets at or under the ceiling come back as a single passthrough
    /// segment referencing the original file, with no copy and no
    /// temporary storage. Larger WAV files are cut into `ceil(size /
    /// ceiling)` chunks. The split is all-or-nothing: any failure drops the
    /// temp directory with every partial segment in it.
    pub fn split(&self, asset: &AudioAsset) -> Result<SegmentSet, AudioError> {
        if self.size_ceiling_bytes == 0 {
            return Err(AudioError::InvalidCeiling);
        }

        if asset.byte_size <= self.size_ceiling_bytes {
            debug!(
                "Audio file {} ({} bytes) fits under the ceiling, no split needed",
                asset.path.display(),
                asset.byte_size
            );
            return Ok(SegmentSet::passthrough(asset));
        }

        if asset.format != AudioFormat::Wav {
            return Err(AudioError::UnsupportedSplitFormat {
                format: asset.format.as_str(),
            });
        }

        let mut reader = WavReader::open(&asset.path).map_err(|source| AudioError::Unreadable {
            path: asset.path.clone(),
            source,
        })?;
        let spec = reader.spec();
        let total_frames = reader.duration() as u64;
        let windows = plan_windows(asset.byte_size, self.size_ceiling_bytes, total_frames);

        info!(
            "Audio file ({:.1}MB) exceeds the {:.1}MB ceiling, splitting into {} parts",
            asset.byte_size as f64 / (1024.0 * 1024.0),
            self.size_ceiling_bytes as f64 / (1024.0 * 1024.0),
            windows.len()
        );

        let temp_dir = TempDir::new()?;
        let paths = match spec.sample_format {
            SampleFormat::Float => {
                write_windows::<f32>(&mut reader, spec, &windows, temp_dir.path(), &asset.path)?
            }
            SampleFormat::Int => {
                write_windows::<i32>(&mut reader, spec, &windows, temp_dir.path(), &asset.path)?
            }
        };

        let segments = windows
            .iter()
            .zip(paths)
            .enumerate()
            .map(|(index, (&(start_frame, end_frame), path))| AudioSegment {
                path,
                index,
                start_frame,
                end_frame,
                ephemeral: true,
            })
            .collect();

        Ok(SegmentSet {
            segments,
            _temp_dir: Some(temp_dir),
        })
    }
}

fn write_windows<S>(
    reader: &mut WavReader<std::io::BufReader<std::fs::File>>,
    spec: WavSpec,
    windows: &[(u64, u64)],
    dir: &Path,
    source_path: &Path,
) -> Result<Vec<PathBuf>, AudioError>
where
    S: hound::Sample + Copy,
{
    let samples: Vec<S> = reader
        .samples::<S>()
        .collect::<Result<_, _>>()
        .map_err(|source| AudioError::Unreadable {
            path: source_path.to_path_buf(),
            source,
        })?;

    let channels = spec.channels as u64;
    let mut paths = Vec::with_capacity(windows.len());

    for (i, &(start, end)) in windows.iter().enumerate() {
        let path = dir.join(format!("part_{}.wav", i + 1));
        let range = (start * channels) as usize..(end * channels) as usize;

        let write = |path: &Path| -> Result<(), hound::Error> {
            let mut writer = WavWriter::create(path, spec)?;
            for &sample in &samples[range.clone()] {
                writer.write_sample(sample)?;
            }
            writer.finalize()
        };

        write(&path).map_err(|source| AudioError::SegmentWrite {
            path: path.clone(),
            source,
        })?;

        debug!(
            "Wrote segment {}/{}: {} (frames {}..{})",
            i + 1,
            windows.len(),
            path.display(),
            start,
            end
        );
        paths.push(path);
    }

    Ok(paths)
}
