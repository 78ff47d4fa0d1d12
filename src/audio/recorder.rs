//! Microphone capture via cpal.
//!
//! Captures mono audio from the default input device into an in-memory
//! buffer. Recording runs either for a fixed duration or until the user
//! interrupts it with Ctrl+C; an interrupted recording is still written
//! out as a valid (truncated) WAV file.

use anyhow::{bail, Context, Result};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use hound::{WavSpec, WavWriter};
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::{debug, error, info};

pub struct MicRecorder {
    device: cpal::Device,
    config: cpal::StreamConfig,
    samples: Arc<Mutex<Vec<f32>>>,
    stream: Option<cpal::Stream>,
    active: bool,
    sample_rate: u32,
}

impl MicRecorder {
    /// Create a recorder using the default input device.
    pub fn new(sample_rate: u32) -> Result<Self> {
        let host = cpal::default_host();
        let device = host
            .default_input_device()
            .context("No input device available for meeting capture")?;

        info!(
            "Recording from device: {}",
            device.name().unwrap_or_else(|_| "unknown".to_string())
        );

        let config = cpal::StreamConfig {
            channels: 1,
            sample_rate: cpal::SampleRate(sample_rate),
            buffer_size: cpal::BufferSize::Default,
        };

        Ok(Self {
            device,
            config,
            samples: Arc::new(Mutex::new(Vec::new())),
            stream: None,
            active: false,
            sample_rate,
        })
    }

    pub fn start(&mut self) -> Result<()> {
        if self.active {
            bail!("Recorder already running");
        }

        {
            let mut samples = self.samples.lock().unwrap();
            samples.clear();
            samples.shrink_to_fit();
        }

        let samples_clone = self.samples.clone();
        let err_fn = |err| error!("Input stream error: {}", err);

        let stream = self.device.build_input_stream(
            &self.config,
            move |data: &[f32], _: &cpal::InputCallbackInfo| {
                if let Ok(mut samples) = samples_clone.lock() {
                    samples.extend_from_slice(data);
                }
            },
            err_fn,
            None,
        )?;

        stream.play()?;
        self.stream = Some(stream);
        self.active = true;

        info!("Recording started");
        Ok(())
    }

    pub fn stop(&mut self) -> Result<Vec<f32>> {
        if !self.active {
            bail!("Recorder not running");
        }

        if let Some(stream) = self.stream.take() {
            debug!("Stopping input stream");
            drop(stream);
        }

        self.active = false;

        let samples = {
            let mut guard = self.samples.lock().unwrap();
            let s = guard.clone();
            guard.clear();
            guard.shrink_to_fit();
            s
        };

        info!("Recording stopped, {} samples captured", samples.len());
        Ok(samples)
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }
}

impl Drop for MicRecorder {
    fn drop(&mut self) {
        if self.active {
            debug!("Dropping active MicRecorder, cleaning up");
            let _ = self.stop();
        }
    }
}

/// Record from the microphone into a 16-bit PCM WAV file.
///
/// With `duration_seconds` the recording stops on its own; without it the
/// recording runs until Ctrl+C, which still yields a valid truncated file.
pub async fn record_to_file(
    path: &Path,
    duration_seconds: Option<u64>,
    sample_rate: u32,
) -> Result<()> {
    let mut recorder = MicRecorder::new(sample_rate)?;
    recorder.start()?;

    match duration_seconds {
        Some(secs) => {
            info!("Recording for {} seconds", secs);
            tokio::time::sleep(Duration::from_secs(secs)).await;
        }
        None => {
            info!("Recording until interrupted (Ctrl+C)");
            tokio::signal::ctrl_c()
                .await
                .context("Failed to listen for Ctrl+C")?;
            info!("Recording interrupted");
        }
    }

    let samples = recorder.stop()?;
    if samples.is_empty() {
        bail!("No audio samples captured");
    }

    write_wav(path, &samples, sample_rate)?;
    Ok(())
}

/// Write float samples as 16-bit PCM.
pub fn write_wav(path: &Path, samples: &[f32], sample_rate: u32) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let spec = WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut writer = WavWriter::create(path, spec)?;
    for &sample in samples {
        let value = (sample.clamp(-1.0, 1.0) * i16::MAX as f32) as i16;
        writer.write_sample(value)?;
    }
    writer.finalize()?;

    info!(
        "Recording saved: {} ({} samples)",
        path.display(),
        samples.len()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_wav_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("capture.wav");
        let samples = vec![0.0f32, 0.5, -0.5, 1.0, -1.0, 2.0, -2.0];

        write_wav(&path, &samples, 16000).unwrap();

        let reader = hound::WavReader::open(&path).unwrap();
        let spec = reader.spec();
        assert_eq!(spec.channels, 1);
        assert_eq!(spec.sample_rate, 16000);
        assert_eq!(spec.bits_per_sample, 16);
        assert_eq!(reader.duration() as usize, samples.len());

        // Out-of-range input is clamped, not wrapped.
        let decoded: Vec<i16> = reader
            .into_samples::<i16>()
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(decoded[3], i16::MAX);
        assert_eq!(decoded[5], i16::MAX);
        assert_eq!(decoded[6], -i16::MAX);
    }
}
