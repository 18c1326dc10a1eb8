use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;

use anyhow::{Context, Result};
use hound::{WavReader, WavSpec};

use crate::audio::{TARGET_CHANNELS, TARGET_SAMPLE_RATE};

/// Load WAV audio from a reader and return normalized audio samples.
///
/// What we return:
/// - A `Vec<f32>` containing mono audio samples normalized to `[-1.0, 1.0]`
/// - The associated `WavSpec` so callers still have access to metadata
///
/// The input must be exactly what the audio extractor produces: mono, 16 kHz, 16-bit integer
/// PCM. Anything else means the extraction step and the model disagree, which we report
/// rather than silently resample.
pub fn get_samples_from_wav_reader<R>(reader: R) -> Result<(Vec<f32>, WavSpec)>
where
    R: Read + Seek,
{
    let mut reader = WavReader::new(reader).context("failed to read WAV data from reader")?;
    let spec = reader.spec();

    if spec.channels != TARGET_CHANNELS {
        anyhow::bail!(
            "expected mono WAV (1 channel), got {} channels",
            spec.channels
        );
    }

    if spec.sample_rate != TARGET_SAMPLE_RATE {
        anyhow::bail!(
            "expected {} Hz sample rate, got {} Hz",
            TARGET_SAMPLE_RATE,
            spec.sample_rate
        );
    }

    if spec.bits_per_sample != 16 || spec.sample_format != hound::SampleFormat::Int {
        anyhow::bail!(
            "expected 16-bit integer PCM, got {}-bit {:?}",
            spec.bits_per_sample,
            spec.sample_format
        );
    }

    // Normalize from i16 PCM to f32 in [-1.0, 1.0], which is what whisper expects.
    let samples = reader
        .samples::<i16>()
        .map(|sample| sample.map(|pcm| pcm as f32 / i16::MAX as f32))
        .collect::<std::result::Result<Vec<_>, _>>()
        .context("failed to decode WAV samples")?;

    Ok((samples, spec))
}

/// [`get_samples_from_wav_reader`] for a file on disk.
pub fn read_wav_samples(path: &Path) -> Result<(Vec<f32>, WavSpec)> {
    let file = File::open(path)
        .with_context(|| format!("failed to open audio file '{}'", path.display()))?;
    get_samples_from_wav_reader(BufReader::new(file))
}
