use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::debug;

use crate::segments::TranscriptionResult;
use crate::transcriber::{LanguageHint, ModelSize, Transcriber};
use crate::wav::read_wav_samples;

mod ctx;
mod logging;
mod segments;

/// Built-in transcriber powered by `whisper-rs` / `whisper.cpp`.
///
/// Models are ggml files looked up by size in `models_dir` and loaded fresh for every call, so
/// a transcriber holds no model state between runs.
#[derive(Debug, Clone)]
pub struct WhisperTranscriber {
    models_dir: PathBuf,
}

impl WhisperTranscriber {
    pub fn new(models_dir: impl Into<PathBuf>) -> Self {
        Self {
            models_dir: models_dir.into(),
        }
    }

    /// ggml filename for a model size, as published by whisper.cpp.
    pub fn model_filename(size: ModelSize) -> &'static str {
        match size {
            ModelSize::Tiny => "ggml-tiny.bin",
            ModelSize::Base => "ggml-base.bin",
            ModelSize::Small => "ggml-small.bin",
            ModelSize::Medium => "ggml-medium.bin",
            ModelSize::Large => "ggml-large-v3.bin",
        }
    }

    pub fn model_path(&self, size: ModelSize) -> PathBuf {
        self.models_dir.join(Self::model_filename(size))
    }

    pub fn models_dir(&self) -> &Path {
        &self.models_dir
    }
}

impl Transcriber for WhisperTranscriber {
    fn transcribe(
        &mut self,
        audio_path: &Path,
        model_size: ModelSize,
        language: &LanguageHint,
    ) -> crate::Result<TranscriptionResult> {
        Ok(transcribe_file(&self.model_path(model_size), audio_path, language)?)
    }
}

fn transcribe_file(
    model_path: &Path,
    audio_path: &Path,
    language: &LanguageHint,
) -> Result<TranscriptionResult> {
    let ctx = ctx::load_context(model_path)?;
    let (samples, spec) = read_wav_samples(audio_path)?;
    debug!(samples = samples.len(), sample_rate = spec.sample_rate, "loaded audio");

    let reported_language = |detected: Option<String>| match language {
        LanguageHint::Auto => detected,
        LanguageHint::Explicit(lang) => Some(lang.clone()),
    };

    // Silent or empty tracks: nothing to recognise, and whisper rejects zero samples.
    if samples.is_empty() {
        return Ok(TranscriptionResult::new("", reported_language(None), Vec::new())?);
    }

    let state = segments::run_whisper_full(&ctx, language, &samples)?;
    let detected = match language {
        LanguageHint::Auto => segments::detected_language(&state),
        LanguageHint::Explicit(_) => None,
    };
    let transcript = segments::collect_segments(&state)?;

    TranscriptionResult::from_segments(reported_language(detected), transcript)
        .context("whisper produced an invalid transcript")
}
