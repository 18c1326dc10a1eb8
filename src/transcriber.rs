use std::fmt;
use std::path::Path;
use std::str::FromStr;

use tracing::info;

use crate::segments::TranscriptionResult;
use crate::{Error, Result};

/// Speech model sizes, smallest and fastest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum ModelSize {
    Tiny,
    Base,
    #[default]
    Small,
    Medium,
    Large,
}

impl ModelSize {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Tiny => "tiny",
            Self::Base => "base",
            Self::Small => "small",
            Self::Medium => "medium",
            Self::Large => "large",
        }
    }
}

impl fmt::Display for ModelSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModelSize {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "tiny" => Ok(Self::Tiny),
            "base" => Ok(Self::Base),
            "small" => Ok(Self::Small),
            "medium" => Ok(Self::Medium),
            "large" => Ok(Self::Large),
            other => Err(Error::invalid(format!("unknown model size '{other}'"))),
        }
    }
}

/// Which language to transcribe in.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LanguageHint {
    /// Let the model detect the language and report it.
    #[default]
    Auto,

    /// Passed to the model verbatim. Unknown values are the model's to reject.
    Explicit(String),
}

impl LanguageHint {
    /// `"auto"` (any case) means detection; anything else is an explicit hint.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("auto") {
            Self::Auto
        } else {
            Self::Explicit(trimmed.to_owned())
        }
    }

    pub fn explicit(&self) -> Option<&str> {
        match self {
            Self::Auto => None,
            Self::Explicit(lang) => Some(lang),
        }
    }
}

impl fmt::Display for LanguageHint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Auto => f.write_str("auto"),
            Self::Explicit(lang) => f.write_str(lang),
        }
    }
}

/// Pluggable speech-recognition engine used by [`crate::pipeline::PipelineRunner`].
///
/// A transcriber turns a 16 kHz mono PCM WAV into a [`TranscriptionResult`]. Model loading and
/// inference are one blocking call; nothing is streamed back. With [`LanguageHint::Auto`] the
/// result must carry the detected language, otherwise the hint it was run with.
pub trait Transcriber {
    fn transcribe(
        &mut self,
        audio_path: &Path,
        model_size: ModelSize,
        language: &LanguageHint,
    ) -> Result<TranscriptionResult>;
}

impl<T: Transcriber + ?Sized> Transcriber for &mut T {
    fn transcribe(
        &mut self,
        audio_path: &Path,
        model_size: ModelSize,
        language: &LanguageHint,
    ) -> Result<TranscriptionResult> {
        (**self).transcribe(audio_path, model_size, language)
    }
}

impl<T: Transcriber + ?Sized> Transcriber for Box<T> {
    fn transcribe(
        &mut self,
        audio_path: &Path,
        model_size: ModelSize,
        language: &LanguageHint,
    ) -> Result<TranscriptionResult> {
        (**self).transcribe(audio_path, model_size, language)
    }
}

/// Run `transcriber`, folding every failure except an interrupt into `TranscriptionFailed`.
pub fn run_transcription<T: Transcriber + ?Sized>(
    transcriber: &mut T,
    audio_path: &Path,
    model_size: ModelSize,
    language: &LanguageHint,
) -> Result<TranscriptionResult> {
    info!(model = %model_size, language = %language, audio = %audio_path.display(), "transcribing audio");

    let result = transcriber
        .transcribe(audio_path, model_size, language)
        .map_err(|err| match err {
            Error::TranscriptionFailed { .. } | Error::Interrupted => err,
            other => Error::transcription(other),
        })?;

    match language {
        LanguageHint::Auto => {
            info!(language = result.language().unwrap_or("unknown"), "detected language")
        }
        LanguageHint::Explicit(lang) => info!(language = %lang, "using language"),
    }
    Ok(result)
}
