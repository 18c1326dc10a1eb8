//! `framescribe`: frames, contact sheets and transcripts from video files.
//!
//! This crate provides:
//! - Frame sampling at a fixed rate, plus an optional contact sheet of the results
//! - Audio extraction and Whisper transcription
//! - Subtitle encoders (WebVTT, SubRip) and transcript persistence
//! - A pipeline runner that sequences the steps and reports a single outcome
//!
//! All media I/O goes through an external engine (ffmpeg/ffprobe) behind [`process::ProcessRunner`];
//! speech recognition goes through [`transcriber::Transcriber`]. Both are traits so the
//! orchestration can be exercised without either installed.

use std::path::Path;

mod error;
pub use error::{Error, ErrorKind, Result};

// High-level API (most consumers should start here).
pub mod opts;
pub mod pipeline;

// External engine plumbing.
pub mod interrupt;
pub mod process;
pub mod probe;

// Extraction mode.
pub mod contact_sheet;
pub mod frames;

// Transcription mode.
pub mod audio;
pub mod backends;
pub mod segments;
pub mod transcriber;
pub mod wav;

// Output selection and encoders.
pub mod output_type;
pub mod segment_encoder;
pub mod srt_encoder;
pub mod timestamp;
pub mod transcript_writer;
pub mod vtt_encoder;

// Logging configuration for binaries.
#[cfg(feature = "logging")]
pub mod logging;

pub use backends::whisper::WhisperTranscriber;
pub use interrupt::Interrupt;
pub use opts::{EngineOpts, ExtractOpts, TranscribeOpts};
pub use pipeline::{PipelineOutcome, PipelineRunner};
pub use process::{ProcessOutput, ProcessRunner, SystemProcessRunner};
pub use transcriber::{LanguageHint, ModelSize, Transcriber};

/// File stem used to name every artifact derived from `path`.
pub(crate) fn video_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "video".to_owned())
}
