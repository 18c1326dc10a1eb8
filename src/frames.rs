//! Constant-rate frame sampling.
//!
//! One ffmpeg invocation writes `{video}_{prefix}_%04d.{ext}` into the output directory. The
//! engine's own report is not trusted for the result: once it exits cleanly we list the
//! directory and return whatever frames actually landed on disk.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::Serialize;
use tracing::{debug, info};

use crate::process::ProcessRunner;
use crate::{Error, Result, video_stem};

/// Image formats the sampler can write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    #[default]
    Jpg,
    Jpeg,
    Png,
    Bmp,
    Tiff,
    Webp,
}

impl ImageFormat {
    pub fn extension(self) -> &'static str {
        match self {
            Self::Jpg => "jpg",
            Self::Jpeg => "jpeg",
            Self::Png => "png",
            Self::Bmp => "bmp",
            Self::Tiff => "tiff",
            Self::Webp => "webp",
        }
    }
}

impl fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ImageFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "jpg" => Ok(Self::Jpg),
            "jpeg" => Ok(Self::Jpeg),
            "png" => Ok(Self::Png),
            "bmp" => Ok(Self::Bmp),
            "tiff" => Ok(Self::Tiff),
            "webp" => Ok(Self::Webp),
            other => Err(Error::invalid(format!(
                "unsupported image format '{other}' (expected jpg, jpeg, png, bmp, tiff or webp)"
            ))),
        }
    }
}

/// What to sample, how often, and where the images go.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameExtractionRequest {
    pub source_path: PathBuf,

    /// Frames per second to keep. Must be positive.
    pub target_rate: f64,

    /// Created (recursively) before anything is written.
    pub output_dir: PathBuf,

    pub image_format: ImageFormat,

    /// JPEG: passed through as `-q:v` (1 best .. 31 worst).
    /// PNG: mapped to a compression level via [`png_compression_level`].
    /// Ignored by the other formats.
    pub quality_level: u32,

    pub filename_prefix: String,
}

impl FrameExtractionRequest {
    /// A request with the defaults: 1 fps, JPEG at quality 2, prefix `frame`.
    pub fn new(source_path: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            source_path: source_path.into(),
            target_rate: 1.0,
            output_dir: output_dir.into(),
            image_format: ImageFormat::Jpg,
            quality_level: 2,
            filename_prefix: "frame".to_owned(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.target_rate.is_finite() && self.target_rate > 0.0) {
            return Err(Error::invalid(format!(
                "frame rate must be greater than 0, got {}",
                self.target_rate
            )));
        }
        if !self.source_path.is_file() {
            return Err(Error::invalid(format!(
                "video file not found: {}",
                self.source_path.display()
            )));
        }
        Ok(())
    }

    /// Shared filename stem of every frame: `{video}_{prefix}_`.
    pub fn frame_name_prefix(&self) -> String {
        format!("{}_{}_", video_stem(&self.source_path), self.filename_prefix)
    }

    /// The printf-style output pattern handed to the engine. Literal `%` is doubled.
    pub fn output_pattern(&self) -> PathBuf {
        let dir = self.output_dir.to_string_lossy().replace('%', "%%");
        PathBuf::from(dir).join(format!(
            "{}%04d.{}",
            self.frame_name_prefix().replace('%', "%%"),
            self.image_format.extension()
        ))
    }
}

/// One image written by the sampler.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct ExtractedFrame {
    pub path: PathBuf,
    /// 1-based, taken from the zero-padded index in the filename.
    pub sequence_index: u32,
}

/// PNG compression level for a quality value, clamped to the encoder's 0..=9 range.
pub fn png_compression_level(quality_level: u32) -> u32 {
    quality_level.saturating_mul(3).min(9)
}

/// Format-specific quality arguments.
pub fn quality_args(format: ImageFormat, quality_level: u32) -> Vec<String> {
    match format {
        ImageFormat::Jpg | ImageFormat::Jpeg => {
            vec!["-q:v".to_owned(), quality_level.to_string()]
        }
        ImageFormat::Png => vec![
            "-compression_level".to_owned(),
            png_compression_level(quality_level).to_string(),
        ],
        ImageFormat::Bmp | ImageFormat::Tiff | ImageFormat::Webp => Vec::new(),
    }
}

/// Full ffmpeg argument vector for a request.
pub fn build_extract_args(req: &FrameExtractionRequest) -> Vec<String> {
    let mut args = crate::process::args([
        "-hide_banner",
        "-loglevel",
        "error",
        "-i",
    ]);
    args.push(req.source_path.to_string_lossy().into_owned());
    args.push("-vf".to_owned());
    args.push(format!("fps={}", req.target_rate));
    // Overwrite frames left by an earlier run.
    args.push("-y".to_owned());
    args.extend(quality_args(req.image_format, req.quality_level));
    args.push(req.output_pattern().to_string_lossy().into_owned());
    args
}

/// Sample frames from the request's video and return the frames found on disk afterwards.
pub fn extract(
    runner: &impl ProcessRunner,
    ffmpeg: &str,
    req: &FrameExtractionRequest,
) -> Result<Vec<ExtractedFrame>> {
    req.validate()?;
    fs::create_dir_all(&req.output_dir)?;

    info!(
        video = %req.source_path.display(),
        rate = req.target_rate,
        format = %req.image_format,
        output_dir = %req.output_dir.display(),
        "extracting frames"
    );

    let out = runner.run(ffmpeg, &build_extract_args(req))?;
    if !out.success() {
        return Err(Error::ExtractionFailed { stderr: out.stderr });
    }

    let frames = list_frames(req)?;
    info!(count = frames.len(), "frames extracted");
    Ok(frames)
}

/// Enumerate frames belonging to `req` in the output directory, sorted by filename.
pub fn list_frames(req: &FrameExtractionRequest) -> Result<Vec<ExtractedFrame>> {
    let prefix = req.frame_name_prefix();
    let suffix = format!(".{}", req.image_format.extension());

    let mut frames = Vec::new();
    for entry in fs::read_dir(&req.output_dir)? {
        let entry = entry?;
        let name = entry.file_name();
        let Some(name) = name.to_str() else {
            continue;
        };

        if let Some(sequence_index) = parse_sequence_index(name, &prefix, &suffix) {
            frames.push(ExtractedFrame {
                path: entry.path(),
                sequence_index,
            });
        }
    }

    frames.sort_by(|a, b| a.path.file_name().cmp(&b.path.file_name()));
    debug!(count = frames.len(), dir = %req.output_dir.display(), "listed frames");
    Ok(frames)
}

fn parse_sequence_index(name: &str, prefix: &str, suffix: &str) -> Option<u32> {
    let digits = name.strip_prefix(prefix)?.strip_suffix(suffix)?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

/// Directory the frames were written to.
pub(crate) fn frames_dir(frames: &[ExtractedFrame]) -> Option<&Path> {
    frames.first().and_then(|f| f.path.parent())
}
