//! Tiling extracted frames into a single contact sheet image.
//!
//! The sheet is a derived artifact: it can always be regenerated from the frames, so a failure
//! here is reported but never fails a run.

use std::path::PathBuf;

use tracing::{debug, info};

use crate::frames::{ExtractedFrame, FrameExtractionRequest, frames_dir};
use crate::process::ProcessRunner;
use crate::{Error, Result, video_stem};

/// Outer border around the grid, in pixels.
pub const TILE_MARGIN_PX: u32 = 10;

/// Gap between neighbouring tiles, in pixels.
pub const TILE_PADDING_PX: u32 = 5;

/// Frames to tile and the grid they go into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactSheetSpec {
    /// Sorted by filename, which is also temporal order.
    pub frames: Vec<ExtractedFrame>,
    pub columns: u32,
}

impl ContactSheetSpec {
    /// Returns `None` when fewer than two frames are available; a one-tile sheet is pointless.
    ///
    /// `columns` below 1 is treated as 1.
    pub fn new(mut frames: Vec<ExtractedFrame>, columns: u32) -> Option<Self> {
        if frames.len() < 2 {
            return None;
        }
        frames.sort_by(|a, b| a.path.file_name().cmp(&b.path.file_name()));
        Some(Self {
            frames,
            columns: columns.max(1),
        })
    }

    pub fn rows(&self) -> u32 {
        grid_rows(self.frames.len(), self.columns)
    }
}

/// Rows needed to fit `count` tiles into `columns` columns.
pub fn grid_rows(count: usize, columns: u32) -> u32 {
    let columns = columns.max(1) as usize;
    count.div_ceil(columns) as u32
}

/// `contact_sheet_{video}.{ext}` next to the frames.
pub fn contact_sheet_path(req: &FrameExtractionRequest) -> PathBuf {
    req.output_dir.join(format!(
        "contact_sheet_{}.{}",
        video_stem(&req.source_path),
        req.image_format.extension()
    ))
}

/// Backslash-escape everything ffmpeg's `glob` input treats as a pattern (braces included).
pub fn escape_glob(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        if matches!(c, '\\' | '*' | '?' | '[' | ']' | '{' | '}') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Full ffmpeg argument vector for a contact sheet.
pub fn build_compose_args(
    spec: &ContactSheetSpec,
    req: &FrameExtractionRequest,
    output: &std::path::Path,
) -> Vec<String> {
    let dir = frames_dir(&spec.frames).unwrap_or(&req.output_dir);
    let input = format!(
        "{}/{}*.{}",
        escape_glob(&dir.to_string_lossy()),
        escape_glob(&req.frame_name_prefix()),
        req.image_format.extension()
    );

    let mut args = crate::process::args([
        "-hide_banner",
        "-loglevel",
        "error",
        "-y",
        "-pattern_type",
        "glob",
        "-i",
    ]);
    args.push(input);
    args.push("-filter_complex".to_owned());
    args.push(format!(
        "tile={}x{}:margin={TILE_MARGIN_PX}:padding={TILE_PADDING_PX}",
        spec.columns,
        spec.rows()
    ));
    args.push("-frames:v".to_owned());
    args.push("1".to_owned());
    args.push(output.to_string_lossy().into_owned());
    args
}

/// Tile `frames` into a contact sheet.
///
/// `Ok(None)` means there was nothing worth composing. Engine failures come back as
/// [`Error::CompositionFailed`]; callers are expected to downgrade them to a warning.
pub fn compose(
    runner: &impl ProcessRunner,
    ffmpeg: &str,
    req: &FrameExtractionRequest,
    frames: &[ExtractedFrame],
    columns: u32,
) -> Result<Option<PathBuf>> {
    let Some(spec) = ContactSheetSpec::new(frames.to_vec(), columns) else {
        debug!(count = frames.len(), "need at least 2 frames for a contact sheet");
        return Ok(None);
    };

    let output = contact_sheet_path(req);
    info!(
        frames = spec.frames.len(),
        columns = spec.columns,
        rows = spec.rows(),
        "creating contact sheet"
    );

    let out = runner.run(ffmpeg, &build_compose_args(&spec, req, &output))?;
    if !out.success() {
        return Err(Error::CompositionFailed { stderr: out.stderr });
    }

    info!(path = %output.display(), "contact sheet created");
    Ok(Some(output))
}
