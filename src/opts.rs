use std::path::PathBuf;

use crate::frames::FrameExtractionRequest;
use crate::transcriber::{LanguageHint, ModelSize};

/// Default number of tiles per contact sheet row.
pub const DEFAULT_CONTACT_SHEET_COLUMNS: u32 = 4;

/// Where to find the external engine binaries.
///
/// This is library-level configuration, not CLI flags directly. Frontends map their input
/// into it so nothing in the crate depends on ambient state such as the working directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineOpts {
    /// Program used for extraction, composition and audio transcoding.
    pub ffmpeg: String,

    /// Program used for metadata probing.
    pub ffprobe: String,
}

impl Default for EngineOpts {
    fn default() -> Self {
        Self {
            ffmpeg: "ffmpeg".to_owned(),
            ffprobe: "ffprobe".to_owned(),
        }
    }
}

/// Options for one frame-extraction run.
#[derive(Debug, Clone)]
pub struct ExtractOpts {
    pub request: FrameExtractionRequest,

    /// Whether to tile the extracted frames into a contact sheet afterwards.
    pub contact_sheet: bool,

    /// Contact sheet grid width. Rows follow from the frame count.
    pub contact_sheet_columns: u32,
}

impl ExtractOpts {
    pub fn new(request: FrameExtractionRequest) -> Self {
        Self {
            request,
            contact_sheet: false,
            contact_sheet_columns: DEFAULT_CONTACT_SHEET_COLUMNS,
        }
    }
}

/// Options for one transcription run.
#[derive(Debug, Clone)]
pub struct TranscribeOpts {
    pub video_path: PathBuf,

    /// Receives the intermediate audio file and all transcript outputs.
    pub output_dir: PathBuf,

    pub model_size: ModelSize,

    /// `Auto` lets the model detect the spoken language.
    pub language: LanguageHint,

    /// Remove the intermediate WAV once the run is over. The audio is kept otherwise.
    pub delete_audio_after_run: bool,
}
