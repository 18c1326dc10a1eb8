use std::fmt;

/// The persisted outputs of a transcription run.
///
/// Each variant maps to one file, `{stem}.{extension}`, and its tag is the key used in
/// [`crate::pipeline::PipelineOutcome::produced_files`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum OutputFormat {
    /// Trimmed full transcript as plain text.
    Text,

    /// WebVTT subtitles.
    Vtt,

    /// SubRip subtitles.
    Srt,

    /// The full structured result, pretty-printed.
    Json,
}

impl OutputFormat {
    /// Every format, in the order they are written.
    pub const ALL: [OutputFormat; 4] = [Self::Text, Self::Vtt, Self::Srt, Self::Json];

    pub fn extension(self) -> &'static str {
        match self {
            Self::Text => "txt",
            Self::Vtt => "vtt",
            Self::Srt => "srt",
            Self::Json => "json",
        }
    }

    pub fn tag(self) -> &'static str {
        self.extension()
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}
