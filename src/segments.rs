use serde::Serialize;

use crate::{Error, Result};

/// A contiguous span of recognised speech.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TranscriptSegment {
    #[serde(rename = "start")]
    pub start_seconds: f64,
    #[serde(rename = "end")]
    pub end_seconds: f64,
    pub text: String,
}

impl TranscriptSegment {
    pub fn new(start_seconds: f64, end_seconds: f64, text: impl Into<String>) -> Self {
        Self {
            start_seconds,
            end_seconds,
            text: text.into(),
        }
    }
}

/// Everything the speech model produced for one audio file.
///
/// Validated once on construction and immutable afterwards; downstream code only serializes it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TranscriptionResult {
    text: String,
    language: Option<String>,
    segments: Vec<TranscriptSegment>,
}

impl TranscriptionResult {
    /// Build a result, rejecting segments with negative, non-finite or inverted times.
    ///
    /// Segment order is kept as given; overlaps are not checked.
    pub fn new(
        text: impl Into<String>,
        language: Option<String>,
        segments: Vec<TranscriptSegment>,
    ) -> Result<Self> {
        for (i, seg) in segments.iter().enumerate() {
            let valid = seg.start_seconds.is_finite()
                && seg.end_seconds.is_finite()
                && seg.start_seconds >= 0.0
                && seg.end_seconds >= seg.start_seconds;
            if !valid {
                return Err(Error::transcription(format!(
                    "segment {i} has invalid timing {}..{}",
                    seg.start_seconds, seg.end_seconds
                )));
            }
        }

        Ok(Self {
            text: text.into(),
            language,
            segments,
        })
    }

    /// Build a result whose full text is the concatenation of the segment texts.
    pub fn from_segments(language: Option<String>, segments: Vec<TranscriptSegment>) -> Result<Self> {
        let text: String = segments.iter().map(|s| s.text.as_str()).collect();
        Self::new(text, language, segments)
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Language reported by the model (detected) or the hint it was run with.
    pub fn language(&self) -> Option<&str> {
        self.language.as_deref()
    }

    pub fn segments(&self) -> &[TranscriptSegment] {
        &self.segments
    }
}
