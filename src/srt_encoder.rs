use std::io::Write;

use crate::segment_encoder::{SegmentEncoder, encode_all};
use crate::segments::TranscriptSegment;
use crate::timestamp::format_srt;
use crate::{Error, Result};

/// A `SegmentEncoder` that writes segments in SubRip format.
///
/// Cues are numbered from 1 in write order.
pub struct SrtEncoder<W: Write> {
    w: W,

    /// Index of the last cue written.
    cue: usize,

    closed: bool,
}

impl<W: Write> SrtEncoder<W> {
    pub fn new(w: W) -> Self {
        Self {
            w,
            cue: 0,
            closed: false,
        }
    }
}

impl<W: Write> SegmentEncoder for SrtEncoder<W> {
    fn write_segment(&mut self, seg: &TranscriptSegment) -> Result<()> {
        if self.closed {
            return Err(Error::invalid("cannot write segment: encoder is already closed"));
        }

        self.cue += 1;
        let start = format_srt(seg.start_seconds);
        let end = format_srt(seg.end_seconds);

        writeln!(&mut self.w, "{}", self.cue)?;
        writeln!(&mut self.w, "{start} --> {end}")?;
        writeln!(&mut self.w, "{}", seg.text.trim())?;
        writeln!(&mut self.w)?;

        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        if self.closed {
            return Ok(());
        }

        self.w.flush()?;
        self.closed = true;
        Ok(())
    }
}

/// Render `segments` as a complete SubRip document.
pub fn to_srt(segments: &[TranscriptSegment]) -> String {
    let mut out = Vec::new();
    // Writing into a Vec cannot fail.
    let _ = encode_all(&mut SrtEncoder::new(&mut out), segments);
    String::from_utf8_lossy(&out).into_owned()
}
