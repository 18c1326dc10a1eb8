use std::io::Write;

use crate::segment_encoder::{SegmentEncoder, encode_all};
use crate::segments::TranscriptSegment;
use crate::timestamp::format_vtt;
use crate::{Error, Result};

/// A `SegmentEncoder` that writes segments in WebVTT format.
///
/// The `WEBVTT` header is written lazily on the first segment, or on `close` when no segment
/// was written, so every closed encoder has produced a valid (possibly empty) file.
pub struct VttEncoder<W: Write> {
    /// The underlying writer we stream VTT into.
    w: W,

    /// Whether we've written the `WEBVTT` header.
    started: bool,

    /// Whether the encoder has been closed.
    closed: bool,
}

impl<W: Write> VttEncoder<W> {
    /// Create a new VTT encoder that writes to the provided writer.
    pub fn new(w: W) -> Self {
        Self {
            w,
            started: false,
            closed: false,
        }
    }

    fn start_if_needed(&mut self) -> Result<()> {
        if !self.started {
            // WebVTT files begin with a mandatory header line followed by a blank line.
            self.w.write_all(b"WEBVTT\n\n")?;
            self.started = true;
        }
        Ok(())
    }
}

impl<W: Write> SegmentEncoder for VttEncoder<W> {
    /// Write a single cue in WebVTT format.
    fn write_segment(&mut self, seg: &TranscriptSegment) -> Result<()> {
        if self.closed {
            return Err(Error::invalid("cannot write segment: encoder is already closed"));
        }

        self.start_if_needed()?;

        let start = format_vtt(seg.start_seconds);
        let end = format_vtt(seg.end_seconds);

        writeln!(&mut self.w, "{start} --> {end}")?;
        writeln!(&mut self.w, "{}", seg.text.trim())?;

        // Blank line separates cues.
        writeln!(&mut self.w)?;

        Ok(())
    }

    /// Flush the underlying writer. This is idempotent.
    fn close(&mut self) -> Result<()> {
        if self.closed {
            return Ok(());
        }

        self.start_if_needed()?;
        self.w.flush()?;
        self.closed = true;

        Ok(())
    }
}

/// Render `segments` as a complete WebVTT document.
pub fn to_vtt(segments: &[TranscriptSegment]) -> String {
    let mut out = Vec::new();
    // Writing into a Vec cannot fail.
    let _ = encode_all(&mut VttEncoder::new(&mut out), segments);
    String::from_utf8_lossy(&out).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seg(start: f64, end: f64, text: &str) -> TranscriptSegment {
        TranscriptSegment::new(start, end, text)
    }

    #[test]
    fn vtt_close_without_segments_emits_header_only() -> anyhow::Result<()> {
        let mut out = Vec::new();
        let mut enc = VttEncoder::new(&mut out);
        enc.close()?;
        assert_eq!(std::str::from_utf8(&out)?, "WEBVTT\n\n");
        Ok(())
    }

    #[test]
    fn vtt_writes_header_once_and_formats_cues() -> anyhow::Result<()> {
        let mut out = Vec::new();
        let mut enc = VttEncoder::new(&mut out);

        enc.write_segment(&seg(0.0, 1.2345, "  hello "))?;
        enc.write_segment(&seg(61.2, 62.0, "world"))?;
        enc.close()?;

        let s = std::str::from_utf8(&out)?;
        assert!(s.starts_with("WEBVTT\n\n"));
        assert!(s.contains("00:00:00.000 --> 00:00:01.234\nhello\n\n"));
        assert!(s.contains("00:01:01.200 --> 00:01:02.000\nworld\n\n"));
        assert_eq!(s.matches("WEBVTT").count(), 1);
        Ok(())
    }

    #[test]
    fn to_vtt_matches_expected_document() {
        let doc = to_vtt(&[seg(0.0, 1.5, "Hi"), seg(1.5, 3.25, "there")]);
        assert_eq!(
            doc,
            "WEBVTT\n\n\
             00:00:00.000 --> 00:00:01.500\nHi\n\n\
             00:00:01.500 --> 00:00:03.250\nthere\n\n"
        );
    }

    #[test]
    fn to_vtt_is_idempotent() {
        let segments = vec![seg(0.0, 1.5, "Hi"), seg(1.5, 3.25, "there")];
        assert_eq!(to_vtt(&segments), to_vtt(&segments));
    }

    #[test]
    fn vtt_write_after_close_errors() -> anyhow::Result<()> {
        let mut out = Vec::new();
        let mut enc = VttEncoder::new(&mut out);
        enc.close()?;
        let err = enc.write_segment(&seg(0.0, 1.0, "nope")).unwrap_err();
        assert!(err.to_string().contains("already closed"));
        Ok(())
    }
}
