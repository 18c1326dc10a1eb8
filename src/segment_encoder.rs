use crate::Result;
use crate::segments::TranscriptSegment;

/// Streams transcript segments into some serialized form.
///
/// Implementations write through to an underlying `io::Write`. `close` must be idempotent, and
/// writes after `close` are rejected.
pub trait SegmentEncoder {
    fn write_segment(&mut self, seg: &TranscriptSegment) -> Result<()>;
    fn close(&mut self) -> Result<()>;
}

/// Run every segment through `encoder` and close it.
pub fn encode_all<E: SegmentEncoder>(encoder: &mut E, segments: &[TranscriptSegment]) -> Result<()> {
    for seg in segments {
        encoder.write_segment(seg)?;
    }
    encoder.close()
}
