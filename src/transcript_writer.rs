//! Persisting a [`TranscriptionResult`] as text, subtitles and JSON.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::info;

use crate::Result;
use crate::output_type::OutputFormat;
use crate::segment_encoder::encode_all;
use crate::segments::TranscriptionResult;
use crate::srt_encoder::SrtEncoder;
use crate::vtt_encoder::VttEncoder;

/// `{output_dir}/{stem}.{ext}`.
pub fn output_path(output_dir: &Path, stem: &str, format: OutputFormat) -> PathBuf {
    output_dir.join(format!("{stem}.{}", format.extension()))
}

/// Write one output format to `w`.
pub fn write_format<W: Write>(result: &TranscriptionResult, format: OutputFormat, mut w: W) -> Result<()> {
    match format {
        OutputFormat::Text => {
            w.write_all(result.text().trim().as_bytes())?;
            w.flush()?;
            Ok(())
        }
        OutputFormat::Vtt => encode_all(&mut VttEncoder::new(w), result.segments()),
        OutputFormat::Srt => encode_all(&mut SrtEncoder::new(w), result.segments()),
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut w, result)?;
            w.flush()?;
            Ok(())
        }
    }
}

/// Write every [`OutputFormat`] next to each other and return the paths by format tag.
///
/// Stops at the first failure; files written before it are left in place.
pub fn write_all(
    result: &TranscriptionResult,
    output_dir: &Path,
    stem: &str,
) -> Result<BTreeMap<String, PathBuf>> {
    let mut written = BTreeMap::new();
    for format in OutputFormat::ALL {
        let path = output_path(output_dir, stem, format);
        let file = BufWriter::new(File::create(&path)?);
        write_format(result, format, file)?;

        info!(format = %format, path = %path.display(), "saved transcript output");
        written.insert(format.tag().to_owned(), path);
    }
    Ok(written)
}

/// Shorten `text` to `max_chars` characters, appending `...` when something was cut.
pub fn preview(text: &str, max_chars: usize) -> String {
    let text = text.trim();
    let mut chars = text.char_indices();
    match chars.nth(max_chars) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_owned(),
    }
}
