use anyhow::{Context, Result};
use whisper_rs::{FullParams, SamplingStrategy, WhisperContext, WhisperSegment, WhisperState};

use crate::segments::TranscriptSegment;
use crate::transcriber::LanguageHint;

/// whisper.cpp's language value for "detect it".
const AUTO_LANGUAGE: &str = "auto";

/// whisper.cpp reports segment timestamps in centiseconds; negative means unknown.
fn centiseconds_to_seconds(value: i64) -> f64 {
    if value < 0 { 0.0 } else { value as f64 / 100.0 }
}

pub(super) fn to_segment(segment: &WhisperSegment) -> Result<TranscriptSegment> {
    let text = segment
        .to_str()
        .context("failed to get segment text")?
        .to_owned();

    let start_seconds = centiseconds_to_seconds(segment.start_timestamp());
    // Guard against end < start from rounding inside whisper.cpp.
    let end_seconds = centiseconds_to_seconds(segment.end_timestamp()).max(start_seconds);

    Ok(TranscriptSegment {
        start_seconds,
        end_seconds,
        text,
    })
}

pub(super) fn collect_segments(state: &WhisperState) -> Result<Vec<TranscriptSegment>> {
    state.as_iter().map(|seg| to_segment(&seg)).collect()
}

/// Language whisper settled on for the last `full()` run, as an ISO 639-1 code.
pub(super) fn detected_language(state: &WhisperState) -> Option<String> {
    let id = state.full_lang_id_from_state();
    if id < 0 {
        return None;
    }
    whisper_rs::get_lang_str(id).map(str::to_owned)
}

fn build_full_params(language: &LanguageHint) -> FullParams<'_, '_> {
    let mut params = FullParams::new(SamplingStrategy::BeamSearch {
        beam_size: 5,
        patience: 1.0,
    });

    params.set_n_threads(num_cpus::get() as i32);
    params.set_translate(false);
    params.set_language(Some(language.explicit().unwrap_or(AUTO_LANGUAGE)));
    params.set_no_context(true);
    params.set_single_segment(false);

    params.set_print_progress(false);
    params.set_print_special(false);
    params.set_print_realtime(false);
    params.set_print_timestamps(false);

    params
}

pub(super) fn run_whisper_full(
    ctx: &WhisperContext,
    language: &LanguageHint,
    samples: &[f32],
) -> Result<WhisperState> {
    let params = build_full_params(language);

    let mut state = ctx
        .create_state()
        .context("failed to create whisper state")?;

    state
        .full(params, samples)
        .with_context(|| format!("whisper inference failed (language: {language})"))?;

    Ok(state)
}
