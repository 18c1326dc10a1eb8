use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::process::ProcessRunner;
use crate::{Error, Result, video_stem};

/// Sample rate the speech model expects.
pub const TARGET_SAMPLE_RATE: u32 = 16_000;

/// Channel count the speech model expects.
pub const TARGET_CHANNELS: u16 = 1;

/// PCM codec handed to the engine: signed 16-bit little endian.
pub const TARGET_CODEC: &str = "pcm_s16le";

/// `{output_dir}/{video-stem}_audio.wav`.
pub fn audio_path_for(video_path: &Path, output_dir: &Path) -> PathBuf {
    output_dir.join(format!("{}_audio.wav", video_stem(video_path)))
}

pub fn build_audio_args(video_path: &Path, audio_path: &Path) -> Vec<String> {
    let mut args = crate::process::args(["-hide_banner", "-loglevel", "error", "-i"]);
    args.push(video_path.to_string_lossy().into_owned());
    args.extend([
        "-vn".to_owned(),
        "-ar".to_owned(),
        TARGET_SAMPLE_RATE.to_string(),
        "-ac".to_owned(),
        TARGET_CHANNELS.to_string(),
        "-c:a".to_owned(),
        TARGET_CODEC.to_owned(),
        "-y".to_owned(),
    ]);
    args.push(audio_path.to_string_lossy().into_owned());
    args
}

/// Transcode the video's audio track into a 16 kHz mono 16-bit WAV, replacing any previous one.
pub fn extract(
    runner: &impl ProcessRunner,
    ffmpeg: &str,
    video_path: &Path,
    output_dir: &Path,
) -> Result<PathBuf> {
    fs::create_dir_all(output_dir)?;
    let audio_path = audio_path_for(video_path, output_dir);

    info!(video = %video_path.display(), "extracting audio");
    let out = runner.run(ffmpeg, &build_audio_args(video_path, &audio_path))?;
    if !out.success() {
        return Err(Error::ExtractionFailed { stderr: out.stderr });
    }

    info!(audio = %audio_path.display(), "audio extracted");
    Ok(audio_path)
}
