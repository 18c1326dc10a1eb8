//! Container metadata via `ffprobe`.
//!
//! Probing is advisory: the numbers feed user-facing estimates only, and the pipeline carries
//! on with a zeroed [`MediaProbe`] when it fails.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::process::ProcessRunner;
use crate::{Error, Result};

/// Basic facts about a media file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct MediaProbe {
    pub duration_seconds: f64,
    pub width_px: u32,
    pub height_px: u32,
    /// `ceil(duration × target_rate)`.
    pub estimated_frame_count: u64,
}

#[derive(Deserialize)]
struct FfprobeOutput {
    format: Option<FormatInfo>,
    streams: Option<Vec<StreamInfo>>,
}

#[derive(Deserialize)]
struct FormatInfo {
    duration: Option<String>,
}

#[derive(Deserialize)]
struct StreamInfo {
    codec_type: Option<String>,
    width: Option<u32>,
    height: Option<u32>,
    duration: Option<String>,
}

/// Query duration and dimensions of `path` and estimate how many frames `target_rate` yields.
pub fn probe(
    runner: &impl ProcessRunner,
    ffprobe: &str,
    path: &Path,
    target_rate: f64,
) -> Result<MediaProbe> {
    let args = vec![
        "-v".to_owned(),
        "quiet".to_owned(),
        "-print_format".to_owned(),
        "json".to_owned(),
        "-show_format".to_owned(),
        "-show_streams".to_owned(),
        path.to_string_lossy().into_owned(),
    ];

    let out = runner.run(ffprobe, &args)?;
    if !out.success() {
        return Err(Error::ProbeFailed(format!(
            "ffprobe exited with {:?}: {}",
            out.exit_code, out.stderr
        )));
    }

    let probe = parse_probe_output(&out.stdout, target_rate)?;
    debug!(?probe, path = %path.display(), "probed media");
    Ok(probe)
}

fn parse_probe_output(stdout: &str, target_rate: f64) -> Result<MediaProbe> {
    let parsed: FfprobeOutput =
        serde_json::from_str(stdout).map_err(|err| Error::MalformedMetadata(err.to_string()))?;

    let video = parsed
        .streams
        .as_deref()
        .unwrap_or_default()
        .iter()
        .find(|s| s.codec_type.as_deref() == Some("video"))
        .ok_or_else(|| Error::ProbeFailed("no video stream found in file".to_owned()))?;

    // Prefer the container duration, then the stream's own.
    let duration_seconds = match parsed
        .format
        .as_ref()
        .and_then(|f| f.duration.as_deref())
        .or(video.duration.as_deref())
    {
        Some(raw) => raw
            .trim()
            .parse::<f64>()
            .map_err(|err| Error::MalformedMetadata(format!("duration {raw:?}: {err}")))?,
        None => 0.0,
    };
    let duration_seconds = if duration_seconds.is_finite() {
        duration_seconds.max(0.0)
    } else {
        0.0
    };

    Ok(MediaProbe {
        duration_seconds,
        width_px: video.width.unwrap_or(0),
        height_px: video.height.unwrap_or(0),
        estimated_frame_count: estimate_frame_count(duration_seconds, target_rate),
    })
}

/// Frames a constant-rate sampler yields over `duration_seconds`.
pub fn estimate_frame_count(duration_seconds: f64, target_rate: f64) -> u64 {
    let estimate = (duration_seconds * target_rate).ceil();
    if estimate.is_finite() && estimate > 0.0 {
        estimate as u64
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;
    use crate::process::ProcessOutput;

    const SAMPLE: &str = r#"{
        "streams": [
            { "codec_type": "audio", "duration": "10.2" },
            { "codec_type": "video", "width": 1920, "height": 1080, "duration": "9.9" }
        ],
        "format": { "duration": "10.000000" }
    }"#;

    struct Canned(ProcessOutput);

    impl ProcessRunner for Canned {
        fn run(&self, _program: &str, _args: &[String]) -> Result<ProcessOutput> {
            Ok(self.0.clone())
        }
    }

    #[test]
    fn parses_duration_dimensions_and_estimate() -> anyhow::Result<()> {
        let probe = parse_probe_output(SAMPLE, 2.0)?;
        assert_eq!(probe.duration_seconds, 10.0);
        assert_eq!((probe.width_px, probe.height_px), (1920, 1080));
        assert_eq!(probe.estimated_frame_count, 20);
        Ok(())
    }

    #[test]
    fn falls_back_to_stream_duration() -> anyhow::Result<()> {
        let json = r#"{ "streams": [ { "codec_type": "video", "width": 640, "height": 360, "duration": "3.2" } ] }"#;
        let probe = parse_probe_output(json, 1.0)?;
        assert_eq!(probe.duration_seconds, 3.2);
        assert_eq!(probe.estimated_frame_count, 4);
        Ok(())
    }

    #[test]
    fn missing_video_stream_is_probe_failure() {
        let json = r#"{ "streams": [ { "codec_type": "audio" } ], "format": { "duration": "5" } }"#;
        let err = parse_probe_output(json, 1.0).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ProbeFailed);
    }

    #[test]
    fn garbage_is_malformed_metadata() {
        let err = parse_probe_output("not json", 1.0).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedMetadata);
    }

    #[test]
    fn non_zero_exit_is_probe_failure() {
        let runner = Canned(ProcessOutput::with_code(1, "", "Invalid data"));
        let err = probe(&runner, "ffprobe", Path::new("x.mp4"), 1.0).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ProbeFailed);
    }

    #[test]
    fn estimate_never_goes_negative() {
        assert_eq!(estimate_frame_count(0.0, 2.0), 0);
        assert_eq!(estimate_frame_count(10.0, 2.0), 20);
        assert_eq!(estimate_frame_count(10.1, 2.0), 21);
        assert_eq!(estimate_frame_count(f64::NAN, 2.0), 0);
    }
}
