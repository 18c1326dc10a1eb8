#![allow(dead_code)]

use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};

use framescribe::segments::{TranscriptSegment, TranscriptionResult};
use framescribe::{
    Error, Interrupt, LanguageHint, ModelSize, ProcessOutput, ProcessRunner, Result, Transcriber,
};

/// Stand-in for ffmpeg/ffprobe that writes the files a real engine would and records every call.
pub struct FakeEngine {
    pub installed: bool,
    pub probe_stdout: String,
    pub frames_to_write: u32,
    pub fail_extraction: bool,
    pub fail_composition: bool,
    /// Audio transcode writes the WAV and then exits non-zero.
    pub partial_audio: bool,
    /// Triggered once the audio transcode has written its WAV.
    pub interrupt_after_audio: Option<Interrupt>,
    pub calls: RefCell<Vec<(String, Vec<String>)>>,
}

impl FakeEngine {
    pub fn new() -> Self {
        Self {
            installed: true,
            probe_stdout: probe_json(10.0, 1920, 1080),
            frames_to_write: 3,
            fail_extraction: false,
            fail_composition: false,
            partial_audio: false,
            interrupt_after_audio: None,
            calls: RefCell::new(Vec::new()),
        }
    }

    pub fn missing() -> Self {
        Self {
            installed: false,
            ..Self::new()
        }
    }

    /// Argument vectors of every call whose arguments contain `needle`.
    pub fn calls_with(&self, needle: &str) -> Vec<Vec<String>> {
        self.calls
            .borrow()
            .iter()
            .filter(|(_, args)| args.iter().any(|a| a.contains(needle)))
            .map(|(_, args)| args.clone())
            .collect()
    }
}

impl ProcessRunner for FakeEngine {
    fn run(&self, program: &str, args: &[String]) -> Result<ProcessOutput> {
        if !self.installed {
            return Err(Error::EngineUnavailable {
                program: program.to_owned(),
            });
        }
        self.calls
            .borrow_mut()
            .push((program.to_owned(), args.to_vec()));

        if args.iter().any(|a| a == "-version") {
            return Ok(ProcessOutput::with_code(0, "ffmpeg version fake", ""));
        }
        if program == "ffprobe" {
            return Ok(ProcessOutput::with_code(0, self.probe_stdout.clone(), ""));
        }

        let output = args.last().map(PathBuf::from).unwrap_or_default();

        if args.iter().any(|a| a.starts_with("fps=")) {
            if self.fail_extraction {
                return Ok(ProcessOutput::with_code(1, "", "Invalid data found when processing input"));
            }
            let pattern = output.to_string_lossy().into_owned();
            for i in 1..=self.frames_to_write {
                fs::write(pattern.replace("%04d", &format!("{i:04}")), b"frame")?;
            }
            return Ok(ProcessOutput::with_code(0, "", ""));
        }

        if args.iter().any(|a| a.starts_with("tile=")) {
            if self.fail_composition {
                return Ok(ProcessOutput::with_code(1, "", "tile filter exploded"));
            }
            fs::write(&output, b"sheet")?;
            return Ok(ProcessOutput::with_code(0, "", ""));
        }

        if args.iter().any(|a| a == "pcm_s16le") {
            if self.fail_extraction {
                return Ok(ProcessOutput::with_code(1, "", "Output file does not contain any stream"));
            }
            fs::write(&output, b"RIFF")?;
            if let Some(interrupt) = &self.interrupt_after_audio {
                interrupt.trigger();
            }
            if self.partial_audio {
                return Ok(ProcessOutput::with_code(1, "", "Error while decoding stream #0:1"));
            }
            return Ok(ProcessOutput::with_code(0, "", ""));
        }

        Ok(ProcessOutput::with_code(1, "", "unexpected invocation"))
    }
}

pub fn probe_json(duration: f64, width: u32, height: u32) -> String {
    format!(
        r#"{{"streams":[{{"codec_type":"video","width":{width},"height":{height}}}],"format":{{"duration":"{duration}"}}}}"#
    )
}

/// Transcriber returning a fixed result and remembering how it was called.
pub struct FakeTranscriber {
    pub reported_language: String,
    pub fail: bool,
    /// Replace the WAV with a directory so it can no longer be removed as a file.
    pub squat_audio: bool,
    pub seen: Vec<(PathBuf, ModelSize, LanguageHint)>,
}

impl FakeTranscriber {
    pub fn new(reported_language: &str) -> Self {
        Self {
            reported_language: reported_language.to_owned(),
            fail: false,
            squat_audio: false,
            seen: Vec::new(),
        }
    }
}

impl Transcriber for FakeTranscriber {
    fn transcribe(
        &mut self,
        audio_path: &Path,
        model_size: ModelSize,
        language: &LanguageHint,
    ) -> Result<TranscriptionResult> {
        self.seen
            .push((audio_path.to_path_buf(), model_size, language.clone()));
        if self.squat_audio {
            fs::remove_file(audio_path)?;
            fs::create_dir(audio_path)?;
        }
        if self.fail {
            return Err(Error::Io(std::io::Error::other("model weights missing")));
        }

        let language = match language {
            LanguageHint::Auto => self.reported_language.clone(),
            LanguageHint::Explicit(lang) => lang.clone(),
        };
        TranscriptionResult::from_segments(
            Some(language),
            vec![
                TranscriptSegment::new(0.0, 1.5, " Hi"),
                TranscriptSegment::new(1.5, 3.25, " there"),
            ],
        )
    }
}

/// Create an empty stand-in video file in `dir`.
pub fn fake_video(dir: &Path, name: &str) -> std::io::Result<PathBuf> {
    let path = dir.join(name);
    fs::write(&path, b"not really a video")?;
    Ok(path)
}
