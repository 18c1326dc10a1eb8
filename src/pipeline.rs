//! Sequencing of the two run modes.
//!
//! Extraction: probe (advisory) → sample frames → optional contact sheet (advisory).
//! Transcription: extract audio → transcribe → write txt/vtt/srt/json → optional audio cleanup.
//!
//! Nothing is retried. A failure in a load-bearing step ends the run; failures in advisory
//! steps become warnings on the [`PipelineOutcome`]. Every run produces exactly one outcome.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{error, info, info_span, warn};

use crate::contact_sheet;
use crate::frames::{self, ExtractedFrame};
use crate::interrupt::Interrupt;
use crate::opts::{EngineOpts, ExtractOpts, TranscribeOpts};
use crate::probe::{self, MediaProbe};
use crate::process::{self, ProcessOutput, ProcessRunner, SystemProcessRunner};
use crate::segments::TranscriptionResult;
use crate::transcriber::{Transcriber, run_transcription};
use crate::transcript_writer;
use crate::{Error, ErrorKind, Result, audio, video_stem};

/// Key of the contact sheet in [`PipelineOutcome::produced_files`].
pub const CONTACT_SHEET_TAG: &str = "contact_sheet";

/// Terminal summary of one pipeline run.
#[derive(Debug, Default)]
pub struct PipelineOutcome {
    pub success: bool,

    /// Persisted artifacts by format tag (`txt`, `vtt`, `srt`, `json`, `contact_sheet`).
    pub produced_files: BTreeMap<String, PathBuf>,

    pub error_message: Option<String>,
    pub error_kind: Option<ErrorKind>,

    /// Advisory failures that did not stop the run.
    pub warnings: Vec<String>,

    /// Extraction mode: probe estimates (zeroed when probing failed).
    pub probe: Option<MediaProbe>,

    /// Extraction mode: frames found on disk after sampling.
    pub frames: Vec<ExtractedFrame>,

    /// Directory the run wrote into.
    pub output_dir: Option<PathBuf>,

    /// Transcription mode: the model's result.
    pub transcript: Option<TranscriptionResult>,

    /// Transcription mode: the intermediate WAV, if it still exists after the run.
    pub audio_path: Option<PathBuf>,

    /// Transcription mode: the intermediate WAV removed by the requested cleanup.
    pub audio_deleted: Option<PathBuf>,
}

impl PipelineOutcome {
    /// Process exit code for this outcome: 0 on success, 1 otherwise.
    pub fn exit_code(&self) -> i32 {
        if self.success { 0 } else { 1 }
    }

    fn warn(&mut self, message: String) {
        warn!("{message}");
        self.warnings.push(message);
    }

    fn finish(&mut self, res: Result<()>) {
        match res {
            Ok(()) => self.success = true,
            Err(err) => {
                error!(error = %err, kind = ?err.kind(), "run failed");
                self.success = false;
                self.error_kind = Some(err.kind());
                self.error_message = Some(err.to_string());
            }
        }
    }
}

/// Wraps a runner so that an interrupt raised while a child was running wins over whatever
/// exit status the child reported.
struct Guarded<'a, P> {
    inner: &'a P,
    interrupt: &'a Interrupt,
}

impl<P: ProcessRunner> ProcessRunner for Guarded<'_, P> {
    fn run(&self, program: &str, args: &[String]) -> Result<ProcessOutput> {
        self.interrupt.check()?;
        let out = self.inner.run(program, args)?;
        self.interrupt.check()?;
        Ok(out)
    }
}

/// Runs the extraction and transcription pipelines against one external engine.
///
/// Independent runs share no mutable state. Concurrent runs must use distinct output
/// directories; nothing here locks paths.
pub struct PipelineRunner<P: ProcessRunner = SystemProcessRunner> {
    runner: P,
    engine: EngineOpts,
    interrupt: Interrupt,
}

impl PipelineRunner<SystemProcessRunner> {
    /// A runner that spawns real processes.
    pub fn system(engine: EngineOpts) -> Self {
        Self::new(SystemProcessRunner, engine)
    }
}

impl<P: ProcessRunner> PipelineRunner<P> {
    pub fn new(runner: P, engine: EngineOpts) -> Self {
        Self {
            runner,
            engine,
            interrupt: Interrupt::new(),
        }
    }

    /// Use `interrupt` (typically wired to Ctrl-C) to stop runs between steps.
    pub fn with_interrupt(mut self, interrupt: Interrupt) -> Self {
        self.interrupt = interrupt;
        self
    }

    pub fn engine(&self) -> &EngineOpts {
        &self.engine
    }

    pub fn interrupt(&self) -> &Interrupt {
        &self.interrupt
    }

    fn guarded(&self) -> Guarded<'_, P> {
        Guarded {
            inner: &self.runner,
            interrupt: &self.interrupt,
        }
    }

    /// Sample frames from a video and optionally tile them into a contact sheet.
    pub fn run_extraction(&self, opts: &ExtractOpts) -> PipelineOutcome {
        let span = info_span!("extract_frames", video = %opts.request.source_path.display());
        let _enter = span.enter();

        let mut outcome = PipelineOutcome::default();
        let res = self.extraction_steps(opts, &mut outcome);
        outcome.finish(res);

        info!(
            success = outcome.success,
            frames = outcome.frames.len(),
            "frame extraction finished"
        );
        outcome
    }

    fn extraction_steps(&self, opts: &ExtractOpts, outcome: &mut PipelineOutcome) -> Result<()> {
        let runner = self.guarded();
        let req = &opts.request;

        req.validate()?;
        process::ensure_available(&runner, &self.engine.ffmpeg)?;

        let probe = match probe::probe(&runner, &self.engine.ffprobe, &req.source_path, req.target_rate) {
            Ok(probe) => probe,
            Err(Error::Interrupted) => return Err(Error::Interrupted),
            Err(err) => {
                outcome.warn(format!("could not get video info: {err}"));
                MediaProbe::default()
            }
        };
        outcome.probe = Some(probe);

        outcome.frames = frames::extract(&runner, &self.engine.ffmpeg, req)?;
        outcome.output_dir = Some(req.output_dir.clone());

        if opts.contact_sheet && outcome.frames.len() > 1 {
            match contact_sheet::compose(
                &runner,
                &self.engine.ffmpeg,
                req,
                &outcome.frames,
                opts.contact_sheet_columns,
            ) {
                Ok(Some(path)) => {
                    outcome.produced_files.insert(CONTACT_SHEET_TAG.to_owned(), path);
                }
                Ok(None) => {}
                Err(Error::Interrupted) => return Err(Error::Interrupted),
                Err(err) => outcome.warn(format!("could not create contact sheet: {err}")),
            }
        }

        self.interrupt.check()
    }

    /// Extract a video's audio, transcribe it and persist the transcript in every output format.
    pub fn run_transcription<T: Transcriber + ?Sized>(
        &self,
        transcriber: &mut T,
        opts: &TranscribeOpts,
    ) -> PipelineOutcome {
        let span = info_span!("transcribe_video", video = %opts.video_path.display());
        let _enter = span.enter();

        let mut outcome = PipelineOutcome::default();
        let res = self.transcription_steps(transcriber, opts, &mut outcome);

        if let Some(audio_path) = outcome.audio_path.take().filter(|p| p.exists()) {
            if opts.delete_audio_after_run {
                match remove_audio(&audio_path) {
                    Ok(()) => outcome.audio_deleted = Some(audio_path),
                    Err(message) => {
                        outcome.audio_path = Some(audio_path);
                        outcome.warn(message);
                    }
                }
            } else {
                outcome.audio_path = Some(audio_path);
            }
        }

        outcome.finish(res);
        info!(
            success = outcome.success,
            files = outcome.produced_files.len(),
            "transcription finished"
        );
        outcome
    }

    fn transcription_steps<T: Transcriber + ?Sized>(
        &self,
        transcriber: &mut T,
        opts: &TranscribeOpts,
        outcome: &mut PipelineOutcome,
    ) -> Result<()> {
        let runner = self.guarded();

        if !opts.video_path.is_file() {
            return Err(Error::InvalidRequest(format!(
                "video file not found: {}",
                opts.video_path.display()
            )));
        }
        process::ensure_available(&runner, &self.engine.ffmpeg)?;

        // Claimed before the transcode so that cleanup also covers a WAV left by a failed run.
        outcome.audio_path = Some(audio::audio_path_for(&opts.video_path, &opts.output_dir));
        let audio_path = audio::extract(&runner, &self.engine.ffmpeg, &opts.video_path, &opts.output_dir)?;
        outcome.output_dir = Some(opts.output_dir.clone());

        let result = run_transcription(transcriber, &audio_path, opts.model_size, &opts.language)?;
        self.interrupt.check()?;

        let stem = video_stem(&opts.video_path);
        let files = transcript_writer::write_all(&result, &opts.output_dir, &stem)?;
        outcome.produced_files.extend(files);
        outcome.transcript = Some(result);

        Ok(())
    }
}

/// Delete the intermediate audio file, describing the failure if there is one.
fn remove_audio(path: &Path) -> std::result::Result<(), String> {
    match fs::remove_file(path) {
        Ok(()) => {
            info!(path = %path.display(), "cleaned up audio");
            Ok(())
        }
        Err(err) => Err(format!("could not delete audio {}: {err}", path.display())),
    }
}
