use std::path::PathBuf;

use clap::Parser;
use tracing::warn;

use framescribe::transcript_writer::preview;
use framescribe::{
    EngineOpts, Interrupt, LanguageHint, ModelSize, PipelineOutcome, PipelineRunner,
    TranscribeOpts, WhisperTranscriber,
};

/// Characters of transcript shown in the summary.
const PREVIEW_CHARS: usize = 200;

#[derive(Parser, Debug)]
#[command(name = "transcribe-video")]
#[command(about = "Extract audio from a video and transcribe it with Whisper")]
struct Params {
    /// Path to the video file.
    video: PathBuf,

    /// Language hint (e.g. `en`, `fr`) or `auto` for detection.
    #[arg(short = 'l', long = "language", default_value = "auto")]
    language: String,

    /// Whisper model size.
    #[arg(short = 'm', long = "model", value_enum, default_value_t = ModelSize::Small)]
    model: ModelSize,

    /// Directory holding ggml Whisper models (`ggml-<size>.bin`).
    #[arg(long = "models-dir", env = "FRAMESCRIBE_MODELS_DIR", default_value = "./models")]
    models_dir: PathBuf,

    /// Output directory (default: the video's directory).
    #[arg(short = 'o', long = "output-dir")]
    output_dir: Option<PathBuf>,

    /// Delete the extracted audio file once the run is over.
    #[arg(short = 'd', long = "delete-audio", default_value_t = false)]
    delete_audio: bool,

    /// ffmpeg executable.
    #[arg(long = "ffmpeg", env = "FRAMESCRIBE_FFMPEG", default_value = "ffmpeg")]
    ffmpeg: String,
}

fn main() {
    framescribe::logging::init();
    let params = Params::parse();

    let output_dir = params.output_dir.clone().unwrap_or_else(|| {
        params
            .video
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("."))
    });

    let opts = TranscribeOpts {
        video_path: params.video.clone(),
        output_dir,
        model_size: params.model,
        language: LanguageHint::parse(&params.language),
        delete_audio_after_run: params.delete_audio,
    };

    let interrupt = Interrupt::new();
    if let Err(err) = interrupt.install_ctrlc_handler() {
        warn!(error = %err, "could not install Ctrl-C handler");
    }

    let engine = EngineOpts {
        ffmpeg: params.ffmpeg,
        ..EngineOpts::default()
    };
    let runner = PipelineRunner::system(engine).with_interrupt(interrupt);
    let mut transcriber = WhisperTranscriber::new(params.models_dir);

    println!("Video Transcriber");
    println!("{}", "=".repeat(40));
    println!("Transcribing: {}", opts.video_path.display());
    println!("Model: {}  Language: {}", opts.model_size, opts.language);

    let outcome = runner.run_transcription(&mut transcriber, &opts);
    print_summary(&outcome, &opts);
    std::process::exit(outcome.exit_code());
}

fn print_summary(outcome: &PipelineOutcome, opts: &TranscribeOpts) {
    for warning in &outcome.warnings {
        println!("Warning: {warning}");
    }
    if let Some(audio) = &outcome.audio_deleted {
        println!("Cleaned up: {}", audio.display());
    }

    if !outcome.success {
        let message = outcome.error_message.as_deref().unwrap_or("unknown error");
        println!();
        println!("Failed: {message}");
        return;
    }

    println!();
    println!("Transcription completed successfully!");

    if let Some(transcript) = &outcome.transcript {
        let language = transcript.language().unwrap_or("unknown");
        match opts.language {
            LanguageHint::Auto => println!("Detected language: {language}"),
            LanguageHint::Explicit(_) => println!("Using language: {language}"),
        }
    }

    println!("Output files: {} files created", outcome.produced_files.len());
    for (tag, path) in &outcome.produced_files {
        println!("  {tag}: {}", path.display());
    }
    if let Some(audio) = &outcome.audio_path {
        println!("Audio kept: {}", audio.display());
    }

    if let Some(transcript) = &outcome.transcript {
        println!();
        println!("Transcription preview:");
        println!("{}", "-".repeat(40));
        println!("{}", preview(transcript.text(), PREVIEW_CHARS));
    }
}
