use std::path::PathBuf;

use clap::Parser;
use tracing::warn;

use framescribe::frames::{FrameExtractionRequest, ImageFormat};
use framescribe::opts::DEFAULT_CONTACT_SHEET_COLUMNS;
use framescribe::{EngineOpts, ExtractOpts, Interrupt, PipelineOutcome, PipelineRunner};

/// How many sample filenames the summary lists.
const SAMPLE_FILES: usize = 3;

#[derive(Parser, Debug)]
#[command(name = "extract-frames")]
#[command(about = "Extract frames from a video at a fixed rate")]
struct Params {
    /// Path to the video file.
    video: PathBuf,

    /// Frames per second to extract.
    #[arg(short = 'f', long = "fps", default_value_t = 1.0)]
    fps: f64,

    /// Output image format.
    #[arg(long = "format", value_enum, default_value_t = ImageFormat::Jpg)]
    format: ImageFormat,

    /// Image quality: 1 (best) to 31 (worst) for JPEG; PNG maps it to a compression level.
    #[arg(short = 'q', long = "quality", default_value_t = 2,
          value_parser = clap::value_parser!(u32).range(1..=31))]
    quality: u32,

    /// Output directory (default: output/<video name>_frames).
    #[arg(short = 'o', long = "output-dir")]
    output_dir: Option<PathBuf>,

    /// Filename prefix for extracted frames.
    #[arg(short = 'p', long = "prefix", default_value = "frame")]
    prefix: String,

    /// Also tile the frames into a contact sheet.
    #[arg(short = 'c', long = "contact-sheet", default_value_t = false)]
    contact_sheet: bool,

    /// Contact sheet columns.
    #[arg(long = "columns", default_value_t = DEFAULT_CONTACT_SHEET_COLUMNS,
          value_parser = clap::value_parser!(u32).range(1..))]
    columns: u32,

    /// ffmpeg executable.
    #[arg(long = "ffmpeg", env = "FRAMESCRIBE_FFMPEG", default_value = "ffmpeg")]
    ffmpeg: String,

    /// ffprobe executable.
    #[arg(long = "ffprobe", env = "FRAMESCRIBE_FFPROBE", default_value = "ffprobe")]
    ffprobe: String,
}

fn main() {
    framescribe::logging::init();
    let params = Params::parse();

    let output_dir = params.output_dir.clone().unwrap_or_else(|| {
        let stem = params
            .video
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "video".to_owned());
        PathBuf::from("output").join(format!("{stem}_frames"))
    });

    let request = FrameExtractionRequest {
        source_path: params.video.clone(),
        target_rate: params.fps,
        output_dir,
        image_format: params.format,
        quality_level: params.quality,
        filename_prefix: params.prefix.clone(),
    };
    let mut opts = ExtractOpts::new(request);
    opts.contact_sheet = params.contact_sheet;
    opts.contact_sheet_columns = params.columns;

    let interrupt = Interrupt::new();
    if let Err(err) = interrupt.install_ctrlc_handler() {
        warn!(error = %err, "could not install Ctrl-C handler");
    }

    let engine = EngineOpts {
        ffmpeg: params.ffmpeg,
        ffprobe: params.ffprobe,
    };
    let runner = PipelineRunner::system(engine).with_interrupt(interrupt);

    println!("Video Frame Extractor");
    println!("{}", "=".repeat(40));
    println!("Extracting frames from: {}", opts.request.source_path.display());
    println!("Rate: {} frames per second", opts.request.target_rate);
    println!("Output: {}", opts.request.output_dir.display());

    let outcome = runner.run_extraction(&opts);
    print_summary(&outcome);
    std::process::exit(outcome.exit_code());
}

fn print_summary(outcome: &PipelineOutcome) {
    if let Some(probe) = outcome.probe.filter(|p| p.duration_seconds > 0.0) {
        println!("Video duration: {:.1} seconds", probe.duration_seconds);
        println!("Estimated frames: ~{}", probe.estimated_frame_count);
        if probe.width_px > 0 {
            println!("Resolution: {}x{}", probe.width_px, probe.height_px);
        }
    }

    for warning in &outcome.warnings {
        println!("Warning: {warning}");
    }

    if !outcome.success {
        let message = outcome.error_message.as_deref().unwrap_or("unknown error");
        println!();
        println!("Failed: {message}");
        return;
    }

    println!();
    println!("Frame extraction completed successfully!");
    println!("Frames extracted: {}", outcome.frames.len());
    if let Some(dir) = &outcome.output_dir {
        println!("Output directory: {}", dir.display());
    }

    if !outcome.frames.is_empty() {
        println!();
        println!("Sample files:");
        for frame in outcome.frames.iter().take(SAMPLE_FILES) {
            let name = frame.path.file_name().unwrap_or_default().to_string_lossy();
            println!("  - {name}");
        }
        if outcome.frames.len() > SAMPLE_FILES {
            println!("  - ... and {} more", outcome.frames.len() - SAMPLE_FILES);
        }
    }

    if let Some(sheet) = outcome.produced_files.get(framescribe::pipeline::CONTACT_SHEET_TAG) {
        println!("Contact sheet: {}", sheet.display());
    }
}
