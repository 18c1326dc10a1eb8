mod common;

use common::{FakeEngine, fake_video};
use framescribe::frames::{FrameExtractionRequest, ImageFormat};
use framescribe::pipeline::CONTACT_SHEET_TAG;
use framescribe::{EngineOpts, ErrorKind, ExtractOpts, Interrupt, PipelineRunner};

fn opts(video: &std::path::Path, out: &std::path::Path) -> ExtractOpts {
    ExtractOpts::new(FrameExtractionRequest::new(video, out))
}

#[test]
fn ten_second_video_at_two_fps_as_png() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let video = fake_video(dir.path(), "talk.mp4")?;
    let out = dir.path().join("frames");

    let mut engine = FakeEngine::new();
    engine.frames_to_write = 20;
    let runner = PipelineRunner::new(&engine, EngineOpts::default());

    let mut opts = opts(&video, &out);
    opts.request.target_rate = 2.0;
    opts.request.image_format = ImageFormat::Png;
    opts.request.quality_level = 3;

    let outcome = runner.run_extraction(&opts);
    assert!(outcome.success, "{:?}", outcome.error_message);
    assert_eq!(outcome.exit_code(), 0);

    let probe = outcome.probe.ok_or_else(|| anyhow::anyhow!("missing probe"))?;
    assert_eq!(probe.estimated_frame_count, 20);
    assert_eq!((probe.width_px, probe.height_px), (1920, 1080));

    let calls = engine.calls_with("fps=2");
    assert_eq!(calls.len(), 1);
    let args = &calls[0];
    let level = args
        .iter()
        .position(|a| a == "-compression_level")
        .map(|i| args[i + 1].as_str());
    assert_eq!(level, Some("9"));

    assert_eq!(outcome.frames.len(), 20);
    assert!(outcome.frames.len() as u64 <= probe.estimated_frame_count);
    let first = outcome.frames[0].path.file_name().unwrap_or_default();
    assert_eq!(first, "talk_frame_0001.png");
    let indices: Vec<u32> = outcome.frames.iter().map(|f| f.sequence_index).collect();
    assert_eq!(indices, (1..=20).collect::<Vec<_>>());
    Ok(())
}

#[test]
fn frame_count_comes_from_the_filesystem() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let video = fake_video(dir.path(), "clip.mov")?;
    let out = dir.path().join("frames");
    std::fs::create_dir_all(&out)?;
    // Left over from some other video; must not be counted.
    std::fs::write(out.join("other_frame_0001.jpg"), b"x")?;

    let mut engine = FakeEngine::new();
    engine.frames_to_write = 4;
    let runner = PipelineRunner::new(&engine, EngineOpts::default());

    let outcome = runner.run_extraction(&opts(&video, &out));
    assert!(outcome.success);
    assert_eq!(outcome.frames.len(), 4);
    Ok(())
}

#[test]
fn contact_sheet_with_one_frame_is_skipped_but_run_succeeds() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let video = fake_video(dir.path(), "talk.mp4")?;

    let mut engine = FakeEngine::new();
    engine.frames_to_write = 1;
    let runner = PipelineRunner::new(&engine, EngineOpts::default());

    let mut opts = opts(&video, &dir.path().join("frames"));
    opts.contact_sheet = true;

    let outcome = runner.run_extraction(&opts);
    assert!(outcome.success);
    assert!(!outcome.produced_files.contains_key(CONTACT_SHEET_TAG));
    assert!(engine.calls_with("tile=").is_empty());
    Ok(())
}

#[test]
fn contact_sheet_is_tiled_from_all_frames() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let video = fake_video(dir.path(), "talk.mp4")?;
    let out = dir.path().join("frames");

    let mut engine = FakeEngine::new();
    engine.frames_to_write = 9;
    let runner = PipelineRunner::new(&engine, EngineOpts::default());

    let mut opts = opts(&video, &out);
    opts.contact_sheet = true;

    let outcome = runner.run_extraction(&opts);
    assert!(outcome.success);
    assert_eq!(
        outcome.produced_files.get(CONTACT_SHEET_TAG),
        Some(&out.join("contact_sheet_talk.jpg"))
    );
    assert!(out.join("contact_sheet_talk.jpg").is_file());

    let tile = engine.calls_with("tile=");
    assert_eq!(tile.len(), 1);
    assert!(tile[0].contains(&"tile=4x3:margin=10:padding=5".to_owned()));
    Ok(())
}

#[test]
fn contact_sheet_failure_only_warns() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let video = fake_video(dir.path(), "talk.mp4")?;

    let mut engine = FakeEngine::new();
    engine.fail_composition = true;
    let runner = PipelineRunner::new(&engine, EngineOpts::default());

    let mut opts = opts(&video, &dir.path().join("frames"));
    opts.contact_sheet = true;

    let outcome = runner.run_extraction(&opts);
    assert!(outcome.success);
    assert_eq!(outcome.frames.len(), 3);
    assert!(outcome.produced_files.is_empty());
    assert_eq!(outcome.warnings.len(), 1);
    assert!(outcome.warnings[0].contains("tile filter exploded"));
    Ok(())
}

#[test]
fn malformed_probe_degrades_to_zero_estimates() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let video = fake_video(dir.path(), "talk.mp4")?;

    let mut engine = FakeEngine::new();
    engine.probe_stdout = "{ definitely not json".to_owned();
    let runner = PipelineRunner::new(&engine, EngineOpts::default());

    let outcome = runner.run_extraction(&opts(&video, &dir.path().join("frames")));
    assert!(outcome.success);
    assert_eq!(outcome.probe, Some(Default::default()));
    assert_eq!(outcome.warnings.len(), 1);
    assert_eq!(outcome.frames.len(), 3);
    Ok(())
}

#[test]
fn extraction_failure_is_terminal_and_carries_stderr() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let video = fake_video(dir.path(), "talk.mp4")?;

    let mut engine = FakeEngine::new();
    engine.fail_extraction = true;
    let runner = PipelineRunner::new(&engine, EngineOpts::default());

    let mut opts = opts(&video, &dir.path().join("frames"));
    opts.contact_sheet = true;

    let outcome = runner.run_extraction(&opts);
    assert!(!outcome.success);
    assert_eq!(outcome.exit_code(), 1);
    assert_eq!(outcome.error_kind, Some(ErrorKind::ExtractionFailed));
    let message = outcome.error_message.unwrap_or_default();
    assert!(message.contains("Invalid data found"));
    assert!(engine.calls_with("tile=").is_empty());
    Ok(())
}

#[test]
fn missing_engine_fails_without_writing_anything() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let video = fake_video(dir.path(), "talk.mp4")?;
    let out = dir.path().join("frames");

    let engine = FakeEngine::missing();
    let runner = PipelineRunner::new(&engine, EngineOpts::default());

    let outcome = runner.run_extraction(&opts(&video, &out));
    assert!(!outcome.success);
    assert_eq!(outcome.error_kind, Some(ErrorKind::EngineUnavailable));
    assert_eq!(outcome.exit_code(), 1);
    assert!(!out.exists());
    Ok(())
}

#[test]
fn invalid_rate_is_rejected_before_the_engine_runs() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let video = fake_video(dir.path(), "talk.mp4")?;

    let engine = FakeEngine::new();
    let runner = PipelineRunner::new(&engine, EngineOpts::default());

    let mut opts = opts(&video, &dir.path().join("frames"));
    opts.request.target_rate = -1.0;

    let outcome = runner.run_extraction(&opts);
    assert_eq!(outcome.error_kind, Some(ErrorKind::InvalidRequest));
    assert!(engine.calls.borrow().is_empty());
    Ok(())
}

#[test]
fn pending_interrupt_stops_the_run() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let video = fake_video(dir.path(), "talk.mp4")?;

    let engine = FakeEngine::new();
    let interrupt = Interrupt::new();
    let runner = PipelineRunner::new(&engine, EngineOpts::default()).with_interrupt(interrupt.clone());
    interrupt.trigger();

    let outcome = runner.run_extraction(&opts(&video, &dir.path().join("frames")));
    assert!(!outcome.success);
    assert_eq!(outcome.error_kind, Some(ErrorKind::Interrupted));
    assert!(engine.calls.borrow().is_empty());
    Ok(())
}
