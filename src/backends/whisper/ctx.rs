use std::path::Path;

use anyhow::{Context, Result, ensure};
use whisper_rs::{WhisperContext, WhisperContextParameters};

use super::logging::init_whisper_logging;

/// Load a ggml Whisper model and return an initialized `WhisperContext`.
pub(super) fn load_context(model_path: &Path) -> Result<WhisperContext> {
    init_whisper_logging();

    ensure!(
        model_path.is_file(),
        "Whisper model not found at '{}'",
        model_path.display()
    );

    let model = model_path.to_string_lossy();
    let ctx_params = WhisperContextParameters::default();
    let ctx = WhisperContext::new_with_params(&model, ctx_params)
        .with_context(|| format!("failed to load model from path: {model}"))?;

    Ok(ctx)
}
