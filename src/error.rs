use thiserror::Error;

/// Framescribe's crate-wide result type.
pub type Result<T> = std::result::Result<T, Error>;

/// Framescribe's crate-wide error type.
///
/// This is intentionally decoupled from `anyhow` so downstream libraries aren't forced to
/// adopt `anyhow` in their own public APIs.
#[derive(Debug, Error)]
pub enum Error {
    #[error("'{program}' could not be executed; install ffmpeg and make sure it is on PATH")]
    EngineUnavailable { program: String },

    #[error("probe failed: {0}")]
    ProbeFailed(String),

    #[error("malformed probe metadata: {0}")]
    MalformedMetadata(String),

    #[error("extraction failed: {stderr}")]
    ExtractionFailed { stderr: String },

    #[error("contact sheet composition failed: {stderr}")]
    CompositionFailed { stderr: String },

    #[error("transcription failed: {cause}")]
    TranscriptionFailed { cause: String },

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("interrupted by user")]
    Interrupted,

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Coarse classification of [`Error`], cheap to copy into outcomes and match on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    EngineUnavailable,
    ProbeFailed,
    MalformedMetadata,
    ExtractionFailed,
    CompositionFailed,
    TranscriptionFailed,
    InvalidRequest,
    Interrupted,
    Io,
}

impl Error {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidRequest(message.into())
    }

    pub(crate) fn transcription(cause: impl std::fmt::Display) -> Self {
        Self::TranscriptionFailed {
            cause: cause.to_string(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::EngineUnavailable { .. } => ErrorKind::EngineUnavailable,
            Self::ProbeFailed(_) => ErrorKind::ProbeFailed,
            Self::MalformedMetadata(_) => ErrorKind::MalformedMetadata,
            Self::ExtractionFailed { .. } => ErrorKind::ExtractionFailed,
            Self::CompositionFailed { .. } => ErrorKind::CompositionFailed,
            Self::TranscriptionFailed { .. } => ErrorKind::TranscriptionFailed,
            Self::InvalidRequest(_) => ErrorKind::InvalidRequest,
            Self::Interrupted => ErrorKind::Interrupted,
            Self::Io(_) | Self::Json(_) => ErrorKind::Io,
        }
    }
}

impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Self::TranscriptionFailed {
            cause: format!("{err:#}"),
        }
    }
}
