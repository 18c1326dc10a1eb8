/// Built-in speech-recognition backends.
pub mod whisper;
