//! Speech input and output for the storyvoice client
//!
//! - **Capture**: microphone recording with ambient-noise calibration (cpal)
//! - **Recognition**: Google Speech-to-Text or a self-hosted recogniser
//! - **Synthesis**: the `say` command or a self-hosted MP3 synthesiser
//! - **Cues**: short tones around recording

pub mod audio;
pub mod cue;
pub mod playback;
pub mod stt;
pub mod tts;

pub use cue::{Cue, CuePlayer};
pub use stt::{
    create_listener, AudioCapture, CpalCapture, DisabledListener, GoogleRecognizer,
    MicrophoneListener, NestRecognizer, PhraseLimits, Recognizer, Utterance,
};
pub use tts::{create_tts, NesTts, SayTts, SilentTts};

use thiserror::Error;

/// Speech pipeline errors
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Audio error: {0}")]
    Audio(String),

    #[error("Audio device error: {0}")]
    Device(String),

    #[error("Recognition error: {0}")]
    Recognition(String),

    #[error("Synthesis error: {0}")]
    Synthesis(String),

    #[error("Playback error: {0}")]
    Playback(String),

    #[error("Speech is disabled: {0}")]
    Disabled(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<reqwest::Error> for PipelineError {
    fn from(err: reqwest::Error) -> Self {
        PipelineError::Recognition(err.to_string())
    }
}

impl From<PipelineError> for storyvoice_core::Error {
    fn from(err: PipelineError) -> Self {
        storyvoice_core::Error::Speech(err.to_string())
    }
}
