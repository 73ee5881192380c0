//! Short tones marking the start and end of a recording

use crate::audio::{encode_wav, sine_tone};
use crate::playback::play_clip;

const CUE_SAMPLE_RATE: u32 = 22_050;
const CUE_DURATION_MS: u32 = 120;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cue {
    /// Recording is about to start
    Listening,
    /// Speech was recognised
    Recognised,
}

impl Cue {
    fn frequency(self) -> f32 {
        match self {
            Cue::Listening => 880.0,
            Cue::Recognised => 587.0,
        }
    }
}

/// Fire-and-forget tone player; failures are only logged
#[derive(Debug, Clone, Copy)]
pub struct CuePlayer {
    enabled: bool,
}

impl CuePlayer {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    pub fn disabled() -> Self {
        Self::new(false)
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Start playing a cue without waiting for it. Must be called inside a
    /// tokio runtime.
    pub fn play(&self, cue: Cue) {
        if !self.enabled {
            return;
        }
        let samples = sine_tone(cue.frequency(), CUE_DURATION_MS, CUE_SAMPLE_RATE);
        let clip = match encode_wav(&samples, CUE_SAMPLE_RATE) {
            Ok(clip) => clip,
            Err(e) => {
                tracing::debug!(error = %e, "Failed to render cue");
                return;
            }
        };
        tokio::spawn(async move {
            if let Err(e) = play_clip(clip, "wav").await {
                tracing::debug!(error = %e, ?cue, "Cue playback failed");
            }
        });
    }
}
