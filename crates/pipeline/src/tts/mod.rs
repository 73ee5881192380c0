//! Text-to-speech

mod nes;
mod say;

pub use nes::NesTts;
pub use say::SayTts;

use std::sync::Arc;

use async_trait::async_trait;

use storyvoice_config::TtsBackend;
use storyvoice_core::TextToSpeech;

use crate::PipelineError;

/// Speech output that says nothing
#[derive(Debug, Default)]
pub struct SilentTts;

#[async_trait]
impl TextToSpeech for SilentTts {
    async fn speak(&self, text: &str) -> storyvoice_core::Result<()> {
        tracing::debug!(chars = text.len(), "Speech output disabled, skipping");
        Ok(())
    }

    fn model_name(&self) -> &str {
        "silent"
    }
}

/// Create speech output for the resolved synthesiser backend
pub fn create_tts(backend: &TtsBackend) -> Result<Arc<dyn TextToSpeech>, PipelineError> {
    match backend {
        TtsBackend::Say { voice } => {
            tracing::info!(voice = ?voice, "Using `say` for speech output");
            Ok(Arc::new(SayTts::new(voice.clone())))
        }
        TtsBackend::Nes { url, speaker } => {
            tracing::info!(%url, %speaker, "Using nes speech synthesis");
            Ok(Arc::new(NesTts::new(url.clone(), speaker.clone())?))
        }
        TtsBackend::None => {
            tracing::info!("Speech output disabled");
            Ok(Arc::new(SilentTts))
        }
    }
}
