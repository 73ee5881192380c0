//! Speech-to-text
//!
//! A listen is one captured phrase, resampled to 16 kHz, encoded as WAV and
//! handed to a recogniser. A recogniser that understood nothing is asked
//! again with the same audio, up to a configured bound.

mod capture;
mod google;
mod nest;

pub use capture::{AudioCapture, CpalCapture, PhraseLimits, Utterance};
pub use google::GoogleRecognizer;
pub use nest::NestRecognizer;

use std::sync::Arc;

use async_trait::async_trait;

use storyvoice_config::{AsrBackend, SpeechConfig};
use storyvoice_core::{Locale, SpeechToText};

use crate::audio::{encode_wav, resample, TARGET_SAMPLE_RATE};
use crate::cue::{Cue, CuePlayer};
use crate::PipelineError;

/// Turns a 16 kHz mono WAV clip into text
#[async_trait]
pub trait Recognizer: Send + Sync + 'static {
    /// `Ok(None)` when the clip held nothing recognisable
    async fn recognize(&self, wav: &[u8]) -> Result<Option<String>, PipelineError>;

    fn name(&self) -> &str;
}

/// Microphone-backed speech input
pub struct MicrophoneListener {
    capture: Arc<dyn AudioCapture>,
    recognizer: Arc<dyn Recognizer>,
    cues: CuePlayer,
    attempts: u32,
}

impl MicrophoneListener {
    pub fn new(
        capture: Arc<dyn AudioCapture>,
        recognizer: Arc<dyn Recognizer>,
        cues: CuePlayer,
        attempts: u32,
    ) -> Self {
        Self {
            capture,
            recognizer,
            cues,
            attempts: attempts.max(1),
        }
    }

    async fn listen_inner(&self) -> Result<String, PipelineError> {
        self.cues.play(Cue::Listening);
        let utterance = self.capture.record_phrase().await?;

        let samples = resample(&utterance.samples, utterance.sample_rate, TARGET_SAMPLE_RATE)?;
        let wav = encode_wav(&samples, TARGET_SAMPLE_RATE)?;

        for attempt in 1..=self.attempts {
            match self.recognizer.recognize(&wav).await? {
                Some(text) => {
                    tracing::info!(recognizer = self.recognizer.name(), %text, "Listened");
                    self.cues.play(Cue::Recognised);
                    return Ok(text);
                }
                None => {
                    tracing::warn!(attempt, max = self.attempts, "Nothing recognised, retrying");
                }
            }
        }

        Err(PipelineError::Recognition(format!(
            "Nothing recognised after {} attempts",
            self.attempts
        )))
    }
}

#[async_trait]
impl SpeechToText for MicrophoneListener {
    async fn listen(&self) -> storyvoice_core::Result<String> {
        Ok(self.listen_inner().await?)
    }

    fn model_name(&self) -> &str {
        self.recognizer.name()
    }
}

/// Speech input when no recogniser is configured
#[derive(Debug, Default)]
pub struct DisabledListener;

#[async_trait]
impl SpeechToText for DisabledListener {
    async fn listen(&self) -> storyvoice_core::Result<String> {
        Err(PipelineError::Disabled("no speech recogniser configured".to_string()).into())
    }

    fn model_name(&self) -> &str {
        "disabled"
    }
}

/// Create speech input for the resolved recogniser backend
pub fn create_listener(
    backend: &AsrBackend,
    config: &SpeechConfig,
    locale: &Locale,
) -> Result<Arc<dyn SpeechToText>, PipelineError> {
    let recognizer: Arc<dyn Recognizer> = match backend {
        AsrBackend::Google { endpoint, api_key } => {
            tracing::info!(locale = %locale, "Using Google speech recognition");
            Arc::new(GoogleRecognizer::new(endpoint.clone(), api_key.clone(), locale)?)
        }
        AsrBackend::Nest { url } => {
            tracing::info!(%url, "Using nest speech recognition");
            Arc::new(NestRecognizer::new(url.clone())?)
        }
        AsrBackend::None => {
            tracing::info!("Speech input disabled");
            return Ok(Arc::new(DisabledListener));
        }
    };

    let capture = Arc::new(CpalCapture::new(
        config.input_device.clone(),
        PhraseLimits::new(config.calibration(), config.phrase_time_limit()),
    ));

    Ok(Arc::new(MicrophoneListener::new(
        capture,
        recognizer,
        CuePlayer::new(config.cue_tones),
        config.recognition_attempts,
    )))
}
