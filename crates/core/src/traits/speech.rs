//! Speech processing traits

use async_trait::async_trait;

use crate::Result;

/// Speech-to-Text interface
///
/// One call captures a single utterance from the input device (after
/// ambient-noise calibration, bounded by a phrase time limit) and returns the
/// recognised text in the local language.
///
/// # Example
///
/// ```ignore
/// let stt: Arc<dyn SpeechToText> = create_listener(&backend, &speech, &locale)?;
/// let heard = stt.listen().await?;
/// println!("Listened: {}", heard);
/// ```
#[async_trait]
pub trait SpeechToText: Send + Sync + 'static {
    /// Capture and recognise one utterance
    async fn listen(&self) -> Result<String>;

    /// Get model name for logging
    fn model_name(&self) -> &str;
}

/// Text-to-Speech interface
#[async_trait]
pub trait TextToSpeech: Send + Sync + 'static {
    /// Speak the given local-language text
    async fn speak(&self, text: &str) -> Result<()>;

    /// Get model name for logging
    fn model_name(&self) -> &str;
}
