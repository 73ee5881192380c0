//! Speech recognition and synthesis configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::constants::{endpoints, speech};
use crate::translation::non_empty;
use crate::ConfigError;

/// Speech recognition providers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AsrProvider {
    /// Google Cloud Speech-to-Text (API key)
    Google,
    /// Self-hosted recogniser accepting a WAV upload
    Nest,
    /// Speech input disabled
    #[default]
    #[serde(alias = "disabled")]
    None,
}

/// Speech synthesis providers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TtsProvider {
    /// The `say` command
    #[default]
    Say,
    /// Self-hosted synthesiser returning MP3 clips
    Nes,
    /// Speech output disabled
    #[serde(alias = "disabled")]
    None,
}

/// Speech configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeechConfig {
    #[serde(default)]
    pub asr: AsrProvider,

    /// Recogniser URL (nest)
    #[serde(default)]
    pub asr_url: Option<String>,

    #[serde(default = "default_google_speech_endpoint")]
    pub google_endpoint: String,

    /// Google Cloud API key (google)
    #[serde(default)]
    pub google_api_key: Option<String>,

    #[serde(default)]
    pub tts: TtsProvider,

    /// Synthesiser URL (nes)
    #[serde(default)]
    pub tts_url: Option<String>,

    /// Voice for `say`, speaker for nes
    #[serde(default)]
    pub voice: Option<String>,

    /// Input device name; the host default when unset
    #[serde(default)]
    pub input_device: Option<String>,

    /// Longest phrase captured by one listen
    #[serde(default = "default_phrase_time_limit")]
    pub phrase_time_limit_secs: u64,

    /// Ambient-noise sampling before recording starts
    #[serde(default = "default_calibration_ms")]
    pub calibration_ms: u64,

    /// Recognition attempts on the same audio when nothing was understood
    #[serde(default = "default_recognition_attempts")]
    pub recognition_attempts: u32,

    /// Play short tones when recording starts and finishes
    #[serde(default = "default_true")]
    pub cue_tones: bool,
}

fn default_google_speech_endpoint() -> String {
    endpoints::GOOGLE_SPEECH.to_string()
}

fn default_phrase_time_limit() -> u64 {
    speech::PHRASE_TIME_LIMIT_SECS
}

fn default_calibration_ms() -> u64 {
    speech::CALIBRATION_MS
}

fn default_recognition_attempts() -> u32 {
    speech::RECOGNITION_ATTEMPTS
}

fn default_true() -> bool {
    true
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            asr: AsrProvider::default(),
            asr_url: None,
            google_endpoint: default_google_speech_endpoint(),
            google_api_key: None,
            tts: TtsProvider::default(),
            tts_url: None,
            voice: None,
            input_device: None,
            phrase_time_limit_secs: default_phrase_time_limit(),
            calibration_ms: default_calibration_ms(),
            recognition_attempts: default_recognition_attempts(),
            cue_tones: true,
        }
    }
}

/// Fully resolved recogniser
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AsrBackend {
    Google { endpoint: String, api_key: String },
    Nest { url: String },
    None,
}

/// Fully resolved synthesiser
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TtsBackend {
    Say { voice: Option<String> },
    Nes { url: String, speaker: String },
    None,
}

impl SpeechConfig {
    pub fn asr_backend(&self) -> Result<AsrBackend, ConfigError> {
        match self.asr {
            AsrProvider::Google => Ok(AsrBackend::Google {
                endpoint: non_empty("speech.google_endpoint", Some(&self.google_endpoint))?,
                api_key: non_empty("speech.google_api_key", self.google_api_key.as_ref())?,
            }),
            AsrProvider::Nest => Ok(AsrBackend::Nest {
                url: non_empty("speech.asr_url", self.asr_url.as_ref())?,
            }),
            AsrProvider::None => Ok(AsrBackend::None),
        }
    }

    pub fn tts_backend(&self) -> Result<TtsBackend, ConfigError> {
        match self.tts {
            TtsProvider::Say => Ok(TtsBackend::Say {
                voice: self
                    .voice
                    .as_ref()
                    .map(|v| v.trim().to_string())
                    .filter(|v| !v.is_empty()),
            }),
            TtsProvider::Nes => Ok(TtsBackend::Nes {
                url: non_empty("speech.tts_url", self.tts_url.as_ref())?
                    .trim_end_matches('/')
                    .to_string(),
                speaker: non_empty("speech.voice", self.voice.as_ref())?,
            }),
            TtsProvider::None => Ok(TtsBackend::None),
        }
    }

    pub fn phrase_time_limit(&self) -> Duration {
        Duration::from_secs(self.phrase_time_limit_secs)
    }

    pub fn calibration(&self) -> Duration {
        Duration::from_millis(self.calibration_ms)
    }

    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.phrase_time_limit_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "speech.phrase_time_limit_secs".to_string(),
                message: "must be at least 1 second".to_string(),
            });
        }
        if self.recognition_attempts == 0 {
            return Err(ConfigError::InvalidValue {
                field: "speech.recognition_attempts".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        self.asr_backend()?;
        self.tts_backend()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SpeechConfig::default();
        assert_eq!(config.asr_backend().unwrap(), AsrBackend::None);
        assert_eq!(config.tts_backend().unwrap(), TtsBackend::Say { voice: None });
        assert_eq!(config.phrase_time_limit(), Duration::from_secs(5));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_nest_requires_url() {
        let mut config = SpeechConfig {
            asr: AsrProvider::Nest,
            ..Default::default()
        };
        assert!(config.asr_backend().is_err());

        config.asr_url = Some("http://localhost:5000/asr".into());
        assert_eq!(
            config.asr_backend().unwrap(),
            AsrBackend::Nest {
                url: "http://localhost:5000/asr".into()
            }
        );
    }

    #[test]
    fn test_google_asr_requires_key() {
        let config = SpeechConfig {
            asr: AsrProvider::Google,
            ..Default::default()
        };
        assert!(matches!(
            config.asr_backend(),
            Err(ConfigError::MissingField(ref f)) if f == "speech.google_api_key"
        ));
    }

    #[test]
    fn test_nes_requires_url_and_speaker() {
        let mut config = SpeechConfig {
            tts: TtsProvider::Nes,
            tts_url: Some("http://tts.local/".into()),
            ..Default::default()
        };
        assert!(config.tts_backend().is_err());

        config.voice = Some("mijin".into());
        assert_eq!(
            config.tts_backend().unwrap(),
            TtsBackend::Nes {
                url: "http://tts.local".into(),
                speaker: "mijin".into()
            }
        );
    }

    #[test]
    fn test_zero_bounds_rejected() {
        let config = SpeechConfig {
            recognition_attempts: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
