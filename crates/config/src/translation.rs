//! Translation provider configuration

use serde::{Deserialize, Serialize};

use crate::constants::endpoints;
use crate::ConfigError;

/// Translation providers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TranslationProvider {
    /// Public Google Translate endpoint
    #[default]
    Google,
    /// Naver Papago (client id + secret)
    Papago,
    /// Disabled (pass-through)
    #[serde(alias = "disabled")]
    None,
}

/// Translation configuration as it appears in files and the environment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslationConfig {
    /// Which provider to use
    #[serde(default)]
    pub provider: TranslationProvider,

    #[serde(default = "default_google_endpoint")]
    pub google_endpoint: String,

    #[serde(default = "default_papago_endpoint")]
    pub papago_endpoint: String,

    #[serde(default)]
    pub papago_client_id: Option<String>,

    #[serde(default)]
    pub papago_client_secret: Option<String>,
}

fn default_google_endpoint() -> String {
    endpoints::GOOGLE_TRANSLATE.to_string()
}

fn default_papago_endpoint() -> String {
    endpoints::PAPAGO_N2MT.to_string()
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            provider: TranslationProvider::default(),
            google_endpoint: default_google_endpoint(),
            papago_endpoint: default_papago_endpoint(),
            papago_client_id: None,
            papago_client_secret: None,
        }
    }
}

/// Fully resolved translation backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranslationBackend {
    Google {
        endpoint: String,
    },
    Papago {
        endpoint: String,
        client_id: String,
        client_secret: String,
    },
    None,
}

impl TranslationConfig {
    /// Resolve the provider into a backend, checking that the fields the
    /// provider needs are present
    pub fn backend(&self) -> Result<TranslationBackend, ConfigError> {
        match self.provider {
            TranslationProvider::Google => Ok(TranslationBackend::Google {
                endpoint: non_empty("translation.google_endpoint", Some(&self.google_endpoint))?,
            }),
            TranslationProvider::Papago => Ok(TranslationBackend::Papago {
                endpoint: non_empty("translation.papago_endpoint", Some(&self.papago_endpoint))?,
                client_id: non_empty(
                    "translation.papago_client_id",
                    self.papago_client_id.as_ref(),
                )?,
                client_secret: non_empty(
                    "translation.papago_client_secret",
                    self.papago_client_secret.as_ref(),
                )?,
            }),
            TranslationProvider::None => Ok(TranslationBackend::None),
        }
    }
}

pub(crate) fn non_empty(field: &str, value: Option<&String>) -> Result<String, ConfigError> {
    match value.map(|v| v.trim()) {
        Some(v) if !v.is_empty() => Ok(v.to_string()),
        _ => Err(ConfigError::MissingField(field.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = TranslationConfig::default();
        assert_eq!(config.provider, TranslationProvider::Google);
        assert_eq!(
            config.backend().unwrap(),
            TranslationBackend::Google {
                endpoint: endpoints::GOOGLE_TRANSLATE.to_string()
            }
        );
    }

    #[test]
    fn test_papago_requires_credentials() {
        let mut config = TranslationConfig {
            provider: TranslationProvider::Papago,
            papago_client_id: Some("id".into()),
            ..Default::default()
        };
        let err = config.backend().unwrap_err();
        assert!(matches!(err, ConfigError::MissingField(ref f) if f == "translation.papago_client_secret"));

        config.papago_client_secret = Some("   ".into());
        assert!(config.backend().is_err());

        config.papago_client_secret = Some("secret".into());
        assert_eq!(
            config.backend().unwrap(),
            TranslationBackend::Papago {
                endpoint: endpoints::PAPAGO_N2MT.to_string(),
                client_id: "id".into(),
                client_secret: "secret".into(),
            }
        );
    }

    #[test]
    fn test_provider_parsing() {
        let config: TranslationConfig = serde_yaml::from_str("provider: disabled").unwrap();
        assert_eq!(config.backend().unwrap(), TranslationBackend::None);

        let config: TranslationConfig = serde_yaml::from_str("provider: papago").unwrap();
        assert!(config.backend().is_err());
    }
}
