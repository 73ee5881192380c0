//! Configuration management for the storyvoice client
//!
//! Supports loading configuration from:
//! - YAML/TOML files (`config/default.*`, the user config directory, or an
//!   explicit `--config` file)
//! - Environment variables (STORYVOICE_ prefix, `__` between sections)
//! - Command-line overrides
//!
//! Provider choices (translation, speech recognition, speech synthesis) are
//! plain enums in the file format and are resolved once into tagged
//! backends, so an incomplete provider configuration fails at startup.

pub mod constants;
pub mod session;
pub mod settings;
pub mod speech;
pub mod translation;

pub use session::{SessionConfig, SessionSettings};
pub use settings::{
    load_settings, read_scene, BridgeConfig, ObservabilityConfig, Settings, SettingsSource,
    StoryServiceConfig,
};
pub use speech::{AsrBackend, AsrProvider, SpeechConfig, TtsBackend, TtsProvider};
pub use translation::{TranslationBackend, TranslationConfig, TranslationProvider};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    FileNotFound(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },
}

impl From<config::ConfigError> for ConfigError {
    fn from(err: config::ConfigError) -> Self {
        ConfigError::ParseError(err.to_string())
    }
}

impl From<ConfigError> for storyvoice_core::Error {
    fn from(err: ConfigError) -> Self {
        storyvoice_core::Error::Config(err.to_string())
    }
}
