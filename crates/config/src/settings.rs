//! Main settings module

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use storyvoice_core::{Locale, StoryModel};

use crate::constants::{bridge, endpoints, story};
use crate::{ConfigError, SessionConfig, SessionSettings, SpeechConfig, TranslationConfig};

/// Main application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Prompt shown before each line of user input
    #[serde(default = "default_prompt")]
    pub prompt: String,

    /// Verbose diagnostics (forces debug-level logging)
    #[serde(default)]
    pub debug: bool,

    /// Story service access token
    #[serde(default)]
    pub auth_token: Option<String>,

    /// Path to the opening scene
    #[serde(default)]
    pub scene: Option<PathBuf>,

    /// Language the user speaks and reads
    #[serde(default)]
    pub locale: Locale,

    /// Sampling temperature forwarded to the story service
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Generation model forwarded to the story service
    #[serde(default)]
    pub model: StoryModel,

    #[serde(default)]
    pub story: StoryServiceConfig,

    #[serde(default)]
    pub translation: TranslationConfig,

    #[serde(default)]
    pub speech: SpeechConfig,

    #[serde(default)]
    pub session: SessionSettings,

    #[serde(default)]
    pub bridge: BridgeConfig,

    #[serde(default)]
    pub observability: ObservabilityConfig,
}

fn default_prompt() -> String {
    "> ".to_string()
}

fn default_temperature() -> f32 {
    story::DEFAULT_TEMPERATURE
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            prompt: default_prompt(),
            debug: false,
            auth_token: None,
            scene: None,
            locale: Locale::default(),
            temperature: default_temperature(),
            model: StoryModel::default(),
            story: StoryServiceConfig::default(),
            translation: TranslationConfig::default(),
            speech: SpeechConfig::default(),
            session: SessionSettings::default(),
            bridge: BridgeConfig::default(),
            observability: ObservabilityConfig::default(),
        }
    }
}

/// Remote story service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoryServiceConfig {
    #[serde(default = "default_story_endpoint")]
    pub endpoint: String,

    #[serde(default = "default_story_timeout")]
    pub timeout_secs: u64,

    #[serde(default = "default_max_redirects")]
    pub max_redirects: usize,
}

fn default_story_endpoint() -> String {
    endpoints::STORY_GRAPHQL.to_string()
}

fn default_story_timeout() -> u64 {
    30
}

fn default_max_redirects() -> usize {
    10
}

impl Default for StoryServiceConfig {
    fn default() -> Self {
        Self {
            endpoint: default_story_endpoint(),
            timeout_secs: default_story_timeout(),
            max_redirects: default_max_redirects(),
        }
    }
}

/// Chat bridge HTTP server
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BridgeConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Scene used when a conversation starts without one
    #[serde(default)]
    pub default_scene: Option<PathBuf>,
}

fn default_host() -> String {
    bridge::HOST.to_string()
}

fn default_port() -> u16 {
    bridge::PORT
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            default_scene: None,
        }
    }
}

/// Logging
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Enable JSON logging
    #[serde(default)]
    pub log_json: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_json: false,
        }
    }
}

impl Settings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate settings shared by every mode
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self.auth_token.as_deref().map(str::trim) {
            Some(token) if !token.is_empty() => {}
            _ => return Err(ConfigError::MissingField("auth_token".to_string())),
        }

        if !(0.0..=story::MAX_TEMPERATURE).contains(&self.temperature) {
            return Err(ConfigError::InvalidValue {
                field: "temperature".to_string(),
                message: format!(
                    "{} is outside 0.0..={}",
                    self.temperature,
                    story::MAX_TEMPERATURE
                ),
            });
        }

        if self.story.endpoint.trim().is_empty() {
            return Err(ConfigError::MissingField("story.endpoint".to_string()));
        }
        if self.story.timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "story.timeout_secs".to_string(),
                message: "must be at least 1".to_string(),
            });
        }

        self.translation.backend()?;
        self.speech.validate()?;
        self.session.validate()?;

        if self.bridge.port == 0 {
            return Err(ConfigError::InvalidValue {
                field: "bridge.port".to_string(),
                message: "port cannot be 0".to_string(),
            });
        }

        Ok(())
    }

    /// Runtime parameters handed to every story session
    pub fn session_config(&self) -> SessionConfig {
        SessionConfig::from_settings(&self.session, self.temperature, self.model)
    }

    /// Opening scene for the interactive client
    pub fn scene_text(&self) -> Result<String, ConfigError> {
        let path = self
            .scene
            .as_deref()
            .ok_or_else(|| ConfigError::MissingField("scene".to_string()))?;
        read_scene(path)
    }

    /// Scene used by the bridge when a conversation names none
    pub fn default_bridge_scene(&self) -> Result<Option<String>, ConfigError> {
        self.bridge
            .default_scene
            .as_deref()
            .or(self.scene.as_deref())
            .map(read_scene)
            .transpose()
    }

    /// Effective log filter directive for this crate family
    pub fn log_level(&self) -> &str {
        if self.debug {
            "debug"
        } else {
            &self.observability.log_level
        }
    }
}

/// Read a scene file; unreadable and empty files are both rejected
pub fn read_scene(path: &Path) -> Result<String, ConfigError> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| ConfigError::FileNotFound(format!("{}: {}", path.display(), e)))?;
    if text.trim().is_empty() {
        return Err(ConfigError::InvalidValue {
            field: "scene".to_string(),
            message: format!("{} is empty", path.display()),
        });
    }
    Ok(text)
}

/// Where settings come from beyond the built-in defaults
#[derive(Debug, Clone, Default)]
pub struct SettingsSource {
    /// Explicit configuration file (`--config`); must exist when given
    pub file: Option<PathBuf>,
    /// Command-line overrides as dotted keys, applied last
    pub overrides: Vec<(String, String)>,
    /// Skip `config/default.*` and the user config directory
    pub skip_default_files: bool,
}

impl SettingsSource {
    pub fn with_override(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.overrides.push((key.into(), value.into()));
        self
    }
}

/// Load settings from files, environment and command-line overrides
///
/// Priority (highest to lowest):
/// 1. Command-line overrides
/// 2. Environment variables (STORYVOICE_ prefix)
/// 3. Explicit `--config` file
/// 4. `<user config dir>/storyvoice/config.*`
/// 5. config/default.*
pub fn load_settings(source: &SettingsSource) -> Result<Settings, ConfigError> {
    let mut builder = Config::builder();

    if !source.skip_default_files {
        builder = builder.add_source(File::with_name("config/default").required(false));

        if let Some(dir) = dirs::config_dir() {
            let user = dir.join("storyvoice").join("config");
            tracing::debug!(path = %user.display(), "Looking for user configuration");
            builder = builder.add_source(File::with_name(&user.to_string_lossy()).required(false));
        }
    }

    if let Some(path) = &source.file {
        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.display().to_string()));
        }
        builder = builder.add_source(File::from(path.as_path()).required(true));
    }

    builder = builder.add_source(
        Environment::with_prefix("STORYVOICE")
            .separator("__")
            .try_parsing(true),
    );

    for (key, value) in &source.overrides {
        builder = builder.set_override(key.as_str(), value.as_str())?;
    }

    let config = builder.build()?;
    let settings: Settings = config.try_deserialize()?;

    settings.validate()?;

    Ok(settings)
}
