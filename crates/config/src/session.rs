//! Story session configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;

use storyvoice_core::StoryModel;

use crate::constants::story;
use crate::ConfigError;

/// `session` section of the settings file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSettings {
    /// Scenario the adventure is created from
    #[serde(default = "default_scenario_id")]
    pub scenario_id: String,

    /// Characters of the scene used for the creation call
    #[serde(default = "default_seed_chars")]
    pub seed_chars: usize,

    /// Bound on nudges while waiting for the first generated reply
    #[serde(default = "default_first_generation_attempts")]
    pub first_generation_attempts: u32,

    /// Pause between those nudges
    #[serde(default = "default_first_generation_delay_ms")]
    pub first_generation_delay_ms: u64,

    /// Bound on nudges while waiting for a guided answer
    #[serde(default = "default_qa_attempts")]
    pub qa_attempts: u32,
}

fn default_scenario_id() -> String {
    story::CUSTOM_SCENARIO_ID.to_string()
}

fn default_seed_chars() -> usize {
    story::SEED_CHARS
}

fn default_first_generation_attempts() -> u32 {
    story::FIRST_GENERATION_ATTEMPTS
}

fn default_first_generation_delay_ms() -> u64 {
    story::FIRST_GENERATION_DELAY_MS
}

fn default_qa_attempts() -> u32 {
    story::QA_ATTEMPTS
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            scenario_id: default_scenario_id(),
            seed_chars: default_seed_chars(),
            first_generation_attempts: default_first_generation_attempts(),
            first_generation_delay_ms: default_first_generation_delay_ms(),
            qa_attempts: default_qa_attempts(),
        }
    }
}

impl SessionSettings {
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.scenario_id.trim().is_empty() {
            return Err(ConfigError::MissingField("session.scenario_id".to_string()));
        }
        if self.seed_chars == 0 {
            return Err(ConfigError::InvalidValue {
                field: "session.seed_chars".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        if self.first_generation_attempts == 0 {
            return Err(ConfigError::InvalidValue {
                field: "session.first_generation_attempts".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        if self.qa_attempts == 0 {
            return Err(ConfigError::InvalidValue {
                field: "session.qa_attempts".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

/// Runtime parameters of one story session
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub scenario_id: String,
    pub seed_chars: usize,
    pub first_generation_attempts: u32,
    pub first_generation_delay: Duration,
    pub qa_attempts: u32,
    pub temperature: f32,
    pub model: StoryModel,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self::from_settings(
            &SessionSettings::default(),
            story::DEFAULT_TEMPERATURE,
            StoryModel::default(),
        )
    }
}

impl SessionConfig {
    pub fn from_settings(settings: &SessionSettings, temperature: f32, model: StoryModel) -> Self {
        Self {
            scenario_id: settings.scenario_id.clone(),
            seed_chars: settings.seed_chars,
            first_generation_attempts: settings.first_generation_attempts,
            first_generation_delay: Duration::from_millis(settings.first_generation_delay_ms),
            qa_attempts: settings.qa_attempts,
            temperature,
            model,
        }
    }
}
