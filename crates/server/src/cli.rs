//! Command-line interface
//!
//! Flags are turned into dotted setting overrides so they take priority
//! over files and environment variables.

use std::path::PathBuf;

use clap::Parser;

use storyvoice_config::SettingsSource;
use storyvoice_core::StoryModel;

#[derive(Debug, Parser)]
#[command(name = "storyvoice")]
#[command(about = "Voice-driven, translated interactive fiction client", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Settings file (yaml or toml)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,

    /// Text for the user prompt
    #[arg(long)]
    pub prompt: Option<String>,

    /// Authentication token for the story service
    #[arg(long)]
    pub auth_token: Option<String>,

    /// Scene file the story starts from
    #[arg(long, value_name = "FILE")]
    pub scene: Option<PathBuf>,

    /// Locale the user speaks and reads, e.g. ko-KR
    #[arg(long)]
    pub locale: Option<String>,

    /// Voice for `say`
    #[arg(long)]
    pub voice: Option<String>,

    /// Speech synthesis driver
    #[arg(long, value_parser = ["say", "nes", "none"])]
    pub tts: Option<String>,

    /// Base URL of the nes synthesis server
    #[arg(long)]
    pub tts_url: Option<String>,

    /// Speech recognition driver
    #[arg(long, value_parser = ["google", "nest", "none"])]
    pub asr: Option<String>,

    /// URL of the nest recognition server
    #[arg(long)]
    pub asr_url: Option<String>,

    /// Generation model version
    #[arg(long, value_parser = clap::value_parser!(u8).range(2..=3))]
    pub gpt: Option<u8>,

    /// Machine translation driver
    #[arg(long, value_parser = ["google", "papago", "none"])]
    pub mt: Option<String>,

    #[arg(long)]
    pub papago_id: Option<String>,

    #[arg(long)]
    pub papago_secret: Option<String>,

    /// Generation temperature (recommended range 0.5 to 2)
    #[arg(long)]
    pub temperature: Option<f32>,

    /// Serve the chat bridge instead of the interactive loop
    #[arg(long)]
    pub bridge: bool,

    /// Bridge listen port
    #[arg(long)]
    pub port: Option<u16>,
}

impl Cli {
    /// Settings sources with every given flag as an override
    pub fn settings_source(&self) -> SettingsSource {
        let mut source = SettingsSource {
            file: self.config.clone(),
            ..SettingsSource::default()
        };

        let path = |p: &PathBuf| p.to_string_lossy().into_owned();
        let overrides: [(&str, Option<String>); 16] = [
            ("debug", self.debug.then(|| "true".to_string())),
            ("prompt", self.prompt.clone()),
            ("auth_token", self.auth_token.clone()),
            ("scene", self.scene.as_ref().map(path)),
            ("locale", self.locale.clone()),
            ("speech.voice", self.voice.clone()),
            ("speech.tts", self.tts.clone()),
            ("speech.tts_url", self.tts_url.clone()),
            ("speech.asr", self.asr.clone()),
            ("speech.asr_url", self.asr_url.clone()),
            (
                "model",
                self.gpt
                    .and_then(StoryModel::from_gpt_version)
                    .map(|m| model_key(m).to_string()),
            ),
            ("translation.provider", self.mt.clone()),
            ("translation.papago_client_id", self.papago_id.clone()),
            ("translation.papago_client_secret", self.papago_secret.clone()),
            ("temperature", self.temperature.map(|t| t.to_string())),
            ("bridge.port", self.port.map(|p| p.to_string())),
        ];

        for (key, value) in overrides {
            if let Some(value) = value {
                source = source.with_override(key, value);
            }
        }
        source
    }
}

/// Settings-file spelling of a model
fn model_key(model: StoryModel) -> &'static str {
    match model {
        StoryModel::Classic => "classic",
        StoryModel::Dragon => "dragon",
    }
}
