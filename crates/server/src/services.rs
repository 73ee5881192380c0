//! Collaborators built from settings

use std::sync::Arc;

use storyvoice_agent::{Bridge, StorySession};
use storyvoice_config::Settings;
use storyvoice_core::{SpeechToText, StoryService, TextToSpeech, Translator};

/// Everything a session needs, chosen once at startup
#[derive(Clone)]
pub struct Services {
    pub story: Arc<dyn StoryService>,
    pub translator: Arc<dyn Translator>,
    pub listener: Arc<dyn SpeechToText>,
    pub speaker: Arc<dyn TextToSpeech>,
}

impl Services {
    pub fn from_settings(settings: &Settings) -> storyvoice_core::Result<Self> {
        let story = storyvoice_story::create_story_service(settings)?;
        let translator = storyvoice_text_processing::create_translator(
            &settings.translation.backend()?,
            &settings.locale,
        )?;
        let listener = storyvoice_pipeline::create_listener(
            &settings.speech.asr_backend()?,
            &settings.speech,
            &settings.locale,
        )?;
        let speaker = storyvoice_pipeline::create_tts(&settings.speech.tts_backend()?)?;

        tracing::info!(
            story = story.name(),
            translator = translator.name(),
            asr = listener.model_name(),
            tts = speaker.model_name(),
            locale = %settings.locale,
            "Services ready"
        );

        Ok(Self {
            story,
            translator,
            listener,
            speaker,
        })
    }

    pub fn session(&self, settings: &Settings) -> StorySession {
        StorySession::new(
            self.story.clone(),
            self.translator.clone(),
            settings.session_config(),
        )
    }

    pub fn bridge(&self, settings: &Settings, default_scene: Option<String>) -> Bridge {
        Bridge::new(
            self.story.clone(),
            self.translator.clone(),
            settings.session_config(),
            default_scene,
        )
    }
}
