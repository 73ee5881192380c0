//! In-memory collaborators for the binary's tests

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;

use storyvoice_config::SessionConfig;
use storyvoice_core::{
    Adventure, AdventureId, SpeechToText, StoryError, StoryModel, StoryService, TextToSpeech,
    Translator, Turn,
};
use storyvoice_server::{Input, ServerError, UserIo};

#[derive(Default)]
struct StoryState {
    turns: Vec<Turn>,
    next_turn: u32,
    generations: VecDeque<String>,
    send_failures: VecDeque<StoryError>,
    sent: Vec<String>,
}

impl StoryState {
    fn push(&mut self, text: &str) {
        self.next_turn += 1;
        let id = format!("t{}", self.next_turn);
        self.turns.push(Turn::new(id, text));
    }
}

/// Single-adventure story service with scripted generations
#[derive(Default)]
pub struct ScriptedStory {
    state: Mutex<StoryState>,
}

impl ScriptedStory {
    pub fn new<I: IntoIterator<Item = &'static str>>(generations: I) -> Arc<Self> {
        let story = Self::default();
        story
            .state
            .lock()
            .generations
            .extend(generations.into_iter().map(str::to_string));
        Arc::new(story)
    }

    pub fn fail_next_send(&self, err: StoryError) {
        self.state.lock().send_failures.push_back(err);
    }

    pub fn sent(&self) -> Vec<String> {
        self.state.lock().sent.clone()
    }

    pub fn canonical(&self) -> String {
        self.state.lock().turns.iter().map(|t| t.text.as_str()).collect()
    }
}

#[async_trait]
impl StoryService for ScriptedStory {
    async fn create(&self, _scenario_id: &str, seed_text: &str) -> Result<Adventure, StoryError> {
        let mut state = self.state.lock();
        state.turns.clear();
        state.push(seed_text);
        Ok(Adventure {
            id: AdventureId::new("A1"),
            turns: state.turns.clone(),
        })
    }

    async fn alter(
        &self,
        _adventure: &AdventureId,
        turn_id: &str,
        text: &str,
    ) -> Result<Vec<Turn>, StoryError> {
        let mut state = self.state.lock();
        let turn = state
            .turns
            .iter_mut()
            .find(|t| t.id == turn_id)
            .ok_or_else(|| StoryError::Rejected(format!("no action {turn_id}")))?;
        turn.text = text.to_string();
        Ok(state.turns.clone())
    }

    async fn send_action(&self, _adventure: &AdventureId, text: &str) -> Result<(), StoryError> {
        let mut state = self.state.lock();
        if let Some(err) = state.send_failures.pop_front() {
            return Err(err);
        }
        state.sent.push(text.to_string());
        if !text.is_empty() {
            state.push(&format!("\n{text}"));
        }
        if let Some(generation) = state.generations.pop_front() {
            state.push(&generation);
        }
        Ok(())
    }

    async fn fetch(&self, _adventure: &AdventureId) -> Result<Vec<Turn>, StoryError> {
        Ok(self.state.lock().turns.clone())
    }

    async fn configure(
        &self,
        _adventure: &AdventureId,
        _temperature: f32,
        _model: StoryModel,
    ) -> Result<(), StoryError> {
        Ok(())
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

/// Marks text as translated so the local view differs
pub struct Bracketing;

#[async_trait]
impl Translator for Bracketing {
    async fn to_local(&self, text: &str) -> storyvoice_core::Result<String> {
        Ok(text
            .split('\n')
            .map(|l| if l.is_empty() { String::new() } else { format!("[{l}]") })
            .collect::<Vec<_>>()
            .join("\n"))
    }

    async fn from_local(&self, text: &str) -> storyvoice_core::Result<String> {
        Ok(text.replace(['[', ']'], ""))
    }

    fn name(&self) -> &str {
        "bracketing"
    }
}

/// Microphone that "hears" scripted phrases
#[derive(Default)]
pub struct ScriptedListener {
    phrases: Mutex<VecDeque<String>>,
}

impl ScriptedListener {
    pub fn new<I: IntoIterator<Item = &'static str>>(phrases: I) -> Self {
        Self {
            phrases: Mutex::new(phrases.into_iter().map(str::to_string).collect()),
        }
    }
}

#[async_trait]
impl SpeechToText for ScriptedListener {
    async fn listen(&self) -> storyvoice_core::Result<String> {
        self.phrases
            .lock()
            .pop_front()
            .ok_or_else(|| storyvoice_core::Error::Speech("nothing recognised".into()))
    }

    fn model_name(&self) -> &str {
        "scripted"
    }
}

/// Records what would have been spoken
#[derive(Default)]
pub struct RecordingSpeaker {
    pub spoken: Mutex<Vec<String>>,
}

#[async_trait]
impl TextToSpeech for RecordingSpeaker {
    async fn speak(&self, text: &str) -> storyvoice_core::Result<()> {
        self.spoken.lock().push(text.to_string());
        Ok(())
    }

    fn model_name(&self) -> &str {
        "recording"
    }
}

/// Terminal stand-in: scripted lines in, captured text out
pub struct ScriptedIo {
    inputs: VecDeque<Input>,
    pub shown: Vec<String>,
}

impl ScriptedIo {
    pub fn new<I: IntoIterator<Item = &'static str>>(lines: I) -> Self {
        Self {
            inputs: lines
                .into_iter()
                .map(|l| Input::Line(l.to_string()))
                .collect(),
            shown: Vec::new(),
        }
    }

    pub fn saw(&self, needle: &str) -> bool {
        self.shown.iter().any(|s| s.contains(needle))
    }
}

#[async_trait]
impl UserIo for ScriptedIo {
    async fn read_input(&mut self) -> Result<Input, ServerError> {
        Ok(self.inputs.pop_front().unwrap_or(Input::Eof))
    }

    fn show(&mut self, text: &str) {
        self.shown.push(text.to_string());
    }
}

pub fn config(seed_chars: usize) -> SessionConfig {
    SessionConfig {
        seed_chars,
        first_generation_delay: Duration::ZERO,
        ..SessionConfig::default()
    }
}
