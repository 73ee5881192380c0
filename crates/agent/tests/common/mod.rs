//! In-memory collaborators for session tests

#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;

use storyvoice_config::SessionConfig;
use storyvoice_core::{
    Adventure, AdventureId, StoryError, StoryModel, StoryService, Translator, Turn,
};

#[derive(Default)]
struct FakeState {
    adventures: HashMap<AdventureId, Vec<Turn>>,
    latest: Option<AdventureId>,
    next_turn: u32,
    /// Text the "model" appends after each sent action, in order
    generations: VecDeque<String>,
    send_failures: VecDeque<StoryError>,
    fetch_failures: VecDeque<StoryError>,
    alter_failures: VecDeque<StoryError>,
    calls: Vec<String>,
}

impl FakeState {
    fn turns_mut(&mut self, adventure: &AdventureId) -> Result<&mut Vec<Turn>, StoryError> {
        self.adventures
            .get_mut(adventure)
            .ok_or_else(|| StoryError::Rejected(format!("no adventure {adventure}")))
    }

    fn push(&mut self, adventure: &AdventureId, text: &str) -> Result<(), StoryError> {
        self.next_turn += 1;
        let id = format!("t{}", self.next_turn);
        self.turns_mut(adventure)?.push(Turn::new(id, text));
        Ok(())
    }
}

/// Story service that keeps turn lists in memory
///
/// Adventures are numbered `A1`, `A2`, ... and turns `t1`, `t2`, ... across
/// all adventures.
/// Non-empty actions are stored on a new line, like the real service does
/// for story-mode input. Each send then appends the next scripted
/// generation, if any.
#[derive(Default)]
pub struct FakeStory {
    state: Mutex<FakeState>,
}

impl FakeStory {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn with_generations<I, S>(generations: I) -> Arc<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let story = Self::default();
        story
            .state
            .lock()
            .generations
            .extend(generations.into_iter().map(Into::into));
        Arc::new(story)
    }

    pub fn script(&self, generation: impl Into<String>) {
        self.state.lock().generations.push_back(generation.into());
    }

    pub fn fail_next_send(&self, err: StoryError) {
        self.state.lock().send_failures.push_back(err);
    }

    pub fn fail_next_fetch(&self, err: StoryError) {
        self.state.lock().fetch_failures.push_back(err);
    }

    pub fn fail_next_alter(&self, err: StoryError) {
        self.state.lock().alter_failures.push_back(err);
    }

    /// Turns of the most recently created adventure
    pub fn turns(&self) -> Vec<Turn> {
        let state = self.state.lock();
        state
            .latest
            .as_ref()
            .and_then(|id| state.adventures.get(id))
            .cloned()
            .unwrap_or_default()
    }

    pub fn turns_of(&self, adventure: &str) -> Vec<Turn> {
        self.state
            .lock()
            .adventures
            .get(&AdventureId::new(adventure))
            .cloned()
            .unwrap_or_default()
    }

    pub fn calls(&self) -> Vec<String> {
        self.state.lock().calls.clone()
    }

    pub fn count_calls(&self, prefix: &str) -> usize {
        self.state
            .lock()
            .calls
            .iter()
            .filter(|c| c.starts_with(prefix))
            .count()
    }
}

#[async_trait]
impl StoryService for FakeStory {
    async fn create(&self, scenario_id: &str, seed_text: &str) -> Result<Adventure, StoryError> {
        let mut state = self.state.lock();
        state.calls.push(format!("create {scenario_id}"));
        let id = AdventureId::new(format!("A{}", state.adventures.len() + 1));
        state.adventures.insert(id.clone(), Vec::new());
        state.latest = Some(id.clone());
        state.push(&id, seed_text)?;
        Ok(Adventure {
            turns: state.adventures[&id].clone(),
            id,
        })
    }

    async fn alter(
        &self,
        adventure: &AdventureId,
        turn_id: &str,
        text: &str,
    ) -> Result<Vec<Turn>, StoryError> {
        let mut state = self.state.lock();
        state.calls.push(format!("alter {turn_id}"));
        if let Some(err) = state.alter_failures.pop_front() {
            return Err(err);
        }
        let turns = state.turns_mut(adventure)?;
        let turn = turns
            .iter_mut()
            .find(|t| t.id == turn_id)
            .ok_or_else(|| StoryError::Rejected(format!("no action {turn_id}")))?;
        turn.text = text.to_string();
        Ok(turns.clone())
    }

    async fn send_action(&self, adventure: &AdventureId, text: &str) -> Result<(), StoryError> {
        let mut state = self.state.lock();
        state.calls.push(format!("send {text}"));
        if let Some(err) = state.send_failures.pop_front() {
            return Err(err);
        }
        if !text.is_empty() {
            state.push(adventure, &format!("\n{text}"))?;
        }
        if let Some(generation) = state.generations.pop_front() {
            state.push(adventure, &generation)?;
        }
        Ok(())
    }

    async fn fetch(&self, adventure: &AdventureId) -> Result<Vec<Turn>, StoryError> {
        let mut state = self.state.lock();
        state.calls.push("fetch".to_string());
        if let Some(err) = state.fetch_failures.pop_front() {
            return Err(err);
        }
        Ok(state.turns_mut(adventure)?.clone())
    }

    async fn configure(
        &self,
        _adventure: &AdventureId,
        temperature: f32,
        model: StoryModel,
    ) -> Result<(), StoryError> {
        self.state
            .lock()
            .calls
            .push(format!("configure {temperature} {}", model.api_name()));
        Ok(())
    }

    fn name(&self) -> &str {
        "fake"
    }
}

/// Identity translator, as used for a pivot-language locale
pub struct Identity;

#[async_trait]
impl Translator for Identity {
    async fn to_local(&self, text: &str) -> storyvoice_core::Result<String> {
        Ok(text.to_string())
    }

    async fn from_local(&self, text: &str) -> storyvoice_core::Result<String> {
        Ok(text.to_string())
    }

    fn name(&self) -> &str {
        "identity"
    }

    fn is_identity(&self) -> bool {
        true
    }
}

/// Upper-cases towards the local language, lower-cases back
pub struct Shouting;

#[async_trait]
impl Translator for Shouting {
    async fn to_local(&self, text: &str) -> storyvoice_core::Result<String> {
        Ok(text.to_uppercase())
    }

    async fn from_local(&self, text: &str) -> storyvoice_core::Result<String> {
        Ok(text.to_lowercase())
    }

    fn name(&self) -> &str {
        "shouting"
    }
}

/// Translator whose service is down
pub struct Broken;

#[async_trait]
impl Translator for Broken {
    async fn to_local(&self, _text: &str) -> storyvoice_core::Result<String> {
        Err(storyvoice_core::Error::Translation("service down".into()))
    }

    async fn from_local(&self, _text: &str) -> storyvoice_core::Result<String> {
        Err(storyvoice_core::Error::Translation("service down".into()))
    }

    fn name(&self) -> &str {
        "broken"
    }
}

/// Reads the local language but cannot produce it
pub struct OneWay;

#[async_trait]
impl Translator for OneWay {
    async fn to_local(&self, _text: &str) -> storyvoice_core::Result<String> {
        Err(storyvoice_core::Error::Translation("quota exceeded".into()))
    }

    async fn from_local(&self, text: &str) -> storyvoice_core::Result<String> {
        Ok(text.to_string())
    }

    fn name(&self) -> &str {
        "one-way"
    }
}

pub fn config() -> SessionConfig {
    SessionConfig {
        first_generation_attempts: 5,
        first_generation_delay: Duration::ZERO,
        ..SessionConfig::default()
    }
}
