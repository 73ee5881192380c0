//! Story session state machine
//!
//! A session owns one remote adventure. The remote turn list is the only
//! source of truth: every mutating call replaces the local [`History`] with
//! the list the service returns, then re-derives both transcript views.
//!
//! ```text
//! Uninitialized --create--> Created --await_first_generation-->
//!     Created --prime--> Primed --resolve_actors--> Interactive
//! ```

mod qa;
mod state;
mod transcript;

pub use qa::QaAnswer;
pub use state::SessionState;
pub use transcript::Transcript;

use std::sync::Arc;

use storyvoice_config::SessionConfig;
use storyvoice_core::{AdventureId, History, StoryService, Translator, Turn};

use crate::actors::{resolve_actors, Actors};
use crate::SessionError;

/// One interactive story against the remote service
pub struct StorySession {
    story: Arc<dyn StoryService>,
    translator: Arc<dyn Translator>,
    config: SessionConfig,
    state: SessionState,
    adventure: Option<AdventureId>,
    history: History,
    transcript: Transcript,
    actors: Option<Actors>,
}

impl StorySession {
    pub fn new(
        story: Arc<dyn StoryService>,
        translator: Arc<dyn Translator>,
        config: SessionConfig,
    ) -> Self {
        Self {
            story,
            translator,
            config,
            state: SessionState::Uninitialized,
            adventure: None,
            history: History::default(),
            transcript: Transcript::default(),
            actors: None,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn adventure_id(&self) -> Option<&AdventureId> {
        self.adventure.as_ref()
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn actors(&self) -> Option<&Actors> {
        self.actors.as_ref()
    }

    pub fn translator(&self) -> &Arc<dyn Translator> {
        &self.translator
    }

    /// Last `n` lines of the local transcript
    pub fn local_tail(&self, n: usize) -> String {
        self.transcript.local_tail(n)
    }

    fn adventure(&self) -> Result<AdventureId, SessionError> {
        match &self.adventure {
            Some(id) if self.state.has_adventure() => Ok(id.clone()),
            _ => Err(SessionError::InvalidState {
                expected: "an adventure",
                actual: self.state,
            }),
        }
    }

    fn expect_state(&self, expected: SessionState) -> Result<(), SessionError> {
        if self.state == expected {
            Ok(())
        } else {
            Err(SessionError::InvalidState {
                expected: expected.as_str(),
                actual: self.state,
            })
        }
    }

    fn expect_interactive(&self) -> Result<(), SessionError> {
        if self.state.accepts_turns() {
            Ok(())
        } else {
            Err(SessionError::InvalidState {
                expected: "primed or interactive",
                actual: self.state,
            })
        }
    }

    /// Run the whole lifecycle for a scene in the pivot language
    ///
    /// The first `seed_chars` characters create the adventure, the rest is
    /// merged into the latest turn once the service has replied.
    pub async fn start(&mut self, scene: &str) -> Result<(), SessionError> {
        let split = scene
            .char_indices()
            .nth(self.config.seed_chars)
            .map(|(i, _)| i)
            .unwrap_or(scene.len());
        let (head, remainder) = scene.split_at(split);

        self.create(head).await?;
        self.configure().await;
        self.await_first_generation().await?;
        self.prime(remainder).await?;
        self.resolve_actors();
        Ok(())
    }

    /// Create the remote adventure from a seed text
    pub async fn create(&mut self, seed_text: &str) -> Result<(), SessionError> {
        self.expect_state(SessionState::Uninitialized)?;

        let adventure = self
            .story
            .create(&self.config.scenario_id, seed_text)
            .await
            .map_err(SessionError::Fatal)?;
        tracing::info!(
            adventure_id = %adventure.id,
            turns = adventure.turns.len(),
            "Adventure created"
        );

        self.adventure = Some(adventure.id);
        self.history.replace(adventure.turns);
        self.state = SessionState::Created;
        self.refresh().await;
        Ok(())
    }

    /// Apply temperature and model; failure leaves the backend defaults
    async fn configure(&self) {
        let Some(id) = &self.adventure else { return };
        if let Err(e) = self
            .story
            .configure(id, self.config.temperature, self.config.model)
            .await
        {
            tracing::warn!(
                adventure_id = %id,
                error = %e,
                "Could not apply generation settings, keeping service defaults"
            );
        }
    }

    /// Nudge the service until the first generated turn shows up
    pub async fn await_first_generation(&mut self) -> Result<(), SessionError> {
        self.expect_state(SessionState::Created)?;
        let id = self.adventure()?;
        let max = self.config.first_generation_attempts;

        let mut attempt = 0;
        while self.history.len() < 2 {
            if attempt == max {
                tracing::error!(adventure_id = %id, attempts = max, "No first generation");
                return Err(SessionError::FirstGenerationTimeout { attempts: max });
            }
            if attempt > 0 {
                tokio::time::sleep(self.config.first_generation_delay).await;
            }
            attempt += 1;
            tracing::debug!(adventure_id = %id, attempt, "Waiting for first generation");

            self.story
                .send_action(&id, "")
                .await
                .map_err(SessionError::Fatal)?;
            let turns = self.story.fetch(&id).await.map_err(SessionError::Fatal)?;
            self.history.replace(turns);
        }

        self.refresh().await;
        Ok(())
    }

    /// Merge the rest of the scene into the latest turn
    pub async fn prime(&mut self, remainder: &str) -> Result<(), SessionError> {
        self.expect_state(SessionState::Created)?;
        let last = self.history.last().ok_or(SessionError::NoTurns)?.id.clone();

        self.alter(&last, remainder).await?;
        self.state = SessionState::Primed;
        Ok(())
    }

    /// Detect the speaker labels once; `Interactive` either way
    pub fn resolve_actors(&mut self) -> Option<&Actors> {
        if self.state == SessionState::Primed {
            self.state = SessionState::Interactive;
        }
        if self.actors.is_none() {
            self.actors = resolve_actors(&self.transcript.canonical);
        }
        self.actors.as_ref()
    }

    /// Replace the full text of one turn
    pub async fn alter(&mut self, turn_id: &str, text: &str) -> Result<(), SessionError> {
        self.alter_quiet(turn_id, text).await?;
        self.refresh().await;
        Ok(())
    }

    async fn alter_quiet(&mut self, turn_id: &str, text: &str) -> Result<(), SessionError> {
        let id = self.adventure()?;
        let turns = self
            .story
            .alter(&id, turn_id, text)
            .await
            .map_err(SessionError::Fatal)?;
        tracing::debug!(adventure_id = %id, turn_id, turns = turns.len(), "Turn altered");
        self.history.replace(turns);
        Ok(())
    }

    /// Submit a local-language turn and fetch the continuation
    ///
    /// A transient failure returns [`SessionError::Transient`] and leaves the
    /// history exactly as it was.
    pub async fn continue_story(&mut self, text: &str) -> Result<(), SessionError> {
        self.expect_interactive()?;
        let pivot = self.translator.from_local(text).await?;
        self.submit_pivot(&pivot).await?;
        self.refresh().await;
        Ok(())
    }

    /// Send pivot-language text as is and replace the history
    async fn submit_pivot(&mut self, text: &str) -> Result<(), SessionError> {
        let id = self.adventure()?;
        self.state = SessionState::Interactive;

        self.story
            .send_action(&id, text)
            .await
            .map_err(SessionError::from_interaction)?;
        let turns = self
            .story
            .fetch(&id)
            .await
            .map_err(SessionError::from_interaction)?;
        tracing::debug!(adventure_id = %id, turns = turns.len(), "Story continued");
        self.history.replace(turns);
        Ok(())
    }

    /// Remove the last `lines` transcript lines, newest turn first
    pub async fn rollback(&mut self, lines: i64) -> Result<(), SessionError> {
        if lines <= 0 {
            return Ok(());
        }
        self.expect_interactive()?;

        let mut remaining = lines as usize;
        let snapshot: Vec<Turn> = self.history.turns().to_vec();
        for turn in snapshot.iter().rev() {
            if remaining == 0 {
                break;
            }
            let count = turn.line_count();
            if count <= remaining {
                self.alter_quiet(&turn.id, "").await?;
                remaining -= count;
            } else {
                let kept: Vec<&str> = turn.text.split('\n').take(count - remaining).collect();
                self.alter_quiet(&turn.id, &kept.join("\n")).await?;
                remaining = 0;
            }
            tracing::debug!(turn_id = %turn.id, remaining, "Rolled back turn");
        }

        self.refresh().await;
        Ok(())
    }

    /// Recompute both transcript views from the current history
    pub async fn refresh(&mut self) {
        let canonical = self.history.canonical_text();
        let local = match self.translator.to_local(&canonical).await {
            Ok(local) => local,
            Err(e) => {
                tracing::warn!(
                    provider = self.translator.name(),
                    error = %e,
                    "Transcript translation failed, showing the original text"
                );
                canonical.clone()
            }
        };
        self.transcript = Transcript { canonical, local };
    }
}
