//! Chat bridge
//!
//! Maps external conversation keys to independent story sessions. Each key
//! has its own async mutex, so messages for one key run one at a time while
//! different keys proceed concurrently.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use tokio::sync::Mutex;

use storyvoice_config::SessionConfig;
use storyvoice_core::{StoryService, Translator};

use crate::session::StorySession;
use crate::SessionError;

const RESET_COMMAND: &str = "/reset";

type SessionSlot = Arc<Mutex<Option<StorySession>>>;

/// Scene text of a `/reset[ scene]` message, empty when none is given
fn reset_scene(text: &str) -> Option<&str> {
    let rest = text.strip_prefix(RESET_COMMAND)?;
    (rest.is_empty() || rest.starts_with(char::is_whitespace)).then(|| rest.trim())
}

/// Session-per-key front end for chat integrations
pub struct Bridge {
    story: Arc<dyn StoryService>,
    translator: Arc<dyn Translator>,
    config: SessionConfig,
    default_scene: Option<String>,
    sessions: RwLock<HashMap<String, SessionSlot>>,
}

impl Bridge {
    /// `default_scene` is pivot-language text used when a key starts
    /// without an explicit scene
    pub fn new(
        story: Arc<dyn StoryService>,
        translator: Arc<dyn Translator>,
        config: SessionConfig,
        default_scene: Option<String>,
    ) -> Self {
        Self {
            story,
            translator,
            config,
            default_scene,
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Number of conversations currently held
    pub fn session_count(&self) -> usize {
        self.sessions.read().len()
    }

    /// Forget a conversation; its next message starts a new session
    ///
    /// A message already in flight for the key finishes on the old session.
    pub fn remove(&self, source: &str) -> bool {
        let removed = self.sessions.write().remove(source).is_some();
        if removed {
            tracing::info!(source, "Bridge session removed");
        }
        removed
    }

    fn slot(&self, source: &str) -> SessionSlot {
        if let Some(slot) = self.sessions.read().get(source) {
            return slot.clone();
        }
        self.sessions
            .write()
            .entry(source.to_string())
            .or_default()
            .clone()
    }

    /// Handle one message from a conversation and produce the reply text
    pub async fn ask(&self, source: &str, text: &str) -> Result<String, SessionError> {
        let slot = self.slot(source);
        let mut guard = slot.lock().await;

        if let Some(scene) = reset_scene(text) {
            let scene = if scene.is_empty() {
                self.default_scene.clone().ok_or(SessionError::NoScene)?
            } else {
                self.translator.from_local(scene).await?
            };
            // A failed restart leaves the key without a session
            *guard = None;
            let session = self.start(&scene).await?;
            tracing::info!(source, "Bridge session reset");
            let reply = session.transcript().local.clone();
            *guard = Some(session);
            return Ok(reply);
        }

        let mut session = match guard.take() {
            Some(session) => session,
            None => {
                let scene = self.default_scene.clone().ok_or(SessionError::NoScene)?;
                tracing::info!(source, "Starting bridge session");
                self.start(&scene).await?
            }
        };

        let reply = Self::reply(&mut session, text).await;
        match &reply {
            Err(e) if e.is_fatal() => {
                tracing::warn!(source, error = %e, "Dropping broken bridge session");
            }
            _ => *guard = Some(session),
        }
        reply
    }

    async fn reply(session: &mut StorySession, text: &str) -> Result<String, SessionError> {
        if session.actors().is_some() {
            let answer = session.ask(text).await?;
            return Ok(answer.map(|a| a.local).unwrap_or_default());
        }

        let before = session.transcript().local_lines().len();
        let last_line = session.transcript().local_tail(1);
        session.continue_story(text).await?;

        // Include the previous last line when the continuation extended it
        let transcript = session.transcript();
        let extended = transcript
            .local_lines()
            .get(before.saturating_sub(1))
            .is_some_and(|line| *line != last_line);
        let from = if extended { before - 1 } else { before };
        Ok(transcript.local_from(from).trim().to_string())
    }

    async fn start(&self, scene: &str) -> Result<StorySession, SessionError> {
        let mut session = StorySession::new(
            self.story.clone(),
            self.translator.clone(),
            self.config.clone(),
        );
        session.start(scene).await?;
        Ok(session)
    }
}
