//! Story session engine
//!
//! Features:
//! - Session state machine over a remote, editable transcript
//!   (create, await first reply, prime, continue, rollback)
//! - Actor resolution: which recurring speaker label is the user
//! - Guided question/answer turns
//! - Interactive command parsing
//! - Chat bridge with one serialized session per conversation key

pub mod actors;
pub mod bridge;
pub mod commands;
pub mod session;

pub use actors::{resolve_actors, Actors};
pub use bridge::Bridge;
pub use commands::Command;
pub use session::{QaAnswer, SessionState, StorySession, Transcript};

use storyvoice_core::StoryError;
use thiserror::Error;

/// Session errors
#[derive(Error, Debug)]
pub enum SessionError {
    /// The story service did not answer this time; nothing changed locally
    #[error("The story service did not answer, try again ({0})")]
    Transient(StoryError),

    #[error("Story service failure: {0}")]
    Fatal(StoryError),

    #[error("No reply from the story service after {attempts} attempts")]
    FirstGenerationTimeout { attempts: u32 },

    #[error("Session is {actual}, operation needs {expected}")]
    InvalidState {
        expected: &'static str,
        actual: SessionState,
    },

    #[error("No actors were detected in this story")]
    ActorsUnavailable,

    #[error("The story has no turns")]
    NoTurns,

    #[error("No scene to start the story from")]
    NoScene,

    #[error("Translation error: {0}")]
    Translation(String),

    #[error("Speech error: {0}")]
    Speech(String),
}

impl SessionError {
    /// Story failure during steady-state interaction
    pub(crate) fn from_interaction(err: StoryError) -> Self {
        if err.is_transient() {
            SessionError::Transient(err)
        } else {
            SessionError::Fatal(err)
        }
    }

    pub fn is_transient(&self) -> bool {
        matches!(self, SessionError::Transient(_))
    }

    /// Errors that leave the session unusable
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            SessionError::Fatal(_) | SessionError::FirstGenerationTimeout { .. }
        )
    }
}

impl From<storyvoice_core::Error> for SessionError {
    fn from(err: storyvoice_core::Error) -> Self {
        match err {
            storyvoice_core::Error::Story(e) => SessionError::Fatal(e),
            storyvoice_core::Error::Speech(m) => SessionError::Speech(m),
            other => SessionError::Translation(other.to_string()),
        }
    }
}
