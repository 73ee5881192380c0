//! Session lifecycle states

use std::fmt;

/// Lifecycle of a story session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    /// No adventure exists yet
    #[default]
    Uninitialized,
    /// Adventure exists; the first reply may still be generating
    Created,
    /// The rest of the scene has been merged into the transcript
    Primed,
    /// Steady state: continue, rollback and questions
    Interactive,
}

impl SessionState {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionState::Uninitialized => "uninitialized",
            SessionState::Created => "created",
            SessionState::Primed => "primed",
            SessionState::Interactive => "interactive",
        }
    }

    /// An adventure exists and its turns may be edited
    pub fn has_adventure(&self) -> bool {
        !matches!(self, SessionState::Uninitialized)
    }

    pub fn accepts_turns(&self) -> bool {
        matches!(self, SessionState::Primed | SessionState::Interactive)
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
