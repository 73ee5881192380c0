//! Error types shared across the workspace

use thiserror::Error;

/// Failures surfaced by the remote story service.
///
/// Each variant maps to a distinct handling decision: `Timeout` and
/// `Rejected` are transient while a session is interactive, everything else
/// ends the session.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoryError {
    #[error("Story service timed out")]
    Timeout,

    #[error("Story service rejected the query: {0}")]
    Rejected(String),

    #[error("Lost connection to the story service: {0}")]
    ConnectionLost(String),

    #[error("Exceeded max allowed number of HTTP redirects")]
    TooManyRedirects,

    #[error("Malformed response from story service: {0}")]
    Malformed(String),

    #[error("Transport error: {0}")]
    Transport(String),
}

impl StoryError {
    /// Whether the failure may succeed if the same call is issued again.
    pub fn is_transient(&self) -> bool {
        matches!(self, StoryError::Timeout | StoryError::Rejected(_))
    }
}

/// Workspace-wide error
#[derive(Error, Debug)]
pub enum Error {
    #[error("Story service error: {0}")]
    Story(#[from] StoryError),

    #[error("Translation error: {0}")]
    Translation(String),

    #[error("Speech error: {0}")]
    Speech(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, Error>;
