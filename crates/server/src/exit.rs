//! Exit messages and codes

use storyvoice_agent::SessionError;
use storyvoice_core::StoryError;

pub const EXIT_OK: i32 = 0;
pub const EXIT_FATAL: i32 = 1;
pub const EXIT_CONFIG: i32 = 2;

/// How an interactive session ended without an error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Farewell {
    /// `/quit`
    Quit,
    /// Ctrl-C or end of input
    Interrupted,
}

impl Farewell {
    pub fn message(&self) -> &'static str {
        match self {
            Farewell::Quit => "Bye Bye!",
            Farewell::Interrupted => "Received Keyboard Interrupt. Bye Bye...",
        }
    }
}

/// Lines shown to the user before exiting on a session-fatal error
pub fn fatal_report(err: &SessionError) -> Vec<String> {
    match err {
        SessionError::Fatal(StoryError::TooManyRedirects) => vec![
            "Exceeded max allowed number of HTTP redirects, API backend has probably changed"
                .to_string(),
        ],
        SessionError::Fatal(StoryError::ConnectionLost(_)) => {
            vec!["Lost connection to the story servers".to_string()]
        }
        SessionError::Fatal(
            StoryError::Transport(detail)
            | StoryError::Malformed(detail)
            | StoryError::Rejected(detail),
        ) => vec![
            "Unexpected response from API backend:".to_string(),
            detail.clone(),
        ],
        other => vec![
            "Totally unexpected exception:".to_string(),
            other.to_string(),
        ],
    }
}
