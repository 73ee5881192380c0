//! Storyvoice Server
//!
//! The `storyvoice` binary: command-line parsing, the interactive voice
//! story loop and the HTTP surface of the chat bridge.

pub mod cli;
pub mod exit;
pub mod http;
pub mod interactive;
pub mod io;
pub mod services;

pub use cli::Cli;
pub use exit::{fatal_report, Farewell};
pub use http::create_router;
pub use interactive::run_interactive;
pub use io::{Input, TermIo, UserIo};
pub use services::Services;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

use storyvoice_agent::SessionError;

/// Server errors
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error("Input error: {0}")]
    Input(String),
}

impl From<&ServerError> for StatusCode {
    fn from(err: &ServerError) -> Self {
        match err {
            ServerError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            ServerError::Session(e) => match e {
                SessionError::Transient(_) => StatusCode::SERVICE_UNAVAILABLE,
                SessionError::NoScene
                | SessionError::ActorsUnavailable
                | SessionError::InvalidState { .. } => StatusCode::CONFLICT,
                SessionError::Fatal(_)
                | SessionError::FirstGenerationTimeout { .. }
                | SessionError::NoTurns
                | SessionError::Translation(_)
                | SessionError::Speech(_) => StatusCode::BAD_GATEWAY,
            },
            ServerError::Input(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = StatusCode::from(&self);
        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        }
        (status, Json(serde_json::json!({ "error": self.to_string() }))).into_response()
    }
}
