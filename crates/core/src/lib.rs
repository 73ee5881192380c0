//! Core traits and types for the storyvoice client
//!
//! This crate provides the vocabulary shared by every other crate:
//! - Story types (adventures, turns, history)
//! - Locale handling around the English pivot language
//! - The error taxonomy for remote, translation and speech failures
//! - Traits for the pluggable collaborators (story backend, translator,
//!   speech recognition and synthesis)

pub mod error;
pub mod language;
pub mod story;
pub mod traits;

pub use error::{Error, Result, StoryError};
pub use language::{Locale, PIVOT_LANGUAGE};
pub use story::{Adventure, AdventureId, History, StoryModel, Turn};

pub use traits::{SpeechToText, StoryService, TextToSpeech, Translator};
