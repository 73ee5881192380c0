//! Core traits for the storyvoice client
//!
//! Every external collaborator sits behind one of these traits so that
//! providers are chosen by configuration and tests can substitute fakes.
//!
//! ```text
//! Story backend:
//!   - StoryService: create / alter / continue / fetch / configure
//!
//! Text processing:
//!   - Translator: local language <-> pivot language
//!
//! Speech:
//!   - SpeechToText: capture and recognise one utterance
//!   - TextToSpeech: play synthesised speech
//! ```

mod speech;
mod story;
mod text_processing;

pub use speech::{SpeechToText, TextToSpeech};
pub use story::StoryService;
pub use text_processing::Translator;
