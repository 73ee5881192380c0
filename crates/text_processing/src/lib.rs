//! Translation between the user's language and the story language
//!
//! All story generation happens in English. These adapters move text across
//! that boundary in both directions:
//! - **Google**: public `translate_a/single` endpoint
//! - **Papago**: Naver n2mt API with client credentials
//! - **Noop**: identity, used for English locales and when disabled
//!
//! # Example
//!
//! ```ignore
//! use storyvoice_text_processing::create_translator;
//!
//! let translator = create_translator(&settings.translation.backend()?, &settings.locale)?;
//! let english = translator.from_local("용이 깨어난다").await?;
//! ```

pub mod translation;

mod error;

pub use error::{Result, TextProcessingError};
pub use translation::{create_translator, GoogleTranslator, NoopTranslator, PapagoTranslator};
