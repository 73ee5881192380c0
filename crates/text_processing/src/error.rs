use thiserror::Error;

#[derive(Error, Debug)]
pub enum TextProcessingError {
    #[error("Translation request failed: {0}")]
    Request(String),

    #[error("Translation service returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Unexpected translation response: {0}")]
    InvalidResponse(String),

    #[error("Translator configuration error: {0}")]
    Configuration(String),
}

impl From<reqwest::Error> for TextProcessingError {
    fn from(err: reqwest::Error) -> Self {
        TextProcessingError::Request(err.to_string())
    }
}

impl From<TextProcessingError> for storyvoice_core::Error {
    fn from(err: TextProcessingError) -> Self {
        storyvoice_core::Error::Translation(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, TextProcessingError>;
