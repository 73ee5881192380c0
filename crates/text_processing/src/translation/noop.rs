use async_trait::async_trait;
use storyvoice_core::{Result, Translator};

/// Pass-through translator
#[derive(Debug, Default)]
pub struct NoopTranslator;

impl NoopTranslator {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Translator for NoopTranslator {
    async fn to_local(&self, text: &str) -> Result<String> {
        Ok(text.to_string())
    }

    async fn from_local(&self, text: &str) -> Result<String> {
        Ok(text.to_string())
    }

    fn name(&self) -> &str {
        "noop"
    }

    fn is_identity(&self) -> bool {
        true
    }
}
