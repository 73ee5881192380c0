//! Text processing traits

use async_trait::async_trait;

use crate::Result;

/// Bidirectional translator between the local language and the pivot language
///
/// Implementations must return an empty string for blank input without
/// calling out to the network.
///
/// # Example
///
/// ```ignore
/// let translator: Arc<dyn Translator> = create_translator(&backend, &locale);
/// let english = translator.from_local("안녕하세요").await?;
/// let korean = translator.to_local(&english).await?;
/// ```
#[async_trait]
pub trait Translator: Send + Sync + 'static {
    /// Pivot language -> local language
    async fn to_local(&self, text: &str) -> Result<String>;

    /// Local language -> pivot language
    async fn from_local(&self, text: &str) -> Result<String>;

    /// Provider name for logging
    fn name(&self) -> &str;

    /// True when both directions return their input unchanged
    fn is_identity(&self) -> bool {
        false
    }
}
