//! Remote story service interface

use async_trait::async_trait;

use crate::{Adventure, AdventureId, StoryError, StoryModel, Turn};

/// Remote story-generation backend
///
/// Implementations return raw turn lists; the caller owns the history and
/// replaces it wholesale with whatever comes back.
#[async_trait]
pub trait StoryService: Send + Sync + 'static {
    /// Start a new adventure from a scenario with the given seed text
    async fn create(&self, scenario_id: &str, seed_text: &str) -> Result<Adventure, StoryError>;

    /// Replace the full text of an existing turn, returning the
    /// post-alter turn list
    async fn alter(
        &self,
        adventure: &AdventureId,
        turn_id: &str,
        text: &str,
    ) -> Result<Vec<Turn>, StoryError>;

    /// Submit a new story action. Only acknowledges; use `fetch` for turns.
    async fn send_action(&self, adventure: &AdventureId, text: &str) -> Result<(), StoryError>;

    /// Fetch the full turn list of an adventure
    async fn fetch(&self, adventure: &AdventureId) -> Result<Vec<Turn>, StoryError>;

    /// Set generation parameters for an adventure
    async fn configure(
        &self,
        adventure: &AdventureId,
        temperature: f32,
        model: StoryModel,
    ) -> Result<(), StoryError>;

    /// Backend name for logging
    fn name(&self) -> &str;
}
