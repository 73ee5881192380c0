//! Remote story service
//!
//! `GraphqlStoryClient` speaks the adventure GraphQL API: creating an
//! adventure from a scenario, altering a turn, sending an action, fetching
//! the turn list and updating generation settings.

pub mod client;
pub mod queries;

pub use client::{GraphqlStoryClient, StoryClientConfig};

use std::sync::Arc;

use storyvoice_config::Settings;
use storyvoice_core::{StoryError, StoryService};

/// Build the story service described by the settings
pub fn create_story_service(settings: &Settings) -> Result<Arc<dyn StoryService>, StoryError> {
    let token = settings.auth_token.clone().unwrap_or_default();
    let client = GraphqlStoryClient::new(StoryClientConfig::from_settings(&settings.story, token))?;
    tracing::info!(endpoint = %settings.story.endpoint, "Using GraphQL story service");
    Ok(Arc::new(client))
}
