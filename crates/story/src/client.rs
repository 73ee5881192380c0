//! GraphQL-over-HTTP story client

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::{redirect, Client};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};

use storyvoice_config::StoryServiceConfig;
use storyvoice_core::{Adventure, AdventureId, StoryError, StoryModel, StoryService, Turn};

use crate::queries::{
    self, AlterData, ContentData, CreateData, GraphqlResponse, ALTER_ACTION, CREATE_ADVENTURE,
    FETCH_CONTENT, SEND_ACTION, UPDATE_SETTINGS,
};

const ACCESS_TOKEN_HEADER: &str = "X-Access-Token";

/// Client configuration
#[derive(Debug, Clone)]
pub struct StoryClientConfig {
    pub endpoint: String,
    pub auth_token: String,
    pub timeout: Duration,
    pub max_redirects: usize,
}

impl StoryClientConfig {
    pub fn from_settings(config: &StoryServiceConfig, auth_token: impl Into<String>) -> Self {
        Self {
            endpoint: config.endpoint.clone(),
            auth_token: auth_token.into(),
            timeout: Duration::from_secs(config.timeout_secs),
            max_redirects: config.max_redirects,
        }
    }
}

/// Story service reached through the GraphQL HTTP endpoint
///
/// Every call is a single request. Nothing is retried here; whether a
/// failure is worth repeating is decided by the session.
pub struct GraphqlStoryClient {
    client: Client,
    endpoint: String,
}

impl GraphqlStoryClient {
    pub fn new(config: StoryClientConfig) -> Result<Self, StoryError> {
        let mut headers = HeaderMap::new();
        let token = HeaderValue::from_str(config.auth_token.trim())
            .map_err(|e| StoryError::Transport(format!("Invalid access token: {}", e)))?;
        headers.insert(ACCESS_TOKEN_HEADER, token);

        let client = Client::builder()
            .timeout(config.timeout)
            .redirect(redirect::Policy::limited(config.max_redirects))
            .default_headers(headers)
            .build()
            .map_err(|e| StoryError::Transport(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            endpoint: config.endpoint,
        })
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        query: &str,
        variables: Value,
    ) -> Result<T, StoryError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&json!({ "query": query, "variables": variables }))
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(StoryError::Transport(format!("HTTP {}: {}", status, body)));
        }

        let envelope: GraphqlResponse<T> = response
            .json()
            .await
            .map_err(|e| StoryError::Malformed(e.to_string()))?;

        if !envelope.errors.is_empty() {
            let message = envelope
                .errors
                .iter()
                .map(|e| e.message.as_str())
                .collect::<Vec<_>>()
                .join("; ");
            tracing::debug!(%message, "Story service rejected query");
            return Err(StoryError::Rejected(message));
        }

        envelope
            .data
            .ok_or_else(|| StoryError::Malformed("response carries no data".to_string()))
    }
}

/// Classify a transport failure
pub(crate) fn map_reqwest_error(err: reqwest::Error) -> StoryError {
    if err.is_timeout() {
        StoryError::Timeout
    } else if err.is_redirect() {
        StoryError::TooManyRedirects
    } else if err.is_connect() {
        StoryError::ConnectionLost(err.to_string())
    } else if err.is_decode() {
        StoryError::Malformed(err.to_string())
    } else {
        StoryError::Transport(err.to_string())
    }
}

#[async_trait]
impl StoryService for GraphqlStoryClient {
    async fn create(&self, scenario_id: &str, seed_text: &str) -> Result<Adventure, StoryError> {
        let data: CreateData = self
            .execute(
                CREATE_ADVENTURE,
                json!({ "id": scenario_id, "prompt": seed_text }),
            )
            .await?;
        let created = data.create_adventure_from_scenario_id;
        tracing::info!(adventure = %created.id, "Created adventure");

        Ok(Adventure {
            id: AdventureId::new(created.id),
            turns: created
                .history_list
                .map(queries::into_turns)
                .unwrap_or_default(),
        })
    }

    async fn alter(
        &self,
        adventure: &AdventureId,
        turn_id: &str,
        text: &str,
    ) -> Result<Vec<Turn>, StoryError> {
        let data: AlterData = self
            .execute(
                ALTER_ACTION,
                json!({
                    "input": {
                        "type": "alter",
                        "id": adventure.as_str(),
                        "actionId": turn_id,
                        "text": text,
                    }
                }),
            )
            .await?;
        Ok(queries::into_turns(data.do_alter_action.actions))
    }

    async fn send_action(&self, adventure: &AdventureId, text: &str) -> Result<(), StoryError> {
        let _: Value = self
            .execute(
                SEND_ACTION,
                json!({
                    "input": {
                        "type": "story",
                        "id": adventure.as_str(),
                        "text": text,
                    }
                }),
            )
            .await?;
        Ok(())
    }

    async fn fetch(&self, adventure: &AdventureId) -> Result<Vec<Turn>, StoryError> {
        let data: ContentData = self
            .execute(FETCH_CONTENT, json!({ "id": adventure.as_str() }))
            .await?;
        Ok(queries::into_turns(data.content.actions))
    }

    async fn configure(
        &self,
        adventure: &AdventureId,
        temperature: f32,
        model: StoryModel,
    ) -> Result<(), StoryError> {
        let _: Value = self
            .execute(
                UPDATE_SETTINGS,
                json!({
                    "input": {
                        "id": adventure.as_str(),
                        "temperature": temperature,
                        "modelType": model.api_name(),
                    }
                }),
            )
            .await?;
        tracing::debug!(%adventure, temperature, model = model.api_name(), "Updated generation settings");
        Ok(())
    }

    fn name(&self) -> &str {
        "graphql"
    }
}
