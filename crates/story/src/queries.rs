//! GraphQL documents and response shapes

use serde::Deserialize;

use storyvoice_core::Turn;

pub const CREATE_ADVENTURE: &str = r#"
mutation ($id: String, $prompt: String) {
  createAdventureFromScenarioId(id: $id, prompt: $prompt) {
    id
    historyList
  }
}"#;

pub const ALTER_ACTION: &str = r#"
mutation ($input: ContentActionInput) {
  doAlterAction(input: $input) {
    id
    actions { id text }
  }
}"#;

pub const SEND_ACTION: &str = r#"
mutation ($input: ContentActionInput) {
  sendAction(input: $input) {
    id
    actionLoading
  }
}"#;

pub const FETCH_CONTENT: &str = r#"
query ($id: String, $playPublicId: String) {
  content(id: $id, playPublicId: $playPublicId) {
    id
    actions { id text }
  }
}"#;

pub const UPDATE_SETTINGS: &str = r#"
mutation ($input: AdventureSettingsInput) {
  updateAdventureSettings(input: $input) {
    id
  }
}"#;

/// Standard GraphQL envelope
#[derive(Debug, Deserialize)]
pub struct GraphqlResponse<T> {
    pub data: Option<T>,
    #[serde(default)]
    pub errors: Vec<GraphqlError>,
}

#[derive(Debug, Deserialize)]
pub struct GraphqlError {
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct ActionDto {
    /// Ids arrive as strings or numbers depending on the backend version
    pub id: serde_json::Value,
    #[serde(default)]
    pub text: Option<String>,
}

impl From<ActionDto> for Turn {
    fn from(dto: ActionDto) -> Self {
        let id = match dto.id {
            serde_json::Value::String(s) => s,
            other => other.to_string(),
        };
        Turn::new(id, dto.text.unwrap_or_default())
    }
}

pub fn into_turns(actions: Vec<ActionDto>) -> Vec<Turn> {
    actions.into_iter().map(Turn::from).collect()
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateData {
    pub create_adventure_from_scenario_id: CreatedAdventure,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedAdventure {
    pub id: String,
    /// Absent for custom scenarios
    #[serde(default)]
    pub history_list: Option<Vec<ActionDto>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlterData {
    pub do_alter_action: ActionsHolder,
}

#[derive(Debug, Deserialize)]
pub struct ContentData {
    pub content: ActionsHolder,
}

#[derive(Debug, Deserialize)]
pub struct ActionsHolder {
    #[serde(default)]
    pub actions: Vec<ActionDto>,
}
