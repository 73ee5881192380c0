//! Story types: adventures, turns and the transcript history

use serde::{Deserialize, Serialize};
use std::fmt;

/// Remote-assigned identifier of an adventure
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AdventureId(String);

impl AdventureId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AdventureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One story action. The id is assigned by the remote service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub id: String,
    pub text: String,
}

impl Turn {
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
        }
    }

    /// Number of newline-delimited lines; an empty text still counts as one line.
    pub fn line_count(&self) -> usize {
        self.text.split('\n').count()
    }
}

/// Result of creating an adventure
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Adventure {
    pub id: AdventureId,
    /// Turns known at creation time, possibly empty
    pub turns: Vec<Turn>,
}

/// Ordered turn list, replaced wholesale after every mutating call
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct History {
    turns: Vec<Turn>,
}

impl History {
    pub fn new(turns: Vec<Turn>) -> Self {
        Self { turns }
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn last(&self) -> Option<&Turn> {
        self.turns.last()
    }

    /// Concatenation of every turn's text in order
    pub fn canonical_text(&self) -> String {
        self.turns.iter().map(|t| t.text.as_str()).collect()
    }

    /// Replace the full turn list with the server's authoritative copy
    pub fn replace(&mut self, turns: Vec<Turn>) {
        self.turns = turns;
    }
}

impl From<Vec<Turn>> for History {
    fn from(turns: Vec<Turn>) -> Self {
        Self::new(turns)
    }
}

/// Generation model offered by the story backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoryModel {
    /// GPT-2 class model
    Classic,
    /// GPT-3 class model
    #[default]
    Dragon,
}

impl StoryModel {
    /// Map the `--gpt` major version used on the command line
    pub fn from_gpt_version(version: u8) -> Option<Self> {
        match version {
            2 => Some(StoryModel::Classic),
            3 => Some(StoryModel::Dragon),
            _ => None,
        }
    }

    /// Name the backend expects in settings mutations
    pub fn api_name(&self) -> &'static str {
        match self {
            StoryModel::Classic => "griffin",
            StoryModel::Dragon => "dragon",
        }
    }
}
