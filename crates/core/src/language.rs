//! Locale handling
//!
//! All generation happens in the pivot language (English). A locale such as
//! `ko-KR` names the language the user speaks and reads; its primary subtag
//! is what translation providers expect.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::Error;

/// Language all remote generation is conducted in
pub const PIVOT_LANGUAGE: &str = "en";

/// A BCP-47 style locale tag, e.g. `ko-KR` or `en`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Locale {
    tag: String,
}

impl Locale {
    pub fn new(tag: impl Into<String>) -> Result<Self, Error> {
        let tag = tag.into();
        let trimmed = tag.trim();
        if trimmed.is_empty() {
            return Err(Error::Config("locale must not be empty".to_string()));
        }
        if !trimmed
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(Error::Config(format!("invalid locale tag: {trimmed}")));
        }
        Ok(Self {
            tag: trimmed.replace('_', "-"),
        })
    }

    /// Pivot-language locale
    pub fn pivot() -> Self {
        Self {
            tag: PIVOT_LANGUAGE.to_string(),
        }
    }

    /// Full tag as given (`ko-KR`)
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Primary language subtag, lowercased (`ko`)
    pub fn language(&self) -> String {
        self.tag
            .split('-')
            .next()
            .unwrap_or(PIVOT_LANGUAGE)
            .to_ascii_lowercase()
    }

    pub fn is_pivot(&self) -> bool {
        self.language() == PIVOT_LANGUAGE
    }
}

impl Default for Locale {
    fn default() -> Self {
        Self {
            tag: "ko-KR".to_string(),
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.tag)
    }
}

impl FromStr for Locale {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Locale::new(s)
    }
}

impl TryFrom<String> for Locale {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Locale::new(value)
    }
}

impl From<Locale> for String {
    fn from(locale: Locale) -> Self {
        locale.tag
    }
}
