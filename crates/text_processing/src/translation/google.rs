//! Public Google Translate endpoint

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;

use storyvoice_core::{Locale, Translator, PIVOT_LANGUAGE};

use crate::{Result, TextProcessingError};

/// Translator backed by the keyless `translate_a/single` endpoint
pub struct GoogleTranslator {
    client: Client,
    endpoint: String,
    local: String,
}

impl GoogleTranslator {
    pub fn new(endpoint: impl Into<String>, locale: &Locale) -> Result<Self> {
        Ok(Self {
            client: super::http_client()?,
            endpoint: endpoint.into(),
            local: locale.language(),
        })
    }

    async fn translate(&self, text: &str, source: &str, target: &str) -> Result<String> {
        if text.trim().is_empty() {
            return Ok(String::new());
        }

        let response = self
            .client
            .post(&self.endpoint)
            .query(&[("client", "gtx"), ("sl", source), ("tl", target), ("dt", "t")])
            .form(&[("q", text)])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TextProcessingError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| TextProcessingError::InvalidResponse(e.to_string()))?;
        let translated = join_segments(&body)?;

        tracing::debug!(source, target, chars = text.len(), "Translated text");
        Ok(translated)
    }
}

/// The body is `[[["translated", "source", ...], ...], ...]`; the first
/// element of every segment is concatenated.
fn join_segments(body: &Value) -> Result<String> {
    let segments = body
        .get(0)
        .and_then(Value::as_array)
        .ok_or_else(|| TextProcessingError::InvalidResponse("missing segment list".to_string()))?;

    Ok(segments
        .iter()
        .filter_map(|segment| segment.get(0).and_then(Value::as_str))
        .collect())
}

#[async_trait]
impl Translator for GoogleTranslator {
    async fn to_local(&self, text: &str) -> storyvoice_core::Result<String> {
        Ok(self.translate(text, PIVOT_LANGUAGE, &self.local).await?)
    }

    async fn from_local(&self, text: &str) -> storyvoice_core::Result<String> {
        Ok(self.translate(text, "auto", PIVOT_LANGUAGE).await?)
    }

    fn name(&self) -> &str {
        "google"
    }
}
