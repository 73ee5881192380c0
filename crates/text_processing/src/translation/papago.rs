//! Naver Papago neural machine translation

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;

use storyvoice_core::{Locale, Translator, PIVOT_LANGUAGE};

use crate::Result;

const CLIENT_ID_HEADER: &str = "X-Naver-Client-Id";
const CLIENT_SECRET_HEADER: &str = "X-Naver-Client-Secret";

pub struct PapagoTranslator {
    client: Client,
    endpoint: String,
    client_id: String,
    client_secret: String,
    local: String,
}

impl PapagoTranslator {
    pub fn new(
        endpoint: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        locale: &Locale,
    ) -> Result<Self> {
        Ok(Self {
            client: super::http_client()?,
            endpoint: endpoint.into(),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
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
            .header(CLIENT_ID_HEADER, &self.client_id)
            .header(CLIENT_SECRET_HEADER, &self.client_secret)
            .form(&[("source", source), ("target", target), ("text", text)])
            .send()
            .await?;

        // Papago reports most failures as a JSON body without the result
        // field, sometimes with a 4xx status. Both degrade to the source text.
        let status = response.status();
        let body = response.text().await?;
        match translated_text(&body) {
            Some(translated) => Ok(translated),
            None => {
                tracing::warn!(%status, %body, "Papago returned no translation, keeping source text");
                Ok(text.to_string())
            }
        }
    }
}

/// `message.result.translatedText`, if present
fn translated_text(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    value
        .pointer("/message/result/translatedText")
        .and_then(Value::as_str)
        .map(str::to_string)
}

#[async_trait]
impl Translator for PapagoTranslator {
    async fn to_local(&self, text: &str) -> storyvoice_core::Result<String> {
        Ok(self.translate(text, PIVOT_LANGUAGE, &self.local).await?)
    }

    async fn from_local(&self, text: &str) -> storyvoice_core::Result<String> {
        Ok(self.translate(text, &self.local, PIVOT_LANGUAGE).await?)
    }

    fn name(&self) -> &str {
        "papago"
    }
}
