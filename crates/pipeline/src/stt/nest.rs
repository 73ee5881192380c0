//! Self-hosted recogniser: multipart WAV upload, `{"text": ...}` reply

use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::Deserialize;

use super::Recognizer;
use crate::PipelineError;

#[derive(Debug, Deserialize)]
struct NestResponse {
    #[serde(default)]
    text: Option<String>,
}

pub struct NestRecognizer {
    client: Client,
    url: String,
}

impl NestRecognizer {
    pub fn new(url: impl Into<String>) -> Result<Self, PipelineError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| PipelineError::Recognition(format!("Failed to create HTTP client: {}", e)))?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }
}

#[async_trait]
impl Recognizer for NestRecognizer {
    async fn recognize(&self, wav: &[u8]) -> Result<Option<String>, PipelineError> {
        let part = Part::bytes(wav.to_vec())
            .file_name("audio.wav")
            .mime_str("audio/wav")?;
        let form = Form::new().part("audio", part);

        let response = self.client.post(&self.url).multipart(form).send().await?;
        let status = response.status();
        if !status.is_success() {
            let error = response.text().await.unwrap_or_default();
            return Err(PipelineError::Recognition(format!("HTTP {}: {}", status, error)));
        }

        let parsed: NestResponse = response
            .json()
            .await
            .map_err(|e| PipelineError::Recognition(format!("Invalid response: {}", e)))?;
        Ok(parsed
            .text
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty()))
    }

    fn name(&self) -> &str {
        "nest"
    }
}
