//! Google Cloud Speech-to-Text (v1 `speech:recognize`)

use std::time::Duration;

use async_trait::async_trait;
use base64::Engine;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;

use storyvoice_core::Locale;

use super::Recognizer;
use crate::audio::TARGET_SAMPLE_RATE;
use crate::PipelineError;

#[derive(Debug, Deserialize)]
struct RecognizeResponse {
    #[serde(default)]
    results: Vec<RecognitionResult>,
}

#[derive(Debug, Deserialize)]
struct RecognitionResult {
    #[serde(default)]
    alternatives: Vec<Alternative>,
}

#[derive(Debug, Deserialize)]
struct Alternative {
    #[serde(default)]
    transcript: String,
}

pub struct GoogleRecognizer {
    client: Client,
    endpoint: String,
    api_key: String,
    language_code: String,
}

impl GoogleRecognizer {
    pub fn new(
        endpoint: impl Into<String>,
        api_key: impl Into<String>,
        locale: &Locale,
    ) -> Result<Self, PipelineError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| PipelineError::Recognition(format!("Failed to create HTTP client: {}", e)))?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
            api_key: api_key.into(),
            language_code: locale.tag().to_string(),
        })
    }
}

/// Best alternative of every result, in order
fn transcript(response: RecognizeResponse) -> Option<String> {
    let text: String = response
        .results
        .into_iter()
        .filter_map(|r| r.alternatives.into_iter().next())
        .map(|a| a.transcript)
        .collect();
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}

#[async_trait]
impl Recognizer for GoogleRecognizer {
    async fn recognize(&self, wav: &[u8]) -> Result<Option<String>, PipelineError> {
        let body = json!({
            "config": {
                "encoding": "LINEAR16",
                "sampleRateHertz": TARGET_SAMPLE_RATE,
                "languageCode": self.language_code,
            },
            "audio": {
                "content": base64::engine::general_purpose::STANDARD.encode(wav),
            }
        });

        let response = self
            .client
            .post(&self.endpoint)
            .query(&[("key", &self.api_key)])
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error = response.text().await.unwrap_or_default();
            return Err(PipelineError::Recognition(format!("HTTP {}: {}", status, error)));
        }

        let parsed: RecognizeResponse = response
            .json()
            .await
            .map_err(|e| PipelineError::Recognition(format!("Invalid response: {}", e)))?;
        Ok(transcript(parsed))
    }

    fn name(&self) -> &str {
        "google"
    }
}
