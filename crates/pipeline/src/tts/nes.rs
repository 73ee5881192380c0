//! Self-hosted synthesiser
//!
//! `GET {url}/synthesize?...` answers with the path of a rendered MP3 clip,
//! which is then fetched from `{url}{path}` and played.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use storyvoice_core::TextToSpeech;

use crate::playback::play_clip;
use crate::PipelineError;

pub struct NesTts {
    client: Client,
    url: String,
    speaker: String,
}

impl NesTts {
    pub fn new(url: impl Into<String>, speaker: impl Into<String>) -> Result<Self, PipelineError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| PipelineError::Synthesis(format!("Failed to create HTTP client: {}", e)))?;
        Ok(Self {
            client,
            url: url.into().trim_end_matches('/').to_string(),
            speaker: speaker.into(),
        })
    }

    /// Render `text` and download the clip
    pub async fn fetch_clip(&self, text: &str) -> Result<Vec<u8>, PipelineError> {
        let response = self
            .client
            .get(format!("{}/synthesize", self.url))
            .query(&[
                ("speaker", self.speaker.as_str()),
                ("text", text),
                ("emotion", "0"),
                ("speed", "0"),
                ("pitch", "0"),
                ("volume", "0"),
                ("format", "mp3"),
                ("use_cache", "false"),
            ])
            .send()
            .await
            .map_err(|e| PipelineError::Synthesis(e.to_string()))?;
        if !response.status().is_success() {
            return Err(PipelineError::Synthesis(format!(
                "synthesize returned HTTP {}",
                response.status()
            )));
        }
        let path = response
            .text()
            .await
            .map_err(|e| PipelineError::Synthesis(e.to_string()))?;
        let path = path.trim();
        if path.is_empty() {
            return Err(PipelineError::Synthesis("synthesize returned no clip path".to_string()));
        }

        let clip = self
            .client
            .get(format!("{}{}", self.url, path))
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| PipelineError::Synthesis(format!("Failed to fetch clip: {}", e)))?
            .bytes()
            .await
            .map_err(|e| PipelineError::Synthesis(e.to_string()))?;

        tracing::debug!(bytes = clip.len(), %path, "Fetched synthesized clip");
        Ok(clip.to_vec())
    }
}

#[async_trait]
impl TextToSpeech for NesTts {
    async fn speak(&self, text: &str) -> storyvoice_core::Result<()> {
        if text.trim().is_empty() {
            return Ok(());
        }
        let clip = self.fetch_clip(text).await?;
        play_clip(clip, "mp3").await?;
        Ok(())
    }

    fn model_name(&self) -> &str {
        "nes"
    }
}
