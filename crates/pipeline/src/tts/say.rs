//! The `say` command

use async_trait::async_trait;
use tokio::process::Command;

use storyvoice_core::TextToSpeech;

use crate::PipelineError;

pub struct SayTts {
    voice: Option<String>,
}

impl SayTts {
    pub fn new(voice: Option<String>) -> Self {
        Self { voice }
    }

    fn args(&self, text: &str) -> Vec<String> {
        let mut args = Vec::with_capacity(3);
        if let Some(voice) = &self.voice {
            args.push("-v".to_string());
            args.push(voice.clone());
        }
        args.push(text.to_string());
        args
    }
}

#[async_trait]
impl TextToSpeech for SayTts {
    async fn speak(&self, text: &str) -> storyvoice_core::Result<()> {
        if text.trim().is_empty() {
            return Ok(());
        }

        let status = Command::new("say")
            .args(self.args(text))
            .status()
            .await
            .map_err(|e| PipelineError::Synthesis(format!("Failed to run `say`: {}", e)))?;

        if !status.success() {
            return Err(PipelineError::Synthesis(format!("`say` exited with {}", status)).into());
        }
        Ok(())
    }

    fn model_name(&self) -> &str {
        "say"
    }
}
