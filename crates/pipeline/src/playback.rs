//! Audio playback through the SoX `play` command

use std::process::Stdio;

use tokio::io::AsyncWriteExt;
use tokio::process::Command;

use crate::PipelineError;

const PLAYER: &str = "play";

/// Pipe an encoded clip (`wav`, `mp3`, ...) into `play -t <kind> -`
pub async fn play_clip(clip: Vec<u8>, kind: &str) -> Result<(), PipelineError> {
    let mut child = Command::new(PLAYER)
        .args(["-q", "-t", kind, "-"])
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .kill_on_drop(true)
        .spawn()
        .map_err(|e| PipelineError::Playback(format!("Failed to start `{}`: {}", PLAYER, e)))?;

    if let Some(mut stdin) = child.stdin.take() {
        stdin.write_all(&clip).await?;
        stdin.shutdown().await?;
    }

    let status = child.wait().await?;
    if !status.success() {
        return Err(PipelineError::Playback(format!(
            "`{}` exited with {}",
            PLAYER, status
        )));
    }
    Ok(())
}
