//! Guided question/answer turn

use super::StorySession;
use crate::SessionError;

/// Answer given by the agent actor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QaAnswer {
    /// Answer text in the pivot language
    pub pivot: String,
    /// Answer text in the local language
    pub local: String,
    /// False when polling ran out while the answer was still being generated
    pub complete: bool,
}

/// Position of the first agent line among the new lines
fn first_agent_line(lines: &[&str], agent: &str) -> Option<usize> {
    lines.iter().position(|l| l.starts_with(agent))
}

/// Text after the first `:` of a labelled line
fn spoken_text(line: &str) -> String {
    line.split_once(':')
        .map(|(_, text)| text)
        .unwrap_or(line)
        .trim()
        .to_string()
}

impl StorySession {
    /// Local-language answer, or the pivot text when translation fails
    async fn answer_in_local(&self, pivot: &str) -> String {
        match self.translator.to_local(pivot).await {
            Ok(local) => local,
            Err(e) => {
                tracing::warn!(error = %e, "Answer translation failed, using pivot text");
                pivot.to_string()
            }
        }
    }

    /// Ask the agent actor a question in the local language
    ///
    /// The question is sent as `"{user}: {question}"` and the story is nudged
    /// until an agent line is followed by at least one more line. Everything
    /// after the answer line is then rolled back. `Ok(None)` means no agent
    /// line appeared within the attempt bound.
    pub async fn ask(&mut self, question: &str) -> Result<Option<QaAnswer>, SessionError> {
        self.expect_interactive()?;
        let actors = self.actors.clone().ok_or(SessionError::ActorsUnavailable)?;

        let question = self.translator.from_local(question).await?;
        let prev_lines = self.transcript.canonical_lines().len();
        self.submit_pivot(&format!("{}: {}", actors.user, question)).await?;
        self.refresh().await;

        let max = self.config.qa_attempts;
        let mut attempt = 0;
        loop {
            let lines = self.transcript.canonical_lines();
            let new_lines = lines.get(prev_lines..).unwrap_or_default();

            if let Some(i) = first_agent_line(new_lines, &actors.agent) {
                if i + 1 < new_lines.len() {
                    let pivot = spoken_text(new_lines[i]);
                    let discard = (new_lines.len() - i - 1) as i64;
                    tracing::info!(attempt, discard, "Agent answered");

                    let local = self.answer_in_local(&pivot).await;
                    self.rollback(discard).await?;
                    return Ok(Some(QaAnswer {
                        pivot,
                        local,
                        complete: true,
                    }));
                }
            }

            if attempt == max {
                let partial =
                    first_agent_line(new_lines, &actors.agent).map(|i| spoken_text(new_lines[i]));
                tracing::warn!(attempts = max, partial = partial.is_some(), "No complete answer");
                return match partial {
                    Some(pivot) => {
                        let local = self.answer_in_local(&pivot).await;
                        Ok(Some(QaAnswer {
                            pivot,
                            local,
                            complete: false,
                        }))
                    }
                    None => Ok(None),
                };
            }
            attempt += 1;

            match self.submit_pivot("").await {
                Ok(()) => self.refresh().await,
                Err(e) if e.is_transient() => {
                    tracing::warn!(attempt, error = %e, "Nudge got no answer");
                }
                Err(e) => return Err(e),
            }
        }
    }
}
