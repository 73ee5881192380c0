//! Actor resolution
//!
//! Guesses which recurring `label:` in a transcript is the player and which
//! is the character answering them. This is a best-effort heuristic over
//! speaker labels; a transcript with unusual naming can be misclassified.

/// Speaker labels of the two parties in a dialogue-style story
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actors {
    pub user: String,
    pub agent: String,
}

const AGENT_PREFIX: &str = "agent";
const USER_PREFIXES: [&str; 4] = ["user", "human", "input", "you"];

/// Label count plus the line index where it first appeared
struct LabelCount {
    label: String,
    count: usize,
    first_line: usize,
}

/// Text before the first `:`, trimmed; empty without a `:`
fn label_of(line: &str) -> &str {
    line.split_once(':').map(|(label, _)| label.trim()).unwrap_or("")
}

/// Resolve `(user, agent)` from a pivot-language transcript
///
/// Returns `None` when fewer than two distinct labels occur.
pub fn resolve_actors(transcript: &str) -> Option<Actors> {
    // Insertion-ordered so ties keep first-seen order after the stable sort
    let mut counts: Vec<LabelCount> = Vec::new();
    for (index, line) in transcript.split('\n').enumerate() {
        let label = label_of(line);
        if label.is_empty() {
            continue;
        }
        match counts.iter_mut().find(|c| c.label == label) {
            Some(entry) => entry.count += 1,
            None => counts.push(LabelCount {
                label: label.to_string(),
                count: 1,
                first_line: index,
            }),
        }
    }

    if counts.len() < 2 {
        tracing::debug!(labels = counts.len(), "Not enough speaker labels for actors");
        return None;
    }
    counts.sort_by(|x, y| y.count.cmp(&x.count));

    let (a, b) = (&counts[0], &counts[1]);
    let a_lower = a.label.to_lowercase();
    let b_lower = b.label.to_lowercase();
    let swap = a.first_line > b.first_line
        || a_lower.starts_with(AGENT_PREFIX)
        || USER_PREFIXES.iter().any(|p| b_lower.starts_with(p));

    let actors = if swap {
        Actors {
            user: b.label.clone(),
            agent: a.label.clone(),
        }
    } else {
        Actors {
            user: a.label.clone(),
            agent: b.label.clone(),
        }
    };
    tracing::info!(user = %actors.user, agent = %actors.agent, "Resolved actors");
    Some(actors)
}
