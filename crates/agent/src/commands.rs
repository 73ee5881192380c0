//! Interactive command parsing

/// Placeholder in free text replaced with one captured utterance
pub const MIC_TOKEN: &str = "<mic>";

/// One line of interactive input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Free text for the next story turn; may be empty to let the story go on
    Submit(String),
    /// Remove this many trailing transcript lines
    Rollback(i64),
    /// Speak this many trailing local lines
    Speak(usize),
    /// Guided question; `None` means capture the question by voice
    Ask(Option<String>),
    Quit,
    Unknown(String),
}

impl Command {
    pub fn parse(input: &str) -> Self {
        let input = input.trim_end_matches(['\r', '\n']);

        if input.trim() == "/quit" {
            return Command::Quit;
        }
        if let Some(rest) = input.strip_prefix("/qa") {
            if rest.is_empty() || rest.starts_with(char::is_whitespace) {
                let question = rest.trim();
                return Command::Ask((!question.is_empty()).then(|| question.to_string()));
            }
            return Command::Unknown(input.to_string());
        }
        if let Some(rest) = input.strip_prefix("/r") {
            return match repeat_count(rest, 'r') {
                Some(n) => Command::Rollback(n as i64),
                None => Command::Unknown(input.to_string()),
            };
        }
        if let Some(rest) = input.strip_prefix("/s") {
            return match repeat_count(rest, 's') {
                Some(n) => Command::Speak(n),
                None => Command::Unknown(input.to_string()),
            };
        }
        if input.starts_with('/') {
            return Command::Unknown(input.to_string());
        }

        Command::Submit(input.replace("\\n", "\n"))
    }
}

/// `""` -> 1, `"3"` -> 3, `"rr"` -> 3 (the letter repeated, counting the first)
fn repeat_count(rest: &str, letter: char) -> Option<usize> {
    let rest = rest.trim();
    if rest.chars().all(|c| c == letter) {
        return Some(rest.chars().count() + 1);
    }
    rest.parse().ok()
}

/// True when free text asks for speech capture
pub fn wants_microphone(text: &str) -> bool {
    text.contains(MIC_TOKEN)
}

/// Replace every `<mic>` token with the captured utterance
pub fn substitute_microphone(text: &str, heard: &str) -> String {
    text.replace(MIC_TOKEN, heard)
}
