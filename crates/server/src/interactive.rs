//! Interactive story loop
//!
//! Reads one command at a time and resolves it completely, including any
//! polling, before reading the next. Only session-fatal errors end the loop.

use storyvoice_agent::commands::{substitute_microphone, wants_microphone};
use storyvoice_agent::{Command, SessionError, StorySession};
use storyvoice_core::{SpeechToText, TextToSpeech};

use crate::exit::Farewell;
use crate::io::{Input, UserIo};

const HELP: &str = "Commands: /r[N] undo lines, /s[N] speak lines, /qa [question] ask, /quit";

/// Print the canonical transcript, then the local one when it differs
pub fn show_transcript(session: &StorySession, io: &mut dyn UserIo) {
    let transcript = session.transcript();
    io.show(&transcript.canonical);
    if !transcript.is_untranslated() {
        io.show(&transcript.local);
    }
}

/// Print "Actors detected" when the story has recognisable speakers
pub fn show_actors(session: &StorySession, io: &mut dyn UserIo) {
    if let Some(actors) = session.actors() {
        io.show(&format!("Actors detected: {}, {}", actors.user, actors.agent));
    }
}

async fn listen(listener: &dyn SpeechToText, io: &mut dyn UserIo) -> Option<String> {
    io.show("Recording...");
    match listener.listen().await {
        Ok(text) => {
            io.show(&format!("Listened: {}", text));
            Some(text)
        }
        Err(e) => {
            io.show(&format!("Speech recognition failed: {}", e));
            None
        }
    }
}

async fn speak(speaker: &dyn TextToSpeech, text: &str, io: &mut dyn UserIo) {
    if text.trim().is_empty() {
        return;
    }
    if let Err(e) = speaker.speak(text).await {
        io.show(&format!("Speech output failed: {}", e));
    }
}

/// Report a failed command; `Err` when the session cannot go on
fn report(err: SessionError, io: &mut dyn UserIo) -> Result<(), SessionError> {
    if err.is_fatal() {
        return Err(err);
    }
    tracing::warn!(error = %err, "Command failed");
    match err {
        SessionError::Transient(_) => io.show("The story service did not answer, try again"),
        other => io.show(&other.to_string()),
    }
    Ok(())
}

/// Run commands against a started session until the user leaves
pub async fn run_interactive(
    session: &mut StorySession,
    listener: &dyn SpeechToText,
    speaker: &dyn TextToSpeech,
    io: &mut dyn UserIo,
) -> Result<Farewell, SessionError> {
    loop {
        let line = match io.read_input().await {
            Ok(Input::Line(line)) => line,
            Ok(Input::Interrupted) | Ok(Input::Eof) => return Ok(Farewell::Interrupted),
            Err(e) => {
                tracing::error!(error = %e, "Terminal input failed");
                return Ok(Farewell::Interrupted);
            }
        };

        let command = Command::parse(&line);
        tracing::debug!(?command, "Command");

        match command {
            Command::Quit => return Ok(Farewell::Quit),
            Command::Unknown(input) => {
                io.show(&format!("Unknown command: {}", input));
                io.show(HELP);
            }
            Command::Rollback(lines) => match session.rollback(lines).await {
                Ok(()) => show_transcript(session, io),
                Err(e) => report(e, io)?,
            },
            Command::Speak(lines) => {
                let text = session.local_tail(lines);
                speak(speaker, &text, io).await;
            }
            Command::Ask(question) => {
                let question = match question {
                    Some(question) => question,
                    None => match listen(listener, io).await {
                        Some(heard) => heard,
                        None => continue,
                    },
                };
                match session.ask(&question).await {
                    Ok(Some(answer)) => {
                        show_transcript(session, io);
                        if !answer.complete {
                            io.show("The answer may be incomplete");
                        }
                        speak(speaker, &answer.local, io).await;
                    }
                    Ok(None) => {
                        show_transcript(session, io);
                        io.show("No answer yet, ask again with /qa");
                    }
                    Err(e) => report(e, io)?,
                }
            }
            Command::Submit(text) => {
                let text = if wants_microphone(&text) {
                    match listen(listener, io).await {
                        Some(heard) => substitute_microphone(&text, &heard),
                        None => continue,
                    }
                } else {
                    text
                };
                match session.continue_story(&text).await {
                    Ok(()) => show_transcript(session, io),
                    Err(e) => report(e, io)?,
                }
            }
        }
    }
}
