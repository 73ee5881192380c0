//! Terminal input and output

use std::sync::mpsc;

use async_trait::async_trait;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use tokio::sync::oneshot;

use crate::ServerError;

/// One read from the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Line(String),
    /// Ctrl-C at the prompt
    Interrupted,
    /// Ctrl-D or closed input
    Eof,
}

/// Where the interactive loop reads commands and writes text
#[async_trait]
pub trait UserIo: Send {
    async fn read_input(&mut self) -> Result<Input, ServerError>;

    fn show(&mut self, text: &str);
}

type LineRequest = oneshot::Sender<Result<Input, String>>;

/// Line editor on the controlling terminal
///
/// The editor lives on its own thread; each read hands it a reply channel.
pub struct TermIo {
    requests: mpsc::Sender<LineRequest>,
}

impl TermIo {
    pub fn new(prompt: impl Into<String>) -> Result<Self, ServerError> {
        let prompt = prompt.into();
        let (requests, incoming) = mpsc::channel::<LineRequest>();
        let (ready_tx, ready_rx) = mpsc::channel();

        std::thread::Builder::new()
            .name("readline".to_string())
            .spawn(move || {
                let mut editor = match DefaultEditor::new() {
                    Ok(editor) => {
                        let _ = ready_tx.send(Ok(()));
                        editor
                    }
                    Err(e) => {
                        let _ = ready_tx.send(Err(e.to_string()));
                        return;
                    }
                };
                while let Ok(reply) = incoming.recv() {
                    let input = match editor.readline(&prompt) {
                        Ok(line) => {
                            let _ = editor.add_history_entry(line.as_str());
                            Ok(Input::Line(line))
                        }
                        Err(ReadlineError::Interrupted) => Ok(Input::Interrupted),
                        Err(ReadlineError::Eof) => Ok(Input::Eof),
                        Err(e) => Err(e.to_string()),
                    };
                    if reply.send(input).is_err() {
                        break;
                    }
                }
            })
            .map_err(|e| ServerError::Input(e.to_string()))?;

        ready_rx
            .recv()
            .map_err(|e| ServerError::Input(e.to_string()))?
            .map_err(ServerError::Input)?;
        Ok(Self { requests })
    }
}

#[async_trait]
impl UserIo for TermIo {
    async fn read_input(&mut self) -> Result<Input, ServerError> {
        let (reply, line) = oneshot::channel();
        self.requests
            .send(reply)
            .map_err(|_| ServerError::Input("terminal closed".to_string()))?;
        let input = line
            .await
            .map_err(|_| ServerError::Input("terminal closed".to_string()))?
            .map_err(ServerError::Input)?;
        if matches!(input, Input::Line(_)) {
            println!();
        }
        Ok(input)
    }

    fn show(&mut self, text: &str) {
        println!("{}", text);
        println!();
    }
}
