//! Terminal retry confirmation.

use std::io::{self, BufRead, Write};

use crawl_core::errors::PromptError;
use crawl_core::traits::ConfirmationPrompt;

/// Prints the prompt to stdout and reads one line from stdin.
///
/// The read runs on the blocking pool so in-flight fetches of the round keep
/// making progress while the operator decides.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdinPrompt;

impl StdinPrompt {
    pub fn new() -> Self {
        Self
    }
}

impl ConfirmationPrompt for StdinPrompt {
    async fn ask(&self, prompt_text: &str) -> Result<String, PromptError> {
        let text = prompt_text.to_string();
        tokio::task::spawn_blocking(move || {
            let mut stdout = io::stdout().lock();
            stdout.write_all(text.as_bytes())?;
            stdout.flush()?;
            drop(stdout);
            read_answer(&mut io::stdin().lock())
        })
        .await
        .map_err(|e| PromptError::Io(io::Error::other(e)))?
    }
}

/// Read one line and strip its terminator. EOF is [`PromptError::Closed`].
pub fn read_answer<R: BufRead>(reader: &mut R) -> Result<String, PromptError> {
    let mut line = String::new();
    if reader.read_line(&mut line)? == 0 {
        return Err(PromptError::Closed);
    }
    let trimmed = line.trim_end_matches(['\r', '\n']).len();
    line.truncate(trimmed);
    Ok(line)
}
