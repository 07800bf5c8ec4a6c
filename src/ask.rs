//! Turning a user query into a single shell command.

use crate::extract::extract_command;
use crate::ollama::{OllamaClient, OllamaError};
use crate::protocol::ChatMessage;
use thiserror::Error;
use tracing::info;

/// Instruction sent ahead of every query.
pub const SYSTEM_PROMPT: &str = "You are a Zsh shell expert. \
    Output only the exact Zsh command that solves the user's request. \
    No explanation, no formatting, no extra text. \
    Your response must be a single line of valid Zsh code ready to run in the terminal.";

/// Why no command could be produced.
///
/// The `Display` text is the user-facing message without the `Error: ` prefix.
#[derive(Debug, Error)]
pub enum AskError {
    #[error("No valid Zsh command found.")]
    NoCommand,
    #[error("something went wrong! {0}")]
    Upstream(#[from] OllamaError),
}

/// Ask the model for a command and extract it from the reply.
pub async fn ask(client: &OllamaClient, query: &str) -> Result<String, AskError> {
    let messages = [ChatMessage::system(SYSTEM_PROMPT), ChatMessage::user(query)];

    info!("Sending query to Ollama: {}", query);
    let reply = client.chat(&messages).await?;

    let command = extract_command(&reply);
    if command.is_empty() {
        return Err(AskError::NoCommand);
    }

    info!("Received command: {}", command);
    Ok(command)
}
