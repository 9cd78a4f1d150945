//! Special commands parser for interactive chat
//!
//! Special commands let the user manage conversations without leaving the
//! chat prompt:
//! - Start a new conversation
//! - List, switch to, or delete saved sessions
//! - View connection status
//! - Display help information
//! - Exit the session
//!
//! Commands are prefixed with `/`. The command word is case-insensitive;
//! session ids are passed through unchanged.

use thiserror::Error;

/// Errors that can occur when parsing special commands
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    /// Unknown command was entered
    #[error("Unknown command: {0}\n\nType '/help' to see available commands")]
    UnknownCommand(String),

    /// Command requires an argument but none was provided
    #[error("Command {command} requires an argument\n\nUsage: {usage}")]
    MissingArgument { command: String, usage: String },
}

/// Special commands that can be executed during interactive chat
///
/// These commands act on the conversation store directly rather than
/// being sent to the backend as a question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpecialCommand {
    /// Clear the selection so the next message starts a new conversation
    NewConversation,

    /// Refresh and print the session list
    ListSessions,

    /// Select a conversation, loading its transcript if needed
    Switch(String),

    /// Delete a session on the backend and locally
    Delete(String),

    /// Print connection and selection status
    ShowStatus,

    /// Display help information
    Help,

    /// Exit the interactive session
    Exit,

    /// Not a special command; send the input as a message
    None,
}

/// Parse a user input string into a special command
///
/// # Errors
///
/// Returns `CommandError::UnknownCommand` if input starts with "/" but is
/// not a known command, and `CommandError::MissingArgument` if a command
/// that needs a session id got none.
///
/// # Examples
///
/// ```
/// use bizchat::commands::special_commands::{parse_special_command, SpecialCommand};
///
/// let cmd = parse_special_command("/switch 11111111-1111-1111-1111-111111111111").unwrap();
/// assert_eq!(
///     cmd,
///     SpecialCommand::Switch("11111111-1111-1111-1111-111111111111".to_string())
/// );
///
/// let cmd = parse_special_command("How did Q1 go?").unwrap();
/// assert_eq!(cmd, SpecialCommand::None);
///
/// assert!(parse_special_command("/foo").is_err());
/// ```
pub fn parse_special_command(input: &str) -> Result<SpecialCommand, CommandError> {
    let trimmed = input.trim();
    let lower = trimmed.to_lowercase();

    // If input doesn't start with "/", it's not a command (except exit/quit)
    if !trimmed.starts_with('/') {
        return Ok(match lower.as_str() {
            "exit" | "quit" => SpecialCommand::Exit,
            _ => SpecialCommand::None,
        });
    }

    let (word, arg) = match trimmed.split_once(char::is_whitespace) {
        Some((word, arg)) => (word.to_lowercase(), arg.trim()),
        None => (lower.clone(), ""),
    };

    match word.as_str() {
        "/new" => Ok(SpecialCommand::NewConversation),
        "/sessions" | "/list" => Ok(SpecialCommand::ListSessions),
        "/switch" | "/open" => with_argument("/switch", arg, SpecialCommand::Switch),
        "/delete" => with_argument("/delete", arg, SpecialCommand::Delete),
        "/status" => Ok(SpecialCommand::ShowStatus),
        "/help" | "/?" => Ok(SpecialCommand::Help),
        "/exit" | "/quit" => Ok(SpecialCommand::Exit),
        _ => Err(CommandError::UnknownCommand(trimmed.to_string())),
    }
}

fn with_argument(
    command: &str,
    arg: &str,
    build: fn(String) -> SpecialCommand,
) -> Result<SpecialCommand, CommandError> {
    if arg.is_empty() {
        return Err(CommandError::MissingArgument {
            command: command.to_string(),
            usage: format!("{} <session-id>", command),
        });
    }
    Ok(build(arg.to_string()))
}

/// Print the special commands reference
pub fn print_help() {
    println!(
        r#"
Special Commands for Interactive Chat
=====================================

CONVERSATIONS:
  /new              - Start a new conversation
  /sessions         - List saved sessions (alias: /list)
  /switch <id>      - Open a saved session (alias: /open)
  /delete <id>      - Delete a saved session

SESSION INFORMATION:
  /status           - Show connection and current conversation
  /help             - Show this help message (alias: /?)

EXIT:
  /exit, exit, quit - Leave the chat (Ctrl-D also works)

Anything else is sent to the backend as a question.
"#
    );
}
