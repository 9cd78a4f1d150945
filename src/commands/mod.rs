/*!
Command handlers for the CLI

This module provides command handlers invoked by the CLI entrypoint:

- `chat`: Interactive chat over the conversation store
- `ask`: One question, one reply
- `sessions`: List, show and delete saved sessions
- `documents`: Upload, delete and sign stored documents

Handlers build a [`ConversationSessionStore`] over the HTTP backend and
drive it exactly as an interactive front-end would.
*/

use crate::api::HttpChatBackend;
use crate::config::Config;
use crate::error::{BizchatError, Result};
use crate::store::{Conversation, ConversationSessionStore, OperationOutcome, Role};
use colored::Colorize;
use std::sync::Arc;

// Interactive chat loop
pub mod chat;

// Document storage commands
pub mod documents;

// Session management commands
pub mod sessions;

// Special commands parser for the chat prompt
pub mod special_commands;

/// Build a disconnected store over the configured HTTP backend
pub fn build_store(config: &Config) -> Result<ConversationSessionStore> {
    let backend = Arc::new(HttpChatBackend::new(&config.api)?);
    Ok(ConversationSessionStore::from_config(backend, &config.api))
}

/// Build a store and connect it
///
/// # Errors
///
/// Returns `BizchatError::Connection` with the store's connection error
/// when the health probe fails.
pub async fn connect_store(config: &Config) -> Result<ConversationSessionStore> {
    let store = build_store(config)?;
    if let OperationOutcome::Failed { reason } = store.connect().await {
        return Err(BizchatError::Connection(reason).into());
    }
    Ok(store)
}

/// Print a short backend status line
pub async fn run_connect(config: &Config) -> Result<()> {
    let store = connect_store(config).await?;
    let connection = store.connection();
    println!(
        "{} {} as {} ({} saved sessions)",
        "Connected to".green(),
        connection.api_host.cyan(),
        connection.user_id.bold(),
        store.sessions().len()
    );
    Ok(())
}

/// Send one question and print the reply
///
/// # Errors
///
/// Returns error for an empty question, a failed connect, or a failed send.
pub async fn run_ask(config: &Config, question: &str, session: Option<String>) -> Result<()> {
    let question = question.trim();
    if question.is_empty() {
        return Err(BizchatError::InvalidInput("question cannot be empty".to_string()).into());
    }

    let store = connect_store(config).await?;

    if let Some(id) = session {
        if let OperationOutcome::Failed { reason } = store.set_current_conversation(&id).await {
            println!(
                "{}",
                format!("Could not load session {} ({}); starting fresh", id, reason).yellow()
            );
        }
    }

    if let OperationOutcome::Failed { reason } = store.send_message(question).await {
        return Err(BizchatError::Connection(reason).into());
    }

    print_latest_reply(&store);
    if let Some(id) = store.current_conversation_id() {
        println!("{} {}", "session:".dimmed(), id.dimmed());
    }
    Ok(())
}

/// Print the assistant message that ends the current conversation, if any
pub(crate) fn print_latest_reply(store: &ConversationSessionStore) {
    let reply = store
        .current_conversation()
        .and_then(|c| c.messages.last().cloned())
        .filter(|m| m.role == Role::Assistant);

    match reply {
        Some(message) => println!("\n{}\n", message.content),
        None => println!("{}", "(no reply)".yellow()),
    }
}

/// Print a whole transcript
pub(crate) fn print_conversation(conversation: &Conversation) {
    println!("\n{} {}", conversation.title.bold(), conversation.id.dimmed());
    println!("{}", "=".repeat(conversation.title.chars().count().max(8)));
    for message in &conversation.messages {
        let label = match message.role {
            Role::User => "you".cyan().bold(),
            Role::Assistant => "assistant".green().bold(),
        };
        println!("{}: {}", label, message.content);
    }
    println!();
}
