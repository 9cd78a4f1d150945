//! Interactive chat handler.
//!
//! Connects a conversation store, then runs a readline loop that sends
//! each line to the backend or, for `/` commands, acts on the store.

use crate::commands::sessions::print_sessions_table;
use crate::commands::special_commands::{parse_special_command, print_help, SpecialCommand};
use crate::commands::{connect_store, print_conversation, print_latest_reply};
use crate::config::Config;
use crate::error::Result;
use crate::store::{ConversationSessionStore, OperationOutcome};
use colored::Colorize;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

/// Start interactive chat
///
/// # Arguments
///
/// * `config` - Global configuration
/// * `resume` - Optional session id to open before the first prompt
pub async fn run_chat(config: Config, resume: Option<String>) -> Result<()> {
    tracing::info!("Starting interactive chat");

    let store = connect_store(&config).await?;

    if let Some(id) = resume {
        match store.set_current_conversation(&id).await {
            OperationOutcome::Applied => {
                if let Some(conversation) = store.current_conversation() {
                    print_conversation(&conversation);
                }
            }
            OperationOutcome::Failed { reason } => {
                println!(
                    "{}",
                    format!("Could not resume {} ({}); starting fresh", id, reason).yellow()
                );
            }
        }
    }

    let mut rl = DefaultEditor::new()?;
    print_welcome_banner(&store);

    loop {
        match rl.readline(&prompt(&store)) {
            Ok(line) => {
                let trimmed = line.trim();
                // Empty input never reaches the store.
                if trimmed.is_empty() {
                    continue;
                }

                match parse_special_command(trimmed) {
                    Ok(SpecialCommand::None) => {}
                    Ok(SpecialCommand::Exit) => break,
                    Ok(command) => {
                        handle_special_command(&store, command).await;
                        continue;
                    }
                    Err(e) => {
                        println!("{}", e.to_string().red());
                        continue;
                    }
                }

                rl.add_history_entry(trimmed)?;

                match store.send_message(trimmed).await {
                    OperationOutcome::Applied => print_latest_reply(&store),
                    OperationOutcome::Failed { reason } => {
                        println!("{}", format!("Message not answered: {}", reason).red());
                    }
                }
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(e) => return Err(e.into()),
        }
    }

    println!("Goodbye!");
    Ok(())
}

async fn handle_special_command(store: &ConversationSessionStore, command: SpecialCommand) {
    match command {
        SpecialCommand::NewConversation => {
            store.start_new_conversation();
            println!("{}", "Started a new conversation".green());
        }
        SpecialCommand::ListSessions => {
            if let OperationOutcome::Failed { reason } = store.load_sessions().await {
                println!("{}", format!("Showing cached sessions: {}", reason).yellow());
            }
            print_sessions_table(&store.sessions());
        }
        SpecialCommand::Switch(id) => match store.set_current_conversation(&id).await {
            OperationOutcome::Applied => {
                if let Some(conversation) = store.current_conversation() {
                    print_conversation(&conversation);
                }
            }
            OperationOutcome::Failed { reason } => {
                println!("{}", format!("Could not open {}: {}", id, reason).red());
            }
        },
        SpecialCommand::Delete(id) => match store.delete_session(&id).await {
            OperationOutcome::Applied => {
                println!("{}", format!("Deleted session {}", id).green());
            }
            OperationOutcome::Failed { reason } => {
                println!("{}", format!("Could not delete {}: {}", id, reason).red());
            }
        },
        SpecialCommand::ShowStatus => print_status(store),
        SpecialCommand::Help => print_help(),
        SpecialCommand::Exit | SpecialCommand::None => {}
    }
}

fn prompt(store: &ConversationSessionStore) -> String {
    match store.current_conversation() {
        Some(conversation) => format!("[{}] >> ", conversation.title),
        None => "[new] >> ".to_string(),
    }
}

fn print_welcome_banner(store: &ConversationSessionStore) {
    let connection = store.connection();
    println!("{}", "bizchat".bold());
    println!(
        "Connected to {} as {}; {} saved sessions.",
        connection.api_host.cyan(),
        connection.user_id.bold(),
        store.sessions().len()
    );
    println!("Type {} for commands, {} to leave.\n", "/help".cyan(), "/exit".cyan());
}

fn print_status(store: &ConversationSessionStore) {
    let connection = store.connection();
    println!("\nHost:         {}", connection.api_host);
    println!("User:         {}", connection.user_id);
    println!(
        "Connected:    {}",
        if connection.is_connected {
            "yes".green()
        } else {
            "no".red()
        }
    );
    if let Some(error) = &connection.connection_error {
        println!("Last error:   {}", error.red());
    }
    println!("Sessions:     {}", store.sessions().len());
    println!("Loaded:       {}", store.conversations().len());
    match store.current_conversation() {
        Some(conversation) => println!(
            "Current:      {} ({}, {} messages)",
            conversation.title,
            conversation.id,
            conversation.messages.len()
        ),
        None => println!("Current:      (new conversation)"),
    }
    println!();
}
