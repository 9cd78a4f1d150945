//! Session management commands

use crate::api::SessionSummary;
use crate::cli::SessionCommand;
use crate::commands::{connect_store, print_conversation};
use crate::config::Config;
use crate::error::{BizchatError, Result};
use crate::store::{parse_timestamp, OperationOutcome};
use colored::Colorize;
use prettytable::{format, Table};

/// Handle session commands
pub async fn handle_sessions(config: &Config, command: SessionCommand) -> Result<()> {
    let store = connect_store(config).await?;

    match command {
        SessionCommand::List => {
            print_sessions_table(&store.sessions());
            println!(
                "Use {} to continue a session.",
                "bizchat chat --resume <ID>".cyan()
            );
            println!();
        }
        SessionCommand::Show { id } => {
            if let OperationOutcome::Failed { reason } = store.load_conversation(&id).await {
                return Err(BizchatError::Connection(reason).into());
            }
            if let Some(conversation) = store.current_conversation() {
                print_conversation(&conversation);
            }
        }
        SessionCommand::Delete { id } => match store.delete_session(&id).await {
            OperationOutcome::Applied => {
                println!("{}", format!("Deleted session {}", id).green());
            }
            OperationOutcome::Failed { reason } => {
                return Err(BizchatError::Connection(reason).into());
            }
        },
    }

    Ok(())
}

/// Print sessions as a table
pub(crate) fn print_sessions_table(sessions: &[SessionSummary]) {
    if sessions.is_empty() {
        println!("{}", "No saved sessions found.".yellow());
        return;
    }

    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_BORDERS_ONLY);

    table.add_row(prettytable::row![
        "ID".bold(),
        "Title".bold(),
        "Messages".bold(),
        "Last Updated".bold()
    ]);

    for session in sessions {
        table.add_row(prettytable::row![
            session.session_id.cyan(),
            shorten(&session.title, 40),
            session.message_count,
            format_timestamp(&session.last_updated)
        ]);
    }

    println!("\nSaved Sessions:");
    table.printstd();
    println!();
}

fn shorten(text: &str, max_chars: usize) -> String {
    if text.chars().count() > max_chars {
        let head: String = text.chars().take(max_chars - 3).collect();
        format!("{}...", head)
    } else {
        text.to_string()
    }
}

fn format_timestamp(raw: &str) -> String {
    parse_timestamp(raw)
        .map(|ts| ts.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| raw.to_string())
}
