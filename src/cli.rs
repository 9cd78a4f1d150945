//! Command-line interface definition for bizchat
//!
//! This module defines the CLI structure using clap's derive API,
//! providing commands for connecting, chatting, browsing sessions,
//! and managing uploaded documents.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// bizchat - business chat client
///
/// Converse with a remote chat backend, browse and delete saved sessions,
/// and manage documents in object storage.
#[derive(Parser, Debug, Clone)]
#[command(name = "bizchat")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/config.yaml")]
    pub config: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Override the chat backend host
    #[arg(long)]
    pub host: Option<String>,

    /// Override the user id
    #[arg(long)]
    pub user_id: Option<String>,

    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands for bizchat
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Check the backend and show how many sessions are stored
    Connect,

    /// Start an interactive chat
    Chat {
        /// Resume an existing session by id
        #[arg(short, long)]
        resume: Option<String>,
    },

    /// Ask a single question and print the reply
    Ask {
        /// Question to send
        question: String,

        /// Continue an existing session by id
        #[arg(short, long)]
        session: Option<String>,
    },

    /// Manage saved sessions
    Sessions {
        /// Session subcommand
        #[command(subcommand)]
        command: SessionCommand,
    },

    /// Manage documents in object storage
    Docs {
        /// Document subcommand
        #[command(subcommand)]
        command: DocsCommand,
    },
}

/// Session management subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum SessionCommand {
    /// List saved sessions
    List,

    /// Print the transcript of a session
    Show {
        /// Session id
        id: String,
    },

    /// Delete a session
    Delete {
        /// Session id
        id: String,
    },
}

/// Document storage subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum DocsCommand {
    /// Upload a file and print its storage key
    Upload {
        /// File to upload
        path: PathBuf,
    },

    /// Delete a stored document
    Delete {
        /// Storage key
        key: String,
    },

    /// Print a signed download URL for a stored document
    Url {
        /// Storage key
        key: String,
    },

    /// Check the storage proxy connection
    Test,
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
