//! bizchat - business chat client library
//!
//! This library keeps a local list of conversations in sync with a remote,
//! session-based chat backend. The backend owns the durable sessions; the
//! client holds transcripts in memory, applies user messages optimistically,
//! and merges server session ids back in when a reply arrives.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//!
//! - `store`: The conversation session store, its entities and title rules
//! - `api`: Backend abstraction, wire types and the HTTP implementation
//! - `documents`: Client for the document storage proxy
//! - `config`: Configuration management and validation
//! - `error`: Error types and result aliases
//! - `cli`: Command-line interface definition
//! - `commands`: Handlers behind each CLI command
//!
//! # Example
//!
//! ```no_run
//! use bizchat::api::HttpChatBackend;
//! use bizchat::{Config, ConversationSessionStore};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::default();
//!     config.validate()?;
//!
//!     let backend = Arc::new(HttpChatBackend::new(&config.api)?);
//!     let store = ConversationSessionStore::from_config(backend, &config.api);
//!     if store.connect().await.is_applied() {
//!         store.send_message("How did Q1 sales go?").await;
//!     }
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod documents;
pub mod error;
pub mod store;

// Re-export commonly used types
pub use config::Config;
pub use error::{BizchatError, Result};
pub use store::{Conversation, ConversationSessionStore, Message, OperationOutcome, Role};

#[cfg(test)]
pub mod test_utils;
