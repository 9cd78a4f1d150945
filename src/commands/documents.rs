//! Document storage commands

use crate::cli::DocsCommand;
use crate::config::Config;
use crate::documents::DocumentClient;
use crate::error::{BizchatError, Result};
use colored::Colorize;

/// Handle document commands
pub async fn handle_docs(config: &Config, command: DocsCommand) -> Result<()> {
    let client = DocumentClient::new(&config.documents, &config.api)?;

    match command {
        DocsCommand::Upload { path } => {
            let key = client.upload(&path).await?;
            println!("{} {}", "Uploaded; storage key:".green(), key.cyan());
        }
        DocsCommand::Delete { key } => {
            client.delete(&key).await?;
            println!("{}", format!("Deleted document {}", key).green());
        }
        DocsCommand::Url { key } => {
            let url = client.signed_url(&key).await?;
            println!("{}", url);
        }
        DocsCommand::Test => {
            if !client.test_connection().await {
                return Err(BizchatError::Document(format!(
                    "storage proxy at {} is not reachable",
                    config.documents.host
                ))
                .into());
            }
            println!("{}", "Document storage is reachable.".green());
        }
    }

    Ok(())
}
