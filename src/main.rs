//! bizchat - business chat client
//!
#![doc = "bizchat - business chat client"]
#![doc = "Main entry point for the bizchat command line application."]

use anyhow::Result;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use bizchat::cli::{Cli, Commands};
use bizchat::commands;
use bizchat::config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let cli = Cli::parse_args();

    // Initialize tracing
    init_tracing(cli.verbose);

    // Load configuration
    let config_path = cli.config.as_deref().unwrap_or("config/config.yaml");
    let config = Config::load(config_path, &cli)?;

    // Validate configuration
    config.validate()?;

    // Execute command
    match cli.command {
        Commands::Connect => {
            tracing::info!("Checking backend connection");
            commands::run_connect(&config).await?;
            Ok(())
        }
        Commands::Chat { resume } => {
            if let Some(r) = &resume {
                tracing::debug!("Resuming session: {}", r);
            }
            // Moves `config` into the handler (match arms are exclusive)
            commands::chat::run_chat(config, resume).await?;
            Ok(())
        }
        Commands::Ask { question, session } => {
            tracing::info!("Sending single question");
            commands::run_ask(&config, &question, session).await?;
            Ok(())
        }
        Commands::Sessions { command } => {
            tracing::info!("Starting session command");
            commands::sessions::handle_sessions(&config, command).await?;
            Ok(())
        }
        Commands::Docs { command } => {
            tracing::info!("Starting document command");
            commands::documents::handle_docs(&config, command).await?;
            Ok(())
        }
    }
}

/// Initialize tracing subscriber with environment filter
///
/// `RUST_LOG` wins when set; otherwise `--verbose` selects debug output.
fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "bizchat=debug" } else { "bizchat=info" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
