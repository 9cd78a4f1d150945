//! Configuration management for bizchat
//!
//! This module handles loading, parsing, validating, and managing
//! configuration from files, environment variables, and CLI overrides.

use crate::error::{BizchatError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main configuration structure for bizchat
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Chat backend connection settings
    #[serde(default)]
    pub api: ApiConfig,

    /// Document storage proxy settings
    #[serde(default)]
    pub documents: DocumentsConfig,
}

/// Chat backend configuration
///
/// Host, key and user id are the process-wide credentials the
/// conversation store starts from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the chat backend
    #[serde(default = "default_api_host")]
    pub host: String,

    /// Key sent in the `X-API-Key` header
    #[serde(default)]
    pub api_key: String,

    /// User whose sessions are listed and extended
    #[serde(default)]
    pub user_id: String,

    /// Value sent in the `X-Client-Id` header
    #[serde(default = "default_client_id")]
    pub client_id: String,

    /// Request timeout (seconds)
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

fn default_api_host() -> String {
    "http://localhost:8000".to_string()
}

fn default_client_id() -> String {
    "bizchat".to_string()
}

fn default_timeout() -> u64 {
    60
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: default_api_host(),
            api_key: String::new(),
            user_id: String::new(),
            client_id: default_client_id(),
            timeout_seconds: default_timeout(),
        }
    }
}

/// Document storage proxy configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentsConfig {
    /// Base URL of the storage proxy
    #[serde(default = "default_documents_host")]
    pub host: String,

    /// Largest file accepted for upload (bytes)
    #[serde(default = "default_max_upload")]
    pub max_upload_bytes: u64,
}

fn default_documents_host() -> String {
    "http://localhost:3000".to_string()
}

fn default_max_upload() -> u64 {
    26_214_400 // 25 MB
}

impl Default for DocumentsConfig {
    fn default() -> Self {
        Self {
            host: default_documents_host(),
            max_upload_bytes: default_max_upload(),
        }
    }
}

impl Config {
    /// Load configuration from file with environment and CLI overrides
    ///
    /// # Arguments
    ///
    /// * `path` - Path to configuration file
    /// * `cli` - CLI arguments for overrides
    ///
    /// # Errors
    ///
    /// Returns error if the file exists but cannot be read or parsed
    pub fn load(path: &str, cli: &crate::cli::Cli) -> Result<Self> {
        let mut config = if Path::new(path).exists() {
            Self::from_file(path)?
        } else {
            tracing::warn!("Config file not found at {}, using defaults", path);
            Self::default()
        };

        config.apply_env_vars();
        config.apply_cli_overrides(cli);

        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| BizchatError::Config(format!("Failed to read config file: {}", e)))?;
        serde_yaml::from_str(&contents)
            .map_err(|e| BizchatError::Config(format!("Failed to parse config: {}", e)).into())
    }

    fn apply_env_vars(&mut self) {
        if let Ok(host) = std::env::var("BIZCHAT_API_HOST") {
            self.api.host = host;
        }

        if let Ok(key) = std::env::var("BIZCHAT_API_KEY") {
            self.api.api_key = key;
        }

        if let Ok(user_id) = std::env::var("BIZCHAT_USER_ID") {
            self.api.user_id = user_id;
        }

        if let Ok(client_id) = std::env::var("BIZCHAT_CLIENT_ID") {
            self.api.client_id = client_id;
        }

        if let Ok(timeout) = std::env::var("BIZCHAT_TIMEOUT_SECONDS") {
            if let Ok(value) = timeout.parse() {
                self.api.timeout_seconds = value;
            } else {
                tracing::warn!("Invalid BIZCHAT_TIMEOUT_SECONDS: {}", timeout);
            }
        }

        if let Ok(host) = std::env::var("BIZCHAT_DOCUMENTS_HOST") {
            self.documents.host = host;
        }
    }

    fn apply_cli_overrides(&mut self, cli: &crate::cli::Cli) {
        if cli.verbose {
            tracing::debug!("Verbose mode enabled");
        }

        if let Some(host) = &cli.host {
            self.api.host = host.clone();
        }

        if let Some(user_id) = &cli.user_id {
            self.api.user_id = user_id.clone();
        }
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns error if any validation check fails
    pub fn validate(&self) -> Result<()> {
        validate_host("api.host", &self.api.host)?;
        validate_host("documents.host", &self.documents.host)?;

        if self.api.client_id.trim().is_empty() {
            return Err(BizchatError::Config("api.client_id cannot be empty".to_string()).into());
        }

        if self.api.timeout_seconds == 0 {
            return Err(BizchatError::Config(
                "api.timeout_seconds must be greater than 0".to_string(),
            )
            .into());
        }

        if self.documents.max_upload_bytes == 0 {
            return Err(BizchatError::Config(
                "documents.max_upload_bytes must be greater than 0".to_string(),
            )
            .into());
        }

        Ok(())
    }
}

fn validate_host(field: &str, host: &str) -> Result<()> {
    if host.trim().is_empty() {
        return Err(BizchatError::Config(format!("{} cannot be empty", field)).into());
    }

    let parsed = url::Url::parse(host)
        .map_err(|e| BizchatError::Config(format!("{} is not a valid URL: {}", field, e)))?;

    match parsed.scheme() {
        "http" | "https" => Ok(()),
        other => Err(BizchatError::Config(format!(
            "{} must use http or https, got: {}",
            field, other
        ))
        .into()),
    }
}
