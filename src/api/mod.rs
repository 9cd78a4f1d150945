//! Chat backend abstraction
//!
//! The conversation store talks to the remote chat/session API only through
//! the [`ChatBackend`] trait. [`HttpChatBackend`] is the reqwest
//! implementation used by the CLI; tests substitute an in-memory backend.

pub mod http;
pub mod types;

pub use http::HttpChatBackend;
pub use types::{
    ChatRequest, ChatResponse, ConversationMetadata, ConversationResponse, HealthResponse,
    SessionSummary, SessionsResponse, WireMessage,
};

use crate::error::Result;
use async_trait::async_trait;

/// Credentials attached to every backend call
///
/// Mirrors the user-editable part of the connection state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    /// Base URL of the chat backend
    pub api_host: String,
    /// API key sent with each request
    pub api_key: String,
    /// User whose sessions are addressed
    pub user_id: String,
}

impl Credentials {
    /// Create credentials from their three parts
    ///
    /// # Examples
    ///
    /// ```
    /// use bizchat::api::Credentials;
    ///
    /// let creds = Credentials::new("http://localhost:8000", "key", "alice");
    /// assert_eq!(creds.user_id, "alice");
    /// ```
    pub fn new(
        api_host: impl Into<String>,
        api_key: impl Into<String>,
        user_id: impl Into<String>,
    ) -> Self {
        Self {
            api_host: api_host.into(),
            api_key: api_key.into(),
            user_id: user_id.into(),
        }
    }
}

/// Remote chat/session API contract
///
/// Implementations perform exactly one request per call and never retry.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// Probe `GET /health`
    async fn health(&self, creds: &Credentials) -> Result<HealthResponse>;

    /// List the sessions persisted for `creds.user_id`
    async fn list_sessions(&self, creds: &Credentials) -> Result<Vec<SessionSummary>>;

    /// Fetch the full transcript of one session
    async fn get_conversation(
        &self,
        creds: &Credentials,
        session_id: &str,
    ) -> Result<ConversationResponse>;

    /// Send one question and receive the generation
    async fn chat(&self, creds: &Credentials, request: &ChatRequest) -> Result<ChatResponse>;

    /// Delete one session server-side
    async fn delete_session(&self, creds: &Credentials, session_id: &str) -> Result<()>;
}
