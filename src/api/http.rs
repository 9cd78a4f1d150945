//! HTTP implementation of the chat backend
//!
//! Talks to the chat/session API with reqwest. Every request carries the
//! API key and the client identifier headers; host and key come from the
//! per-call [`Credentials`] so a settings change takes effect immediately.

use crate::api::{
    ChatBackend, ChatRequest, ChatResponse, ConversationResponse, Credentials, HealthResponse,
    SessionSummary, SessionsResponse,
};
use crate::config::ApiConfig;
use crate::error::{BizchatError, Result};

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Header carrying the API key
pub const API_KEY_HEADER: &str = "X-API-Key";
/// Header identifying this client to the backend
pub const CLIENT_ID_HEADER: &str = "X-Client-Id";

/// reqwest-backed [`ChatBackend`]
///
/// # Examples
///
/// ```
/// use bizchat::api::HttpChatBackend;
/// use bizchat::config::ApiConfig;
///
/// let backend = HttpChatBackend::new(&ApiConfig::default());
/// assert!(backend.is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct HttpChatBackend {
    client: Client,
    client_id: String,
}

impl HttpChatBackend {
    /// Create a backend client from the API configuration
    ///
    /// # Errors
    ///
    /// Returns error if HTTP client initialization fails
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(concat!("bizchat/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| {
                BizchatError::Connection(format!("Failed to create HTTP client: {}", e))
            })?;

        tracing::info!(
            "Initialized chat backend client: host={}, client_id={}",
            config.host,
            config.client_id
        );

        Ok(Self {
            client,
            client_id: config.client_id.clone(),
        })
    }

    fn authorized(&self, builder: RequestBuilder, creds: &Credentials) -> RequestBuilder {
        builder
            .header(API_KEY_HEADER, &creds.api_key)
            .header(CLIENT_ID_HEADER, &self.client_id)
    }

    async fn send(&self, builder: RequestBuilder, what: &str) -> Result<Response> {
        let response = builder.send().await.map_err(|e| {
            tracing::warn!("Request to {} failed: {}", what, e);
            BizchatError::Connection(format!("Failed to reach {}: {}", what, e))
        })?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            tracing::debug!("{} returned {}: {}", what, status, message);
            return Err(BizchatError::Api {
                status: status.as_u16(),
                message,
            }
            .into());
        }

        Ok(response)
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
        what: &str,
    ) -> Result<T> {
        let response = self.send(builder, what).await?;
        let body = response.json::<T>().await.map_err(|e| {
            tracing::warn!("Failed to parse {} response: {}", what, e);
            BizchatError::Http(e)
        })?;
        Ok(body)
    }
}

/// Join a configured host and an endpoint path
pub(crate) fn endpoint(host: &str, path: &str) -> String {
    format!("{}/{}", host.trim_end_matches('/'), path.trim_start_matches('/'))
}

#[async_trait]
impl ChatBackend for HttpChatBackend {
    async fn health(&self, creds: &Credentials) -> Result<HealthResponse> {
        let url = endpoint(&creds.api_host, "health");
        tracing::debug!("Probing backend health: {}", url);
        let builder = self.authorized(self.client.get(&url), creds);
        self.send_json(builder, "/health").await
    }

    async fn list_sessions(&self, creds: &Credentials) -> Result<Vec<SessionSummary>> {
        let url = endpoint(&creds.api_host, "sessions");
        tracing::debug!("Listing sessions for user {}", creds.user_id);
        let builder = self
            .authorized(self.client.get(&url), creds)
            .query(&[("user_id", creds.user_id.as_str())]);
        let response: SessionsResponse = self.send_json(builder, "/sessions").await?;
        Ok(response.sessions)
    }

    async fn get_conversation(
        &self,
        creds: &Credentials,
        session_id: &str,
    ) -> Result<ConversationResponse> {
        let url = endpoint(&creds.api_host, "conversation");
        tracing::debug!("Fetching conversation {}", session_id);
        let builder = self.authorized(self.client.get(&url), creds).query(&[
            ("user_id", creds.user_id.as_str()),
            ("session_id", session_id),
        ]);
        self.send_json(builder, "/conversation").await
    }

    async fn chat(&self, creds: &Credentials, request: &ChatRequest) -> Result<ChatResponse> {
        let url = endpoint(&creds.api_host, "chat");
        tracing::debug!(
            resuming = request.session_id.is_some(),
            "Posting chat message for user {}",
            request.user_id
        );
        let builder = self.authorized(self.client.post(&url), creds).json(request);
        self.send_json(builder, "/chat").await
    }

    async fn delete_session(&self, creds: &Credentials, session_id: &str) -> Result<()> {
        let url = endpoint(&creds.api_host, "session");
        tracing::debug!("Deleting session {}", session_id);
        let builder = self.authorized(self.client.delete(&url), creds).query(&[
            ("user_id", creds.user_id.as_str()),
            ("session_id", session_id),
        ]);
        self.send(builder, "/session").await?;
        Ok(())
    }
}
