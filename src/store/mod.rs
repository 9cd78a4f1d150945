//! Conversation/session synchronization store
//!
//! [`ConversationSessionStore`] keeps the local view of conversations in
//! step with the remote, session-oriented chat backend:
//!
//! - local conversations are a presentation cache, cleared on every
//!   successful (re)connect
//! - the session list is replaced wholesale by each refresh
//! - a message is appended locally before the chat call is issued, and the
//!   reply is merged once that call resolves
//! - a conversation that starts under a temporary id is renamed to the
//!   session id the backend assigns
//!
//! Each operation that performs I/O applies its local mutation under the
//! state lock, releases it, awaits the backend, then re-acquires the lock to
//! merge. The lock is never held across an `.await`. There is no
//! cancellation: concurrent operations race and the last writer wins.
//!
//! Failures never surface as errors. Every I/O operation returns an
//! [`OperationOutcome`]; a failed read keeps stale data, a failed send keeps
//! the optimistic user message, and a failed delete leaves local state
//! untouched. Only [`ConversationSessionStore::connect`] records a
//! user-visible `connection_error`.

pub mod title;
pub mod types;

pub use title::{
    derive_title, is_session_uuid, new_temporary_id, parse_timestamp, PLACEHOLDER_TITLE,
};
pub use types::{ConnectionState, Conversation, Message, OperationOutcome, Role};

use crate::api::{ChatBackend, ChatRequest, ConversationResponse, Credentials, SessionSummary};
use crate::config::ApiConfig;
use crate::error::BizchatError;
use chrono::Utc;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Mutable state shared by all clones of a store
#[derive(Debug, Default)]
struct StoreState {
    /// Most recent first
    conversations: Vec<Conversation>,
    /// Backend order
    sessions: Vec<SessionSummary>,
    current_conversation_id: Option<String>,
    connection: ConnectionState,
    is_loading: bool,
}

impl StoreState {
    fn conversation_mut(&mut self, id: &str) -> Option<&mut Conversation> {
        self.conversations.iter_mut().find(|c| c.id == id)
    }

    /// Session id to send with the next chat request, if any
    ///
    /// Only a current id that is a listed session AND has the UUID shape is
    /// sent; a temporary id would claim a session the backend never created.
    fn resumable_session_id(&self) -> Option<String> {
        let current = self.current_conversation_id.as_deref()?;
        let listed = self.sessions.iter().any(|s| s.session_id == current);
        if listed && is_session_uuid(current) {
            Some(current.to_string())
        } else {
            None
        }
    }

    /// Append a message to the current conversation, creating it if needed
    ///
    /// Returns the id of the conversation the message landed in.
    fn append_message(&mut self, role: Role, content: &str) -> String {
        let message = Message::new(role, content);

        let Some(current_id) = self.current_conversation_id.clone() else {
            let id = new_temporary_id();
            let mut conversation =
                Conversation::new(id.clone(), title_for(role, content), message.timestamp);
            conversation.push_message(message);
            self.conversations.insert(0, conversation);
            self.current_conversation_id = Some(id.clone());
            tracing::debug!("Started local conversation {}", id);
            return id;
        };

        if let Some(conversation) = self.conversation_mut(&current_id) {
            conversation.push_message(message);
            return current_id;
        }

        // Current id names a session with no local copy yet.
        let summary = self.sessions.iter().find(|s| s.session_id == current_id);
        let title = summary
            .map(|s| s.title.clone())
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| title_for(role, content));
        let created_at = summary
            .and_then(|s| parse_timestamp(&s.created_at))
            .unwrap_or(message.timestamp);

        let mut conversation = Conversation::new(current_id.clone(), title, created_at);
        conversation.push_message(message);
        self.conversations.insert(0, conversation);
        tracing::debug!("Materialized conversation {}", current_id);
        current_id
    }

    /// Rewrite a conversation id to the one the backend assigned
    ///
    /// Returns whether a local conversation was renamed.
    fn rename_conversation(&mut self, old_id: &str, new_id: &str) -> bool {
        if !self.conversations.iter().any(|c| c.id == old_id) {
            tracing::debug!(
                "No local conversation {}; refreshing sessions for {}",
                old_id,
                new_id
            );
            return false;
        }

        // At most one conversation per id: the renamed one wins.
        self.conversations.retain(|c| c.id != new_id);

        if let Some(conversation) = self.conversation_mut(old_id) {
            conversation.id = new_id.to_string();
        }

        if self.current_conversation_id.as_deref() == Some(old_id) {
            self.current_conversation_id = Some(new_id.to_string());
        }

        tracing::info!("Conversation {} is now session {}", old_id, new_id);
        true
    }

    /// Insert or replace a conversation, keeping its list position on replace
    fn upsert_conversation(&mut self, conversation: Conversation) {
        match self
            .conversations
            .iter()
            .position(|c| c.id == conversation.id)
        {
            Some(idx) => self.conversations[idx] = conversation,
            None => self.conversations.insert(0, conversation),
        }
    }
}

fn title_for(role: Role, content: &str) -> String {
    match role {
        Role::User => derive_title(content),
        Role::Assistant => PLACEHOLDER_TITLE.to_string(),
    }
}

/// Build a local conversation from a fetched transcript
fn conversation_from_transcript(
    requested_id: &str,
    response: ConversationResponse,
) -> Conversation {
    let id = if response.session_id.is_empty() {
        requested_id.to_string()
    } else {
        response.session_id
    };

    let now = Utc::now();
    let created_at = response
        .metadata
        .created_at
        .as_deref()
        .and_then(parse_timestamp)
        .unwrap_or(now);
    let last_updated_at = response
        .metadata
        .last_updated
        .as_deref()
        .and_then(parse_timestamp)
        .unwrap_or(created_at);

    let messages: Vec<Message> = response
        .messages
        .into_iter()
        .filter_map(|m| match Role::parse_str(&m.role) {
            Some(role) => Some(Message {
                role,
                content: m.content,
                timestamp: last_updated_at,
            }),
            None => {
                tracing::debug!("Skipping transcript message with role {}", m.role);
                None
            }
        })
        .collect();

    let title = response
        .metadata
        .title
        .filter(|t| !t.trim().is_empty())
        .or_else(|| {
            messages
                .iter()
                .find(|m| m.role == Role::User)
                .map(|m| derive_title(&m.content))
        })
        .unwrap_or_else(|| PLACEHOLDER_TITLE.to_string());

    Conversation {
        id,
        title,
        messages,
        created_at,
        last_updated_at,
    }
}

/// Conversation and session state synchronized with a chat backend
///
/// Cloning is cheap; all clones share the same state, so the store can be
/// handed to every part of a front-end as an explicit context object.
///
/// # Examples
///
/// ```
/// use bizchat::api::{Credentials, HttpChatBackend};
/// use bizchat::config::ApiConfig;
/// use bizchat::store::{ConversationSessionStore, Role};
/// use std::sync::Arc;
///
/// # fn example() -> bizchat::error::Result<()> {
/// let backend = Arc::new(HttpChatBackend::new(&ApiConfig::default())?);
/// let store = ConversationSessionStore::new(
///     backend,
///     Credentials::new("http://localhost:8000", "key", "alice"),
/// );
///
/// let id = store.add_message(Role::User, "Show me Q1 sales");
/// assert_eq!(store.current_conversation_id(), Some(id));
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct ConversationSessionStore {
    backend: Arc<dyn ChatBackend>,
    state: Arc<RwLock<StoreState>>,
}

impl ConversationSessionStore {
    /// Create a disconnected store with the given credentials
    pub fn new(backend: Arc<dyn ChatBackend>, credentials: Credentials) -> Self {
        let connection = ConnectionState {
            api_host: credentials.api_host,
            api_key: credentials.api_key,
            user_id: credentials.user_id,
            ..Default::default()
        };

        Self {
            backend,
            state: Arc::new(RwLock::new(StoreState {
                connection,
                ..Default::default()
            })),
        }
    }

    /// Create a disconnected store from the API configuration
    pub fn from_config(backend: Arc<dyn ChatBackend>, config: &ApiConfig) -> Self {
        Self::new(backend, ConnectionState::from_config(config).credentials())
    }

    // The state is only a presentation cache; a panic elsewhere must not
    // wedge every later read.
    fn read(&self) -> RwLockReadGuard<'_, StoreState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, StoreState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn begin_loading(&self) -> Credentials {
        let mut state = self.write();
        state.is_loading = true;
        state.connection.credentials()
    }

    fn finish_loading(&self) {
        self.write().is_loading = false;
    }

    /// Probe the backend and, when healthy, start from a clean local cache
    ///
    /// A successful connect clears every local conversation and the current
    /// selection (the new connection may belong to a different user), then
    /// refreshes the session list. A failed probe records `connection_error`.
    pub async fn connect(&self) -> OperationOutcome {
        let creds = {
            let mut state = self.write();
            state.is_loading = true;
            state.connection.connection_error = None;
            state.connection.credentials()
        };

        tracing::info!("Connecting to chat backend at {}", creds.api_host);

        let failure = match self.backend.health(&creds).await {
            Ok(health) if health.is_healthy() => None,
            Ok(health) => Some(BizchatError::Unhealthy(health.status).to_string()),
            Err(e) => Some(format!("Failed to connect to {}: {}", creds.api_host, e)),
        };

        if let Some(reason) = failure {
            tracing::warn!("{}", reason);
            let mut state = self.write();
            state.connection.is_connected = false;
            state.connection.connection_error = Some(reason.clone());
            state.is_loading = false;
            return OperationOutcome::Failed { reason };
        }

        {
            let mut state = self.write();
            state.connection.is_connected = true;
            state.conversations.clear();
            state.current_conversation_id = None;
            state.is_loading = false;
        }
        tracing::info!("Connected to chat backend");

        self.load_sessions().await;
        OperationOutcome::Applied
    }

    /// Replace the session list with the backend's
    ///
    /// On failure the previous list stays in place.
    pub async fn load_sessions(&self) -> OperationOutcome {
        let creds = self.begin_loading();

        match self.backend.list_sessions(&creds).await {
            Ok(sessions) => {
                tracing::debug!("Loaded {} sessions", sessions.len());
                let mut state = self.write();
                state.sessions = sessions;
                state.is_loading = false;
                OperationOutcome::Applied
            }
            Err(e) => {
                tracing::warn!("Failed to load sessions: {}", e);
                self.finish_loading();
                OperationOutcome::failed(e)
            }
        }
    }

    /// Fetch one transcript, upsert it locally and make it current
    pub async fn load_conversation(&self, session_id: &str) -> OperationOutcome {
        let creds = self.begin_loading();

        match self.backend.get_conversation(&creds, session_id).await {
            Ok(response) => {
                let conversation = conversation_from_transcript(session_id, response);
                tracing::debug!(
                    "Loaded conversation {} with {} messages",
                    conversation.id,
                    conversation.messages.len()
                );
                let mut state = self.write();
                state.current_conversation_id = Some(conversation.id.clone());
                state.upsert_conversation(conversation);
                state.is_loading = false;
                OperationOutcome::Applied
            }
            Err(e) => {
                tracing::warn!("Failed to load conversation {}: {}", session_id, e);
                self.finish_loading();
                OperationOutcome::failed(e)
            }
        }
    }

    /// Send a user message and merge the backend's reply
    ///
    /// The caller rejects empty content. The user message is visible
    /// locally before the request is issued and stays there if the request
    /// fails. When the backend answers with a session id other than the one
    /// the message was appended under, the conversation is renamed to it and
    /// the session list is refreshed.
    pub async fn send_message(&self, content: &str) -> OperationOutcome {
        let (creds, request, target_id) = {
            let mut state = self.write();
            let creds = state.connection.credentials();
            let request = ChatRequest {
                question: content.to_string(),
                user_id: creds.user_id.clone(),
                session_id: state.resumable_session_id(),
            };
            let target_id = state.append_message(Role::User, content);
            state.is_loading = true;
            (creds, request, target_id)
        };

        tracing::debug!(
            conversation = %target_id,
            resuming = request.session_id.is_some(),
            "Sending message"
        );

        let response = match self.backend.chat(&creds, &request).await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!("Failed to send message in {}: {}", target_id, e);
                self.finish_loading();
                return OperationOutcome::failed(e);
            }
        };

        let renamed = {
            let mut state = self.write();

            if !response.generation.is_empty() {
                match state.conversation_mut(&target_id) {
                    Some(conversation) => conversation
                        .push_message(Message::new(Role::Assistant, &response.generation)),
                    None => tracing::warn!(
                        "Conversation {} disappeared before its reply arrived",
                        target_id
                    ),
                }
            }

            let renamed = match response.session_id.as_deref() {
                Some(session_id) if !session_id.is_empty() && session_id != target_id => {
                    state.rename_conversation(&target_id, session_id);
                    true
                }
                _ => false,
            };

            state.is_loading = false;
            renamed
        };

        if renamed {
            self.load_sessions().await;
        }

        OperationOutcome::Applied
    }

    /// Append a message to the current conversation without contacting the backend
    ///
    /// With no current conversation a new one is created under a temporary
    /// id and made current. With a current id that has no local copy the
    /// conversation is materialized from its session summary. Returns the id
    /// of the conversation the message was appended to.
    pub fn add_message(&self, role: Role, content: &str) -> String {
        self.write().append_message(role, content)
    }

    /// Delete a session remotely, then drop it locally
    ///
    /// Local state changes only after the backend confirms. Deleting the
    /// current conversation leaves nothing selected.
    pub async fn delete_conversation(&self, id: &str) -> OperationOutcome {
        let creds = self.begin_loading();

        match self.backend.delete_session(&creds, id).await {
            Ok(()) => {
                let mut state = self.write();
                state.conversations.retain(|c| c.id != id);
                state.sessions.retain(|s| s.session_id != id);
                if state.current_conversation_id.as_deref() == Some(id) {
                    state.current_conversation_id = None;
                }
                state.is_loading = false;
                tracing::info!("Deleted session {}", id);
                OperationOutcome::Applied
            }
            Err(e) => {
                tracing::warn!("Failed to delete session {}: {}", id, e);
                self.finish_loading();
                OperationOutcome::failed(e)
            }
        }
    }

    /// Same as [`delete_conversation`](Self::delete_conversation), for session-list call sites
    pub async fn delete_session(&self, session_id: &str) -> OperationOutcome {
        self.delete_conversation(session_id).await
    }

    /// Select a conversation, fetching its transcript if it is not loaded
    pub async fn set_current_conversation(&self, id: &str) -> OperationOutcome {
        {
            let mut state = self.write();
            if state.conversations.iter().any(|c| c.id == id) {
                state.current_conversation_id = Some(id.to_string());
                return OperationOutcome::Applied;
            }
        }

        self.load_conversation(id).await
    }

    /// Clear the selection; the next message starts a new conversation
    pub fn start_new_conversation(&self) {
        self.write().current_conversation_id = None;
    }

    /// Replace the stored credentials (settings form)
    pub fn set_credentials(
        &self,
        api_host: impl Into<String>,
        api_key: impl Into<String>,
        user_id: impl Into<String>,
    ) {
        let mut state = self.write();
        state.connection.api_host = api_host.into();
        state.connection.api_key = api_key.into();
        state.connection.user_id = user_id.into();
    }

    /// Local conversations, most recent first
    pub fn conversations(&self) -> Vec<Conversation> {
        self.read().conversations.clone()
    }

    /// One local conversation by id
    pub fn conversation(&self, id: &str) -> Option<Conversation> {
        self.read().conversations.iter().find(|c| c.id == id).cloned()
    }

    /// Session summaries from the last successful refresh
    pub fn sessions(&self) -> Vec<SessionSummary> {
        self.read().sessions.clone()
    }

    pub fn current_conversation_id(&self) -> Option<String> {
        self.read().current_conversation_id.clone()
    }

    /// The current conversation, if it is loaded locally
    pub fn current_conversation(&self) -> Option<Conversation> {
        let state = self.read();
        let id = state.current_conversation_id.as_deref()?;
        state.conversations.iter().find(|c| c.id == id).cloned()
    }

    pub fn connection(&self) -> ConnectionState {
        self.read().connection.clone()
    }

    pub fn is_connected(&self) -> bool {
        self.read().connection.is_connected
    }

    pub fn connection_error(&self) -> Option<String> {
        self.read().connection.connection_error.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.read().is_loading
    }
}
