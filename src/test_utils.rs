//! Test utilities for bizchat
//!
//! Provides an in-memory [`ChatBackend`] with scripted responses and a
//! record of every call, plus small fixture builders.

use crate::api::{
    ChatBackend, ChatRequest, ChatResponse, ConversationResponse, Credentials, HealthResponse,
    SessionSummary,
};
use crate::error::{BizchatError, Result};
use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use tokio::sync::Notify;

/// Build a session summary with fixed timestamps
pub fn session(session_id: &str, title: &str) -> SessionSummary {
    SessionSummary {
        session_id: session_id.to_string(),
        title: title.to_string(),
        created_at: "2024-01-15T09:30:00".to_string(),
        last_updated: "2024-01-15T10:00:00".to_string(),
        message_count: 2,
    }
}

#[derive(Default)]
struct FakeState {
    /// `None` makes the health probe fail at the transport level
    health: Option<String>,
    sessions: Vec<SessionSummary>,
    fail_sessions: bool,
    transcripts: HashMap<String, ConversationResponse>,
    chat_responses: VecDeque<ChatResponse>,
    fail_chat: bool,
    fail_delete: bool,
    chat_requests: Vec<ChatRequest>,
    deleted: Vec<String>,
    calls: Vec<String>,
    last_credentials: Option<Credentials>,
}

/// Holds `chat` calls until the test releases them
#[derive(Default)]
struct ChatGate {
    entered: Notify,
    release: Notify,
}

/// In-memory chat backend
///
/// Unknown transcripts answer 404; an empty chat script answers with an
/// empty generation and no session id.
#[derive(Default)]
pub struct FakeChatBackend {
    state: Mutex<FakeState>,
    gate: Option<ChatGate>,
}

impl FakeChatBackend {
    /// Backend whose health probe reports "healthy"
    pub fn healthy() -> Self {
        Self::with_health("healthy")
    }

    /// Backend whose health probe reports `status`
    pub fn with_health(status: &str) -> Self {
        let backend = Self::default();
        backend.lock().health = Some(status.to_string());
        backend
    }

    /// Backend whose health probe cannot connect
    pub fn unreachable() -> Self {
        Self::default()
    }

    pub fn with_sessions(self, sessions: Vec<SessionSummary>) -> Self {
        self.set_sessions(sessions);
        self
    }

    pub fn with_transcript(self, transcript: ConversationResponse) -> Self {
        self.lock()
            .transcripts
            .insert(transcript.session_id.clone(), transcript);
        self
    }

    /// Make every `chat` call wait for [`release_chat`](Self::release_chat)
    pub fn with_chat_gate(mut self) -> Self {
        self.gate = Some(ChatGate::default());
        self
    }

    /// Wait until a gated `chat` call has started
    pub async fn wait_for_chat(&self) {
        if let Some(gate) = &self.gate {
            gate.entered.notified().await;
        }
    }

    /// Let one gated `chat` call finish
    pub fn release_chat(&self) {
        if let Some(gate) = &self.gate {
            gate.release.notify_one();
        }
    }

    pub fn set_sessions(&self, sessions: Vec<SessionSummary>) {
        self.lock().sessions = sessions;
    }

    pub fn push_chat_response(&self, response: ChatResponse) {
        self.lock().chat_responses.push_back(response);
    }

    pub fn fail_sessions(&self, fail: bool) {
        self.lock().fail_sessions = fail;
    }

    pub fn fail_chat(&self, fail: bool) {
        self.lock().fail_chat = fail;
    }

    pub fn fail_delete(&self, fail: bool) {
        self.lock().fail_delete = fail;
    }

    /// Every chat request received, in order
    pub fn chat_requests(&self) -> Vec<ChatRequest> {
        self.lock().chat_requests.clone()
    }

    /// Session ids deleted so far
    pub fn deleted(&self) -> Vec<String> {
        self.lock().deleted.clone()
    }

    /// Names of the trait methods called, in order
    pub fn calls(&self) -> Vec<String> {
        self.lock().calls.clone()
    }

    pub fn last_credentials(&self) -> Option<Credentials> {
        self.lock().last_credentials.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, FakeState> {
        self.state.lock().expect("fake backend lock poisoned")
    }

    fn record(&self, call: &str, creds: &Credentials) -> std::sync::MutexGuard<'_, FakeState> {
        let mut state = self.lock();
        state.calls.push(call.to_string());
        state.last_credentials = Some(creds.clone());
        state
    }
}

fn server_error() -> anyhow::Error {
    BizchatError::Api {
        status: 500,
        message: "internal error".to_string(),
    }
    .into()
}

#[async_trait]
impl ChatBackend for FakeChatBackend {
    async fn health(&self, creds: &Credentials) -> Result<HealthResponse> {
        let state = self.record("health", creds);
        match &state.health {
            Some(status) => Ok(HealthResponse {
                status: status.clone(),
            }),
            None => Err(BizchatError::Connection("connection refused".to_string()).into()),
        }
    }

    async fn list_sessions(&self, creds: &Credentials) -> Result<Vec<SessionSummary>> {
        let state = self.record("list_sessions", creds);
        if state.fail_sessions {
            return Err(server_error());
        }
        Ok(state.sessions.clone())
    }

    async fn get_conversation(
        &self,
        creds: &Credentials,
        session_id: &str,
    ) -> Result<ConversationResponse> {
        let state = self.record("get_conversation", creds);
        state.transcripts.get(session_id).cloned().ok_or_else(|| {
            BizchatError::Api {
                status: 404,
                message: format!("session {} not found", session_id),
            }
            .into()
        })
    }

    async fn chat(&self, creds: &Credentials, request: &ChatRequest) -> Result<ChatResponse> {
        {
            let mut state = self.record("chat", creds);
            state.chat_requests.push(request.clone());
        }

        if let Some(gate) = &self.gate {
            gate.entered.notify_one();
            gate.release.notified().await;
        }

        let mut state = self.lock();
        if state.fail_chat {
            return Err(server_error());
        }
        Ok(state.chat_responses.pop_front().unwrap_or_default())
    }

    async fn delete_session(&self, creds: &Credentials, session_id: &str) -> Result<()> {
        let mut state = self.record("delete_session", creds);
        if state.fail_delete {
            return Err(server_error());
        }
        state.deleted.push(session_id.to_string());
        Ok(())
    }
}
