//! Wire types exchanged with the chat backend

use serde::{Deserialize, Serialize};

/// Response from `GET /health`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Reported status; only `"healthy"` counts as up
    pub status: String,
}

impl HealthResponse {
    /// Whether the backend reported itself healthy
    pub fn is_healthy(&self) -> bool {
        self.status == "healthy"
    }
}

/// Lightweight descriptor of a persisted conversation
///
/// Remote-authoritative. Timestamps are kept as the server's text since
/// the backend does not guarantee an offset suffix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSummary {
    /// Server-assigned session id (canonical UUID)
    pub session_id: String,
    /// Session title
    #[serde(default)]
    pub title: String,
    /// Creation timestamp
    #[serde(default)]
    pub created_at: String,
    /// Last update timestamp
    #[serde(default)]
    pub last_updated: String,
    /// Number of messages stored server-side
    #[serde(default)]
    pub message_count: usize,
}

/// Response from `GET /sessions`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionsResponse {
    #[serde(default)]
    pub sessions: Vec<SessionSummary>,
}

/// A message as the backend stores it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireMessage {
    pub role: String,
    #[serde(default)]
    pub content: String,
}

/// Metadata block attached to a transcript
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationMetadata {
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub last_updated: Option<String>,
    #[serde(default)]
    pub message_count: Option<usize>,
    #[serde(default)]
    pub title: Option<String>,
}

/// Response from `GET /conversation`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationResponse {
    pub session_id: String,
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub messages: Vec<WireMessage>,
    #[serde(default)]
    pub metadata: ConversationMetadata,
}

/// Body of `POST /chat`
///
/// `session_id` is omitted entirely when the conversation is not a known
/// server session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub question: String,
    pub user_id: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub session_id: Option<String>,
}

/// Response from `POST /chat`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    pub generation: String,
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default)]
    pub messages: Vec<WireMessage>,
    #[serde(default)]
    pub db_search: Option<serde_json::Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_request_omits_missing_session_id() {
        let request = ChatRequest {
            question: "hi".to_string(),
            user_id: "u1".to_string(),
            session_id: None,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json, serde_json::json!({"question": "hi", "user_id": "u1"}));
    }

    #[test]
    fn test_health_only_healthy_counts() {
        let up = HealthResponse {
            status: "healthy".to_string(),
        };
        let degraded = HealthResponse {
            status: "degraded".to_string(),
        };
        assert!(up.is_healthy());
        assert!(!degraded.is_healthy());
    }

    #[test]
    fn test_conversation_response_tolerates_missing_metadata() {
        let json = r#"{"session_id":"s1","messages":[{"role":"user","content":"hi"}]}"#;
        let response: ConversationResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.messages.len(), 1);
        assert!(response.metadata.title.is_none());
    }

    #[test]
    fn test_chat_response_with_db_search() {
        let json = r#"{"generation":"ok","session_id":"s1","messages":[],"db_search":{"rows":3}}"#;
        let response: ChatResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.generation, "ok");
        assert_eq!(response.session_id.as_deref(), Some("s1"));
        assert!(response.db_search.is_some());
    }
}
