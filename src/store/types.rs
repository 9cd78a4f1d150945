//! Local view-state types held by the conversation store

use crate::api::Credentials;
use crate::config::ApiConfig;
use crate::store::title::{derive_title, PLACEHOLDER_TITLE};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Author of a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    /// Parse a backend role string; roles other than user/assistant yield `None`
    ///
    /// # Examples
    ///
    /// ```
    /// use bizchat::store::Role;
    ///
    /// assert_eq!(Role::parse_str("USER"), Some(Role::User));
    /// assert_eq!(Role::parse_str("system"), None);
    /// ```
    pub fn parse_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "user" => Some(Role::User),
            "assistant" => Some(Role::Assistant),
            _ => None,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::User => write!(f, "user"),
            Role::Assistant => write!(f, "assistant"),
        }
    }
}

/// One message in a conversation; never modified after append
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl Message {
    /// Create a message stamped with the current time
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }
}

/// A conversation as the front-end shows it
///
/// `id` is either a temporary client id or a server session id. Messages
/// keep append order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conversation {
    pub id: String,
    pub title: String,
    pub messages: Vec<Message>,
    pub created_at: DateTime<Utc>,
    pub last_updated_at: DateTime<Utc>,
}

impl Conversation {
    /// Create an empty conversation
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            messages: Vec::new(),
            created_at,
            last_updated_at: created_at,
        }
    }

    /// Whether the title is still the generic placeholder
    pub fn has_placeholder_title(&self) -> bool {
        self.title.is_empty() || self.title == PLACEHOLDER_TITLE
    }

    /// Append a message and bump `last_updated_at`
    ///
    /// The first user message replaces a placeholder title; later
    /// messages never touch it.
    pub fn push_message(&mut self, message: Message) {
        if message.role == Role::User && self.has_placeholder_title() {
            self.title = derive_title(&message.content);
        }
        self.last_updated_at = message.timestamp;
        self.messages.push(message);
    }
}

/// Process-wide connection credentials and status
#[derive(Clone, Default, PartialEq, Eq)]
pub struct ConnectionState {
    pub api_host: String,
    pub api_key: String,
    pub user_id: String,
    pub is_connected: bool,
    pub connection_error: Option<String>,
}

impl ConnectionState {
    /// Build a disconnected state from the API configuration
    pub fn from_config(config: &ApiConfig) -> Self {
        Self {
            api_host: config.host.clone(),
            api_key: config.api_key.clone(),
            user_id: config.user_id.clone(),
            ..Default::default()
        }
    }

    /// Credentials to attach to backend calls
    pub fn credentials(&self) -> Credentials {
        Credentials::new(&self.api_host, &self.api_key, &self.user_id)
    }
}

// The key stays out of logs.
impl fmt::Debug for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionState")
            .field("api_host", &self.api_host)
            .field("api_key", &"<redacted>")
            .field("user_id", &self.user_id)
            .field("is_connected", &self.is_connected)
            .field("connection_error", &self.connection_error)
            .finish()
    }
}

/// Result of a store operation that performs I/O
///
/// Store operations never fail the caller; a failed backend call degrades
/// to the previous (stale) local view and reports why.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperationOutcome {
    /// The backend answered and local state was merged
    Applied,
    /// The backend call failed; local state was left as described by the operation
    Failed { reason: String },
}

impl OperationOutcome {
    /// Build a failure from anything displayable
    pub fn failed(reason: impl fmt::Display) -> Self {
        OperationOutcome::Failed {
            reason: reason.to_string(),
        }
    }

    /// Whether the operation was applied
    pub fn is_applied(&self) -> bool {
        matches!(self, OperationOutcome::Applied)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_display_and_parse() {
        assert_eq!(Role::User.to_string(), "user");
        assert_eq!(Role::parse_str("assistant"), Some(Role::Assistant));
        assert_eq!(Role::parse_str("tool"), None);
    }

    #[test]
    fn test_first_user_message_sets_placeholder_title_once() {
        let mut conversation = Conversation::new("c1", PLACEHOLDER_TITLE, Utc::now());
        conversation.push_message(Message::new(Role::Assistant, "Welcome"));
        assert!(conversation.has_placeholder_title());

        conversation.push_message(Message::new(Role::User, "Quarterly numbers"));
        assert_eq!(conversation.title, "Quarterly numbers");

        conversation.push_message(Message::new(Role::User, "Something else"));
        assert_eq!(conversation.title, "Quarterly numbers");
        assert_eq!(conversation.messages.len(), 3);
    }

    #[test]
    fn test_push_message_bumps_last_updated() {
        let created = Utc::now() - chrono::Duration::hours(1);
        let mut conversation = Conversation::new("c1", "Title", created);
        let message = Message::new(Role::User, "hi");
        let stamp = message.timestamp;
        conversation.push_message(message);
        assert_eq!(conversation.created_at, created);
        assert_eq!(conversation.last_updated_at, stamp);
    }

    #[test]
    fn test_connection_state_debug_redacts_key() {
        let state = ConnectionState {
            api_key: "super-secret".to_string(),
            ..Default::default()
        };
        let rendered = format!("{:?}", state);
        assert!(!rendered.contains("super-secret"));
        assert!(rendered.contains("<redacted>"));
    }

    #[test]
    fn test_operation_outcome_helpers() {
        assert!(OperationOutcome::Applied.is_applied());
        let failed = OperationOutcome::failed("boom");
        assert!(!failed.is_applied());
        assert_eq!(
            failed,
            OperationOutcome::Failed {
                reason: "boom".to_string()
            }
        );
    }
}
