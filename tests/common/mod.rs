use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use bizchat::api::{Credentials, HttpChatBackend};
use bizchat::config::ApiConfig;
use bizchat::ConversationSessionStore;

pub const API_KEY: &str = "test-key";
pub const USER_ID: &str = "alice";
pub const SESSION_ID: &str = "a1b2c3d4-e5f6-7890-abcd-ef1234567890";

#[allow(dead_code)]
pub fn api_config(host: &str) -> ApiConfig {
    ApiConfig {
        host: host.to_string(),
        api_key: API_KEY.to_string(),
        user_id: USER_ID.to_string(),
        timeout_seconds: 5,
        ..Default::default()
    }
}

/// Store over the real HTTP backend, pointed at a mock server
#[allow(dead_code)]
pub fn http_store(server: &MockServer) -> ConversationSessionStore {
    let backend =
        Arc::new(HttpChatBackend::new(&api_config(&server.uri())).expect("backend builds"));
    ConversationSessionStore::new(backend, Credentials::new(server.uri(), API_KEY, USER_ID))
}

#[allow(dead_code)]
pub async fn mount_healthy(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": "healthy"
        })))
        .mount(server)
        .await;
}

#[allow(dead_code)]
pub fn session_json(session_id: &str, title: &str, message_count: usize) -> serde_json::Value {
    serde_json::json!({
        "session_id": session_id,
        "title": title,
        "created_at": "2024-01-15T09:30:00",
        "last_updated": "2024-01-15T10:00:00",
        "message_count": message_count
    })
}

#[allow(dead_code)]
pub fn temp_config_file(contents: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("failed to create tempdir");
    let config_path = temp_dir.path().join("config.yaml");
    fs::write(&config_path, contents).expect("failed to write config file");
    (temp_dir, config_path)
}
