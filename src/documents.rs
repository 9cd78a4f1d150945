//! Document storage client
//!
//! Thin client for the object-storage proxy that sits next to the chat
//! backend. Uploads go up as multipart forms and come back as storage keys;
//! keys can be deleted or exchanged for a short-lived signed download URL.
//! The conversation store never depends on this module.

use crate::api::http::{endpoint, API_KEY_HEADER, CLIENT_ID_HEADER};
use crate::config::{ApiConfig, DocumentsConfig};
use crate::error::{BizchatError, Result};

use reqwest::{Client, RequestBuilder, Response};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Deserialize)]
struct UploadResponse {
    key: String,
}

#[derive(Debug, Deserialize)]
struct SignedUrlResponse {
    url: String,
}

#[derive(Debug, Deserialize)]
struct StorageTestResponse {
    #[serde(default)]
    success: bool,
}

/// Client for the document storage proxy
#[derive(Debug, Clone)]
pub struct DocumentClient {
    client: Client,
    host: String,
    api_key: String,
    client_id: String,
    max_upload_bytes: u64,
}

impl DocumentClient {
    /// Create a client from the storage and API configuration
    ///
    /// The API key and client id are shared with the chat backend.
    ///
    /// # Errors
    ///
    /// Returns error if HTTP client initialization fails
    pub fn new(documents: &DocumentsConfig, api: &ApiConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(api.timeout_seconds))
            .user_agent(concat!("bizchat/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| BizchatError::Document(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            host: documents.host.clone(),
            api_key: api.api_key.clone(),
            client_id: api.client_id.clone(),
            max_upload_bytes: documents.max_upload_bytes,
        })
    }

    fn authorized(&self, builder: RequestBuilder) -> RequestBuilder {
        builder
            .header(API_KEY_HEADER, &self.api_key)
            .header(CLIENT_ID_HEADER, &self.client_id)
    }

    async fn send(&self, builder: RequestBuilder, what: &str) -> Result<Response> {
        let response = self.authorized(builder).send().await.map_err(|e| {
            tracing::warn!("Document storage request {} failed: {}", what, e);
            BizchatError::Connection(format!("Failed to reach document storage: {}", e))
        })?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(BizchatError::Api {
                status: status.as_u16(),
                message,
            }
            .into());
        }

        Ok(response)
    }

    /// Upload a file and return its storage key
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be read, exceeds the configured size
    /// limit, or the proxy rejects it
    pub async fn upload(&self, path: &Path) -> Result<String> {
        let size = tokio::fs::metadata(path)
            .await
            .map_err(BizchatError::Io)?
            .len();
        if size > self.max_upload_bytes {
            return Err(BizchatError::Document(format!(
                "{} is {} bytes; the limit is {} bytes",
                path.display(),
                size,
                self.max_upload_bytes
            ))
            .into());
        }

        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .ok_or_else(|| {
                BizchatError::InvalidInput(format!("{} has no file name", path.display()))
            })?;
        let content = tokio::fs::read(path).await.map_err(BizchatError::Io)?;

        let part = reqwest::multipart::Part::bytes(content)
            .file_name(file_name.clone())
            .mime_str("application/octet-stream")
            .map_err(|e| BizchatError::Document(e.to_string()))?;
        let form = reqwest::multipart::Form::new().part("file", part);

        tracing::info!("Uploading {} ({} bytes)", file_name, size);
        let url = endpoint(&self.host, "api/upload");
        let response = self
            .send(self.client.post(&url).multipart(form), "upload")
            .await?;
        let body: UploadResponse = response.json().await.map_err(BizchatError::Http)?;

        tracing::debug!("Stored {} under key {}", file_name, body.key);
        Ok(body.key)
    }

    /// Delete a stored document
    pub async fn delete(&self, key: &str) -> Result<()> {
        let url = endpoint(&self.host, "api/files");
        self.send(self.client.delete(&url).query(&[("key", key)]), "delete")
            .await?;
        tracing::info!("Deleted document {}", key);
        Ok(())
    }

    /// Exchange a storage key for a signed download URL
    pub async fn signed_url(&self, key: &str) -> Result<String> {
        let url = endpoint(&self.host, "api/files/signed-url");
        let response = self
            .send(self.client.get(&url).query(&[("key", key)]), "signed-url")
            .await?;
        let body: SignedUrlResponse = response.json().await.map_err(BizchatError::Http)?;
        Ok(body.url)
    }

    /// Check that the proxy can reach its storage bucket
    ///
    /// Transport and HTTP failures count as "not connected" rather than errors.
    pub async fn test_connection(&self) -> bool {
        let url = endpoint(&self.host, "api/storage/test");
        match self.send(self.client.get(&url), "storage-test").await {
            Ok(response) => match response.json::<StorageTestResponse>().await {
                Ok(body) => body.success,
                Err(e) => {
                    tracing::warn!("Unexpected storage test response: {}", e);
                    false
                }
            },
            Err(e) => {
                tracing::warn!("Storage connection test failed: {}", e);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn test_upload_rejects_oversized_file_before_request() {
        let documents = DocumentsConfig {
            // Nothing listens here; the size check must fail first.
            host: "http://127.0.0.1:9".to_string(),
            max_upload_bytes: 4,
        };
        let client = DocumentClient::new(&documents, &ApiConfig::default()).unwrap();

        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"more than four bytes").unwrap();

        let err = client.upload(file.path()).await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<BizchatError>(),
            Some(BizchatError::Document(_))
        ));
    }

    #[tokio::test]
    async fn test_upload_missing_file_is_io_error() {
        let client =
            DocumentClient::new(&DocumentsConfig::default(), &ApiConfig::default()).unwrap();
        let err = client
            .upload(Path::new("/nonexistent/report.pdf"))
            .await
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<BizchatError>(),
            Some(BizchatError::Io(_))
        ));
    }
}
