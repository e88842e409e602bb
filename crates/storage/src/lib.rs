//! House Keeper image upload client.
//!
//! Uploads item and location photos to `POST /uploads/images`. The backend only
//! accepts image content types and answers with the stored file name plus a
//! server-relative URL; that URL resolves against the service root, not the API
//! prefix, so this client rewrites it to an absolute one before returning.

use std::path::Path;

use bytes::Bytes;
use house_keeper_auth::SessionStore;
use log::debug;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use thiserror::Error;
use tokio::fs::File;
use tokio::io::AsyncReadExt;

pub type Result<T> = std::result::Result<T, StorageError>;

#[derive(Error, Debug)]
pub enum StorageError {
    /// The file does not look like an image the backend would accept. Checked
    /// locally from the extension before any bytes go over the wire.
    #[error("Not an image file: {0}")]
    NotAnImage(String),

    #[error("Not signed in")]
    MissingSession,

    #[error("Session rejected by the backend")]
    Unauthorized,

    #[error("API error: {detail} (status {status})")]
    Api { status: StatusCode, detail: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Response of a successful image upload, with the URL already resolved to an
/// absolute one.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct UploadedImage {
    pub filename: String,
    pub url: String,
}

/// Client for the `/uploads` endpoints.
pub struct StorageClient {
    base_url: String,
    api_url: String,
    http_client: Client,
    store: SessionStore,
}

impl StorageClient {
    /// Create a new storage client. `base_url` is the service root (no API
    /// prefix); `api_prefix` is appended for the upload endpoint itself.
    pub fn new(base_url: &str, api_prefix: &str, http_client: Client, store: SessionStore) -> Self {
        let base_url = base_url.trim_end_matches('/').to_string();
        let api_url = format!("{}{}", base_url, api_prefix);
        Self {
            base_url,
            api_url,
            http_client,
            store,
        }
    }

    /// Upload an image from disk. The extension decides the content type; files
    /// that are not recognizable images are rejected without a request.
    pub async fn upload_image(&self, file_path: &Path) -> Result<UploadedImage> {
        let file_name = file_path
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .ok_or_else(|| StorageError::NotAnImage(file_path.display().to_string()))?;

        let mut file = File::open(file_path).await?;
        let mut contents = Vec::new();
        file.read_to_end(&mut contents).await?;

        self.upload_image_bytes(&file_name, Bytes::from(contents))
            .await
    }

    /// Upload image bytes under a file name. The name's extension decides the
    /// content type.
    pub async fn upload_image_bytes(&self, file_name: &str, bytes: Bytes) -> Result<UploadedImage> {
        let content_type = image_content_type(file_name)
            .ok_or_else(|| StorageError::NotAnImage(file_name.to_string()))?;
        let token = self
            .store
            .access_token()
            .ok_or(StorageError::MissingSession)?;

        let url = format!("{}/uploads/images", self.api_url);
        debug!("POST {} ({}, {} bytes)", url, content_type, bytes.len());

        let part = Part::bytes(bytes.to_vec())
            .file_name(file_name.to_string())
            .mime_str(content_type)?;
        let form = Form::new().part("file", part);

        let response = self
            .http_client
            .post(&url)
            .bearer_auth(&token)
            .multipart(form)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(self.api_error(response).await);
        }

        let mut uploaded: UploadedImage = response.json().await?;
        uploaded.url = self.resolve_url(&uploaded.url);
        Ok(uploaded)
    }

    /// Turn a server-relative image URL into an absolute one. Absolute URLs pass
    /// through untouched.
    pub fn resolve_url(&self, url: &str) -> String {
        if url.starts_with("http://") || url.starts_with("https://") {
            url.to_string()
        } else {
            format!("{}{}", self.base_url, url)
        }
    }

    async fn api_error(&self, response: reqwest::Response) -> StorageError {
        let status = response.status();
        let detail = detail_from_body(&response.text().await.unwrap_or_default());
        match status {
            StatusCode::UNAUTHORIZED => {
                self.store.invalidate();
                StorageError::Unauthorized
            }
            _ => StorageError::Api { status, detail },
        }
    }
}

/// Content type for a file name with an image extension, or `None` when the
/// backend would refuse it anyway.
fn image_content_type(file_name: &str) -> Option<&'static str> {
    let extension = Path::new(file_name).extension()?.to_str()?.to_lowercase();
    match extension.as_str() {
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        "bmp" => Some("image/bmp"),
        "svg" => Some("image/svg+xml"),
        _ => None,
    }
}

fn detail_from_body(text: &str) -> String {
    match serde_json::from_str::<serde_json::Value>(text) {
        Ok(value) => match value.get("detail") {
            Some(serde_json::Value::String(detail)) => detail.clone(),
            Some(other) => other.to_string(),
            None => text.to_string(),
        },
        Err(_) => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use house_keeper_auth::SessionStore;

    #[test]
    fn content_types_follow_the_extension() {
        assert_eq!(image_content_type("photo.JPG"), Some("image/jpeg"));
        assert_eq!(image_content_type("photo.png"), Some("image/png"));
        assert_eq!(image_content_type("notes.txt"), None);
        assert_eq!(image_content_type("no-extension"), None);
    }

    #[test]
    fn relative_urls_resolve_against_the_service_root() {
        let client = StorageClient::new(
            "http://localhost:8000/",
            "/api/v1",
            Client::new(),
            SessionStore::new(),
        );

        assert_eq!(
            client.resolve_url("/uploads/images/abc.png"),
            "http://localhost:8000/uploads/images/abc.png"
        );
        assert_eq!(
            client.resolve_url("https://cdn.example.com/abc.png"),
            "https://cdn.example.com/abc.png"
        );
    }
}
