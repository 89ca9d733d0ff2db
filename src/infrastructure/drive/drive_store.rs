use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart;
use serde::Deserialize;
use serde_json::json;

use crate::application::ports::{BlobStore, BlobStoreError, StoredBlob};

const UPLOAD_URL: &str =
    "https://www.googleapis.com/upload/drive/v3/files?uploadType=multipart&fields=id,webViewLink";

/// Google Drive v3 multipart upload: a JSON metadata part (name, parent
/// folder) plus the file bytes, bearer-authenticated.
pub struct GoogleDriveStore {
    client: reqwest::Client,
    access_token: String,
    upload_url: String,
}

impl GoogleDriveStore {
    pub fn new(access_token: String, timeout: Duration) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(timeout)
                .build()
                .unwrap_or_default(),
            access_token,
            upload_url: UPLOAD_URL.to_string(),
        }
    }

    /// Test hook: point the store at a mock endpoint.
    pub fn with_upload_url(mut self, upload_url: impl Into<String>) -> Self {
        self.upload_url = upload_url.into();
        self
    }
}

#[derive(Deserialize)]
struct DriveFileResponse {
    id: String,
    #[serde(rename = "webViewLink")]
    web_view_link: Option<String>,
}

#[async_trait]
impl BlobStore for GoogleDriveStore {
    async fn upload(
        &self,
        data: &[u8],
        name: &str,
        folder_id: Option<&str>,
    ) -> Result<StoredBlob, BlobStoreError> {
        let mut metadata = json!({ "name": name });
        if let Some(folder) = folder_id {
            metadata["parents"] = json!([folder]);
        }

        let metadata_part = multipart::Part::text(metadata.to_string())
            .mime_str("application/json; charset=UTF-8")
            .map_err(|e| BlobStoreError::UploadFailed(format!("metadata part: {}", e)))?;
        let media_part = multipart::Part::bytes(data.to_vec())
            .mime_str("application/octet-stream")
            .map_err(|e| BlobStoreError::UploadFailed(format!("media part: {}", e)))?;

        let form = multipart::Form::new()
            .part("metadata", metadata_part)
            .part("media", media_part);

        tracing::debug!(name = %name, bytes = data.len(), "Uploading blob to Drive");

        let response = self
            .client
            .post(&self.upload_url)
            .bearer_auth(&self.access_token)
            .multipart(form)
            .send()
            .await
            .map_err(|e| BlobStoreError::UploadFailed(e.to_string()))?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            let body = response.text().await.unwrap_or_default();
            return Err(BlobStoreError::Unauthorized(body));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(BlobStoreError::UploadFailed(format!(
                "status {}: {}",
                status, body
            )));
        }

        let parsed: DriveFileResponse = response
            .json()
            .await
            .map_err(|e| BlobStoreError::UploadFailed(format!("body: {}", e)))?;

        tracing::info!(file_id = %parsed.id, "Drive upload completed");

        Ok(StoredBlob {
            id: parsed.id,
            web_link: parsed.web_view_link,
        })
    }
}
