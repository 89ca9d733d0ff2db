use async_trait::async_trait;

/// Drive-like blob storage, consumed only after a final transcript exists.
#[async_trait]
pub trait BlobStore: Send + Sync {
    async fn upload(
        &self,
        data: &[u8],
        name: &str,
        folder_id: Option<&str>,
    ) -> Result<StoredBlob, BlobStoreError>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct StoredBlob {
    pub id: String,
    pub web_link: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum BlobStoreError {
    #[error("upload failed: {0}")]
    UploadFailed(String),
    #[error("unauthorized: {0}")]
    Unauthorized(String),
}
