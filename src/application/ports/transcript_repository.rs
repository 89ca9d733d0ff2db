use async_trait::async_trait;

use crate::domain::{TranscriptId, TranscriptRecord};

/// Durable store for completed transcripts. Append-only; inserts are atomic
/// and independent, so concurrent runs never need cross-run locking.
#[async_trait]
pub trait TranscriptRepository: Send + Sync {
    async fn save(&self, record: &TranscriptRecord) -> Result<(), RepositoryError>;

    async fn get_by_id(&self, id: TranscriptId) -> Result<Option<TranscriptRecord>, RepositoryError>;

    /// Most recent first, by `created_at` descending.
    async fn list_recent(&self, limit: u32) -> Result<Vec<TranscriptRecord>, RepositoryError>;
}

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("database connection failed: {0}")]
    ConnectionFailed(String),
    #[error("query failed: {0}")]
    QueryFailed(String),
}
