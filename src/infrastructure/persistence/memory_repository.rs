use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::application::ports::{RepositoryError, TranscriptRepository};
use crate::domain::{TranscriptId, TranscriptRecord};

/// In-process transcript store, used when no database is configured.
/// History does not survive a restart.
#[derive(Default)]
pub struct InMemoryTranscriptRepository {
    records: Mutex<Vec<TranscriptRecord>>,
}

impl InMemoryTranscriptRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TranscriptRepository for InMemoryTranscriptRepository {
    async fn save(&self, record: &TranscriptRecord) -> Result<(), RepositoryError> {
        self.records.lock().await.push(record.clone());
        Ok(())
    }

    async fn get_by_id(
        &self,
        id: TranscriptId,
    ) -> Result<Option<TranscriptRecord>, RepositoryError> {
        let records = self.records.lock().await;
        Ok(records.iter().find(|r| r.id == id).cloned())
    }

    async fn list_recent(&self, limit: u32) -> Result<Vec<TranscriptRecord>, RepositoryError> {
        let records = self.records.lock().await;
        let mut sorted: Vec<TranscriptRecord> = records.clone();
        sorted.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        sorted.truncate(limit as usize);
        Ok(sorted)
    }
}
