use std::sync::Arc;

use crate::application::ports::{BlobStore, MediaTool, TranscriptRepository, TranscriptionProvider};
use crate::application::services::TranscriptionPipeline;

pub struct AppState<M>
where
    M: MediaTool,
{
    pub pipeline: Arc<TranscriptionPipeline<M>>,
    pub provider: Arc<dyn TranscriptionProvider>,
    pub transcript_repository: Arc<dyn TranscriptRepository>,
    /// Present only when archival to the blob store is configured.
    pub blob_store: Option<Arc<dyn BlobStore>>,
    pub drive_folder_id: Option<String>,
}

impl<M> Clone for AppState<M>
where
    M: MediaTool,
{
    fn clone(&self) -> Self {
        Self {
            pipeline: Arc::clone(&self.pipeline),
            provider: Arc::clone(&self.provider),
            transcript_repository: Arc::clone(&self.transcript_repository),
            blob_store: self.blob_store.as_ref().map(Arc::clone),
            drive_folder_id: self.drive_folder_id.clone(),
        }
    }
}
