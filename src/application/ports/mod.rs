mod blob_store;
mod media_tool;
mod transcript_repository;
mod transcription_provider;

pub use blob_store::{BlobStore, BlobStoreError, StoredBlob};
pub use media_tool::{AudioEncoding, MediaTool, ProbeError, TransformError, TransformSpec};
pub use transcript_repository::{RepositoryError, TranscriptRepository};
pub use transcription_provider::{ProviderError, TranscriptionProvider};
