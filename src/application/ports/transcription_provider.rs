use std::path::Path;

use async_trait::async_trait;

use super::media_tool::AudioEncoding;

/// One speech-to-text provider behind a uniform interface. The input file
/// must already satisfy the provider's size/duration ceiling; the adapter
/// never self-chunks and never retries internally.
#[async_trait]
pub trait TranscriptionProvider: Send + Sync {
    async fn transcribe(
        &self,
        audio_path: &Path,
        context_prompt: Option<&str>,
    ) -> Result<String, ProviderError>;

    /// The ingest encoding this provider prefers; the segmenter and the
    /// compression pre-step normalize to it.
    fn preferred_encoding(&self) -> AudioEncoding;

    fn name(&self) -> &str;
}

#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("provider request failed (status {status:?}): {message}")]
    RequestFailed {
        status: Option<u16>,
        message: String,
    },
    #[error("provider response malformed: {0}")]
    MalformedResponse(String),
    #[error("provider call timed out")]
    Timeout,
    #[error("io error reading audio file: {0}")]
    Io(#[from] std::io::Error),
}
