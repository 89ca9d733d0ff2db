use std::sync::Arc;
use std::time::Duration;

use crate::application::ports::TranscriptionProvider;

use super::deepgram::DeepgramProvider;
use super::openai::OpenAiProvider;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    OpenAi,
    Deepgram,
}

impl ProviderKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::OpenAi => "openai",
            ProviderKind::Deepgram => "deepgram",
        }
    }
}

impl std::str::FromStr for ProviderKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "openai" | "whisper" => Ok(ProviderKind::OpenAi),
            "deepgram" => Ok(ProviderKind::Deepgram),
            other => Err(format!(
                "Unknown transcription provider: {}. Expected: openai or deepgram",
                other
            )),
        }
    }
}

/// Provider differences are configuration, not duplicated control flow: one
/// factory turns a kind + credentials into the uniform adapter.
pub struct ProviderFactory;

impl ProviderFactory {
    pub fn create(
        kind: ProviderKind,
        api_key: String,
        base_url: Option<String>,
        model: Option<String>,
        timeout: Duration,
    ) -> Arc<dyn TranscriptionProvider> {
        match kind {
            ProviderKind::OpenAi => Arc::new(OpenAiProvider::new(api_key, base_url, model, timeout)),
            ProviderKind::Deepgram => {
                Arc::new(DeepgramProvider::new(api_key, base_url, model, timeout))
            }
        }
    }
}
