use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use crate::application::ports::{AudioEncoding, ProviderError, TranscriptionProvider};

use super::openai::{map_reqwest_error, mime_for};

/// Deepgram pre-recorded transcription: `Token` auth header, raw audio bytes
/// body, structured JSON response. Prefers 16 kHz mono WAV ingest but accepts
/// compressed containers; the content type follows the actual file. Has no
/// Whisper-style prompt, so the context prompt is accepted and ignored.
pub struct DeepgramProvider {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl DeepgramProvider {
    pub fn new(
        api_key: String,
        base_url: Option<String>,
        model: Option<String>,
        timeout: Duration,
    ) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(timeout)
                .build()
                .unwrap_or_default(),
            api_key,
            base_url: base_url.unwrap_or_else(|| "https://api.deepgram.com".to_string()),
            model: model.unwrap_or_else(|| "nova-2".to_string()),
        }
    }
}

#[derive(Deserialize)]
struct DeepgramResponse {
    results: DeepgramResults,
}

#[derive(Deserialize)]
struct DeepgramResults {
    channels: Vec<DeepgramChannel>,
}

#[derive(Deserialize)]
struct DeepgramChannel {
    alternatives: Vec<DeepgramAlternative>,
}

#[derive(Deserialize)]
struct DeepgramAlternative {
    transcript: String,
}

#[async_trait]
impl TranscriptionProvider for DeepgramProvider {
    async fn transcribe(
        &self,
        audio_path: &Path,
        _context_prompt: Option<&str>,
    ) -> Result<String, ProviderError> {
        let url = format!(
            "{}/v1/listen?model={}&smart_format=true",
            self.base_url.trim_end_matches('/'),
            self.model
        );

        let audio_data = tokio::fs::read(audio_path).await?;

        tracing::debug!(model = %self.model, bytes = audio_data.len(), "Sending audio to Deepgram");

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Token {}", self.api_key))
            .header("Content-Type", mime_for(audio_path))
            .body(audio_data)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(ProviderError::RequestFailed {
                status: Some(status),
                message: body,
            });
        }

        let parsed: DeepgramResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::MalformedResponse(e.to_string()))?;

        let transcript = parsed
            .results
            .channels
            .first()
            .and_then(|c| c.alternatives.first())
            .map(|a| a.transcript.trim().to_string())
            .ok_or_else(|| {
                ProviderError::MalformedResponse("no channels/alternatives in response".to_string())
            })?;

        tracing::info!(chars = transcript.len(), "Deepgram transcription completed");

        Ok(transcript)
    }

    fn preferred_encoding(&self) -> AudioEncoding {
        AudioEncoding::wav_mono_16k()
    }

    fn name(&self) -> &str {
        "deepgram"
    }
}
