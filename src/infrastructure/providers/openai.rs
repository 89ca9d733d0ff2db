use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart;

use crate::application::ports::{AudioEncoding, ProviderError, TranscriptionProvider};

/// OpenAI Whisper over the `/audio/transcriptions` endpoint: bearer auth,
/// multipart form, plain-text response. Accepts most containers, so segments
/// are fed to it as compressed mp3.
pub struct OpenAiProvider {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl OpenAiProvider {
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
            base_url: base_url.unwrap_or_else(|| "https://api.openai.com/v1".to_string()),
            model: model.unwrap_or_else(|| "whisper-1".to_string()),
        }
    }
}

#[async_trait]
impl TranscriptionProvider for OpenAiProvider {
    async fn transcribe(
        &self,
        audio_path: &Path,
        context_prompt: Option<&str>,
    ) -> Result<String, ProviderError> {
        let url = format!("{}/audio/transcriptions", self.base_url);

        let audio_data = tokio::fs::read(audio_path).await?;
        let file_name = audio_path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("audio")
            .to_string();

        let file_part = multipart::Part::bytes(audio_data)
            .file_name(file_name)
            .mime_str(mime_for(audio_path))
            .map_err(|e| ProviderError::RequestFailed {
                status: None,
                message: format!("mime: {}", e),
            })?;

        let mut form = multipart::Form::new()
            .text("model", self.model.clone())
            .text("response_format", "text")
            .part("file", file_part);
        if let Some(prompt) = context_prompt {
            form = form.text("prompt", prompt.to_string());
        }

        tracing::debug!(
            model = %self.model,
            has_context = context_prompt.is_some(),
            "Sending audio to OpenAI Whisper API"
        );

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .multipart(form)
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

        let transcript = response.text().await.map_err(map_reqwest_error)?;

        tracing::info!(
            chars = transcript.len(),
            "OpenAI Whisper transcription completed"
        );

        Ok(transcript.trim().to_string())
    }

    fn preferred_encoding(&self) -> AudioEncoding {
        AudioEncoding::mp3_mono_16k(64)
    }

    fn name(&self) -> &str {
        "openai"
    }
}

/// Content type inferred from the file extension. Transformed files always
/// carry the extension of their target encoding, so this stays accurate for
/// everything the pipeline produces.
pub(super) fn mime_for(path: &Path) -> &'static str {
    match path.extension().and_then(|e| e.to_str()) {
        Some("wav") => "audio/wav",
        Some("mp3") => "audio/mpeg",
        Some("flac") => "audio/flac",
        Some("ogg") | Some("oga") => "audio/ogg",
        Some("m4a") | Some("mp4") => "audio/mp4",
        Some("webm") => "audio/webm",
        _ => "application/octet-stream",
    }
}

pub(super) fn map_reqwest_error(e: reqwest::Error) -> ProviderError {
    if e.is_timeout() {
        ProviderError::Timeout
    } else {
        ProviderError::RequestFailed {
            status: e.status().map(|s| s.as_u16()),
            message: e.to_string(),
        }
    }
}
