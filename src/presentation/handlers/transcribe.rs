use std::convert::Infallible;

use axum::Json;
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::response::{IntoResponse, Response};
use bytes::Bytes;
use futures::StreamExt;
use serde::Serialize;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tokio_util::sync::CancellationToken;

use crate::application::ports::MediaTool;
use crate::application::services::{PipelineEvent, UploadedAudio};
use crate::presentation::state::AppState;

const EVENT_CHANNEL_CAPACITY: usize = 32;

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

struct UploadForm {
    data: Bytes,
    filename: String,
    mime_hint: Option<String>,
    provider_override: Option<String>,
}

/// Accepts one audio file as multipart and responds with an SSE stream of
/// pipeline events: progress records delivered as they happen, then a single
/// `completed` or `failed` event. Client disconnect cancels the run at its
/// next suspension point; cleanup still happens inside the pipeline.
#[tracing::instrument(skip(state, multipart))]
pub async fn transcribe_handler<M>(
    State(state): State<AppState<M>>,
    multipart: Multipart,
) -> Response
where
    M: MediaTool + 'static,
{
    let form = match read_upload_form(multipart).await {
        Ok(form) => form,
        Err(response) => return response,
    };

    if let Some(requested) = &form.provider_override {
        if requested != state.provider.name() {
            tracing::warn!(requested = %requested, "Requested provider not configured");
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse {
                    error: format!("Provider not configured: {}", requested),
                }),
            )
                .into_response();
        }
    }

    tracing::info!(
        filename = %form.filename,
        bytes = form.data.len(),
        provider = %state.provider.name(),
        "Transcription run accepted"
    );

    let (events_tx, events_rx) = mpsc::channel::<PipelineEvent>(EVENT_CHANNEL_CAPACITY);
    let cancel = CancellationToken::new();

    let upload = UploadedAudio {
        data: form.data,
        filename: form.filename,
        mime_hint: form.mime_hint,
    };
    let pipeline = state.pipeline;
    let provider = state.provider;
    let run_cancel = cancel.clone();
    tokio::spawn(async move {
        pipeline.run(upload, provider, events_tx, run_cancel).await;
    });

    // Dropping the response stream (client gone) cancels the run.
    let guard = cancel.drop_guard();
    let stream = ReceiverStream::new(events_rx).map(move |event| {
        let _keep_alive = &guard;
        Ok::<Event, Infallible>(to_sse_event(&event))
    });

    Sse::new(stream).keep_alive(KeepAlive::default()).into_response()
}

async fn read_upload_form(mut multipart: Multipart) -> Result<UploadForm, Response> {
    let mut file: Option<(Bytes, String, Option<String>)> = None;
    let mut provider_override: Option<String> = None;

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(f)) => f,
            Ok(None) => break,
            Err(e) => {
                tracing::error!(error = %e, "Failed to read multipart");
                return Err(bad_request(format!("Failed to read multipart: {}", e)));
            }
        };

        match field.name() {
            Some("file") => {
                let filename = field.file_name().unwrap_or("unknown").to_string();
                let mime_hint = field.content_type().map(String::from);
                let data = field.bytes().await.map_err(|e| {
                    tracing::error!(error = %e, "Failed to read file bytes");
                    bad_request(format!("Failed to read file: {}", e))
                })?;
                file = Some((data, filename, mime_hint));
            }
            Some("provider") => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| bad_request(format!("Failed to read provider field: {}", e)))?;
                provider_override = Some(value.trim().to_lowercase());
            }
            _ => {}
        }
    }

    let (data, filename, mime_hint) = file.ok_or_else(|| {
        tracing::warn!("Transcription request with no file");
        bad_request("No file uploaded".to_string())
    })?;
    if data.is_empty() {
        return Err(bad_request("Uploaded file is empty".to_string()));
    }

    Ok(UploadForm {
        data,
        filename,
        mime_hint,
        provider_override,
    })
}

fn bad_request(error: String) -> Response {
    (StatusCode::BAD_REQUEST, Json(ErrorResponse { error })).into_response()
}

fn to_sse_event(event: &PipelineEvent) -> Event {
    let name = match event {
        PipelineEvent::Progress { .. } => "progress",
        PipelineEvent::Completed(_) => "completed",
        PipelineEvent::Failed { .. } => "failed",
    };
    match Event::default().event(name).json_data(event) {
        Ok(sse_event) => sse_event,
        Err(e) => {
            tracing::error!(error = %e, "Failed to serialize pipeline event");
            Event::default()
                .event("failed")
                .data("{\"type\":\"failed\",\"message\":\"event serialization error\"}")
        }
    }
}
