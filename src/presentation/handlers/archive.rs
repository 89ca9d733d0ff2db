use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde::Serialize;
use uuid::Uuid;

use crate::application::ports::{BlobStoreError, MediaTool};
use crate::domain::TranscriptId;
use crate::presentation::state::AppState;

#[derive(Serialize)]
pub struct ArchiveResponse {
    pub blob_id: String,
    pub web_link: Option<String>,
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Upload a persisted transcript to the configured blob store. Only valid
/// once a final transcript exists; the pipeline itself never touches the
/// blob store.
#[tracing::instrument(skip(state))]
pub async fn archive_transcript_handler<M>(
    State(state): State<AppState<M>>,
    Path(transcript_id): Path<String>,
) -> impl IntoResponse
where
    M: MediaTool + 'static,
{
    let blob_store = match &state.blob_store {
        Some(store) => store,
        None => {
            return (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ErrorResponse {
                    error: "Blob storage not configured".to_string(),
                }),
            )
                .into_response();
        }
    };

    let uuid = match Uuid::parse_str(&transcript_id) {
        Ok(u) => u,
        Err(_) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse {
                    error: format!("Invalid transcript ID: {}", transcript_id),
                }),
            )
                .into_response();
        }
    };

    let record = match state
        .transcript_repository
        .get_by_id(TranscriptId::from_uuid(uuid))
        .await
    {
        Ok(Some(record)) => record,
        Ok(None) => {
            return (
                StatusCode::NOT_FOUND,
                Json(ErrorResponse {
                    error: format!("Transcript not found: {}", transcript_id),
                }),
            )
                .into_response();
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to fetch transcript for archive");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: format!("Failed to fetch transcript: {}", e),
                }),
            )
                .into_response();
        }
    };

    let blob_name = format!("{}.txt", record.filename);
    match blob_store
        .upload(
            record.transcript.as_bytes(),
            &blob_name,
            state.drive_folder_id.as_deref(),
        )
        .await
    {
        Ok(blob) => {
            tracing::info!(blob_id = %blob.id, "Transcript archived");
            (
                StatusCode::OK,
                Json(ArchiveResponse {
                    blob_id: blob.id,
                    web_link: blob.web_link,
                }),
            )
                .into_response()
        }
        Err(e @ BlobStoreError::Unauthorized(_)) => (
            StatusCode::BAD_GATEWAY,
            Json(ErrorResponse {
                error: format!("Blob store rejected credentials: {}", e),
            }),
        )
            .into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Blob upload failed");
            (
                StatusCode::BAD_GATEWAY,
                Json(ErrorResponse {
                    error: format!("Blob upload failed: {}", e),
                }),
            )
                .into_response()
        }
    }
}
