use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::application::ports::MediaTool;
use crate::domain::{TranscriptId, TranscriptRecord};
use crate::presentation::state::AppState;

const DEFAULT_LIMIT: u32 = 50;

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    pub limit: Option<u32>,
}

#[derive(Serialize)]
pub struct HistoryResponse {
    pub transcripts: Vec<TranscriptSummary>,
}

/// Listing omits the transcript body; fetch one record for the full text.
#[derive(Serialize)]
pub struct TranscriptSummary {
    pub id: String,
    pub filename: String,
    pub transcript_chars: usize,
    pub created_at: String,
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl From<&TranscriptRecord> for TranscriptSummary {
    fn from(record: &TranscriptRecord) -> Self {
        Self {
            id: record.id.as_uuid().to_string(),
            filename: record.filename.clone(),
            transcript_chars: record.transcript.chars().count(),
            created_at: record.created_at.to_rfc3339(),
        }
    }
}

#[tracing::instrument(skip(state))]
pub async fn list_transcripts_handler<M>(
    State(state): State<AppState<M>>,
    Query(query): Query<HistoryQuery>,
) -> impl IntoResponse
where
    M: MediaTool + 'static,
{
    let limit = query.limit.unwrap_or(DEFAULT_LIMIT).min(500);

    match state.transcript_repository.list_recent(limit).await {
        Ok(records) => {
            let transcripts = records.iter().map(TranscriptSummary::from).collect();
            (StatusCode::OK, Json(HistoryResponse { transcripts })).into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to list transcripts");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: format!("Failed to list transcripts: {}", e),
                }),
            )
                .into_response()
        }
    }
}

#[derive(Serialize)]
pub struct TranscriptResponse {
    pub id: String,
    pub filename: String,
    pub transcript: String,
    pub created_at: String,
}

#[tracing::instrument(skip(state))]
pub async fn get_transcript_handler<M>(
    State(state): State<AppState<M>>,
    Path(transcript_id): Path<String>,
) -> impl IntoResponse
where
    M: MediaTool + 'static,
{
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

    match state
        .transcript_repository
        .get_by_id(TranscriptId::from_uuid(uuid))
        .await
    {
        Ok(Some(record)) => (
            StatusCode::OK,
            Json(TranscriptResponse {
                id: record.id.as_uuid().to_string(),
                filename: record.filename,
                transcript: record.transcript,
                created_at: record.created_at.to_rfc3339(),
            }),
        )
            .into_response(),
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: format!("Transcript not found: {}", transcript_id),
            }),
        )
            .into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Failed to fetch transcript");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: format!("Failed to fetch transcript: {}", e),
                }),
            )
                .into_response()
        }
    }
}
