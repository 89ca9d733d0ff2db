use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Row};
use tracing::instrument;
use uuid::Uuid;

use crate::application::ports::{RepositoryError, TranscriptRepository};
use crate::domain::{TranscriptId, TranscriptRecord};

/// Append-only transcript store. Single-row inserts, no cross-run
/// transactions: persistence happens once per run, after reassembly.
pub struct PgTranscriptRepository {
    pool: PgPool,
}

impl PgTranscriptRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Idempotent schema setup for deployments without a migration runner.
    pub async fn ensure_schema(&self) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS transcripts (
                id UUID PRIMARY KEY,
                filename TEXT NOT NULL,
                transcript TEXT NOT NULL,
                created_at TIMESTAMPTZ NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?;

        Ok(())
    }
}

fn row_to_record(row: &sqlx::postgres::PgRow) -> Result<TranscriptRecord, RepositoryError> {
    let id: Uuid = row
        .try_get("id")
        .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?;
    let filename: String = row
        .try_get("filename")
        .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?;
    let transcript: String = row
        .try_get("transcript")
        .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?;
    let created_at: DateTime<Utc> = row
        .try_get("created_at")
        .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?;

    Ok(TranscriptRecord {
        id: TranscriptId::from_uuid(id),
        filename,
        transcript,
        created_at,
    })
}

#[async_trait]
impl TranscriptRepository for PgTranscriptRepository {
    #[instrument(skip(self, record), fields(transcript_id = %record.id.as_uuid()))]
    async fn save(&self, record: &TranscriptRecord) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"
            INSERT INTO transcripts (id, filename, transcript, created_at)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(record.id.as_uuid())
        .bind(&record.filename)
        .bind(&record.transcript)
        .bind(record.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?;

        Ok(())
    }

    #[instrument(skip(self), fields(transcript_id = %id.as_uuid()))]
    async fn get_by_id(
        &self,
        id: TranscriptId,
    ) -> Result<Option<TranscriptRecord>, RepositoryError> {
        let row = sqlx::query(
            r#"
            SELECT id, filename, transcript, created_at
            FROM transcripts
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?;

        row.as_ref().map(row_to_record).transpose()
    }

    #[instrument(skip(self))]
    async fn list_recent(&self, limit: u32) -> Result<Vec<TranscriptRecord>, RepositoryError> {
        let rows = sqlx::query(
            r#"
            SELECT id, filename, transcript, created_at
            FROM transcripts
            ORDER BY created_at DESC
            LIMIT $1
            "#,
        )
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?;

        rows.iter().map(row_to_record).collect()
    }
}
