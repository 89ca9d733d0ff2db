use std::path::{Path, PathBuf};
use std::sync::Arc;

use bytes::Bytes;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::application::ports::{
    MediaTool, ProbeError, ProviderError, TranscriptRepository, TranscriptionProvider,
};
use crate::domain::{
    AudioInfo, AudioSource, SegmentPlan, SegmentPlanError, SegmentTranscript, TranscriptRecord,
    assemble_transcript,
};

use super::events::{FinalResult, PipelineEvent};
use super::policy::PipelinePolicy;
use super::segmenter::{SegmentCreationError, Segmenter};
use super::workspace::RunWorkspace;

/// One uploaded file, as received by the boundary layer. The pipeline stages
/// it into the run workspace and owns it from there.
pub struct UploadedAudio {
    pub data: Bytes,
    pub filename: String,
    pub mime_hint: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("workspace setup failed: {0}")]
    Workspace(std::io::Error),
    #[error("staging upload failed: {0}")]
    Staging(std::io::Error),
    #[error("probe failed: {0}")]
    Probe(#[from] ProbeError),
    #[error("segment planning failed: {0}")]
    Plan(#[from] SegmentPlanError),
    #[error("compression failed: {0}")]
    Compression(crate::application::ports::TransformError),
    #[error(transparent)]
    SegmentCreation(#[from] SegmentCreationError),
    #[error("transcription failed: {0}")]
    Provider(#[from] ProviderError),
    #[error("run cancelled")]
    Cancelled,
}

/// The per-run state machine: stage upload, probe, optionally compress once,
/// then either transcribe directly or split into segments and transcribe
/// them strictly in index order, carrying the last successful transcript
/// tail forward as the next segment's context prompt. Cleanup runs on every
/// exit path.
pub struct TranscriptionPipeline<M> {
    media_tool: Arc<M>,
    segmenter: Segmenter<M>,
    repository: Arc<dyn TranscriptRepository>,
    policy: PipelinePolicy,
    workspace_base: PathBuf,
}

impl<M> TranscriptionPipeline<M>
where
    M: MediaTool,
{
    pub fn new(
        media_tool: Arc<M>,
        repository: Arc<dyn TranscriptRepository>,
        policy: PipelinePolicy,
        workspace_base: PathBuf,
    ) -> Self {
        Self {
            segmenter: Segmenter::new(Arc::clone(&media_tool)),
            media_tool,
            repository,
            policy,
            workspace_base,
        }
    }

    pub fn policy(&self) -> &PipelinePolicy {
        &self.policy
    }

    /// Drives one run to a terminal event. Every outcome, including errors
    /// and cancellation, is reported through `events`; the channel closing
    /// early (caller gone) never aborts in-flight work by itself — the
    /// cancellation token does.
    pub async fn run(
        &self,
        upload: UploadedAudio,
        provider: Arc<dyn TranscriptionProvider>,
        events: mpsc::Sender<PipelineEvent>,
        cancel: CancellationToken,
    ) {
        let mut progress = ProgressReporter::new(events.clone());

        let result = self
            .execute(upload, provider, &mut progress, &cancel)
            .await;

        let terminal = match result {
            Ok(final_result) => PipelineEvent::Completed(final_result),
            Err(e) => {
                tracing::error!(error = %e, "Pipeline run failed");
                PipelineEvent::Failed {
                    message: e.to_string(),
                }
            }
        };
        let _ = events.send(terminal).await;
    }

    async fn execute(
        &self,
        upload: UploadedAudio,
        provider: Arc<dyn TranscriptionProvider>,
        progress: &mut ProgressReporter,
        cancel: &CancellationToken,
    ) -> Result<FinalResult, PipelineError> {
        let workspace = RunWorkspace::create(&self.workspace_base)
            .await
            .map_err(PipelineError::Workspace)?;

        let outcome = self
            .execute_in(&workspace, upload, provider, progress, cancel)
            .await;

        // Unconditional on both terminal transitions.
        workspace.cleanup().await;
        outcome
    }

    async fn execute_in(
        &self,
        workspace: &RunWorkspace,
        upload: UploadedAudio,
        provider: Arc<dyn TranscriptionProvider>,
        progress: &mut ProgressReporter,
        cancel: &CancellationToken,
    ) -> Result<FinalResult, PipelineError> {
        let source = self.stage_upload(workspace, upload).await?;
        progress.emit(5, "upload received").await;

        let info = self.media_tool.probe(&source.path).await?;
        progress
            .emit(
                10,
                format!(
                    "probed: {:.1}s, {} bytes",
                    info.duration_seconds, info.size_bytes
                ),
            )
            .await;
        self.check_cancelled(cancel)?;

        let (active_path, active_info) = self
            .maybe_compress(workspace, &source, info, provider.as_ref(), progress)
            .await?;
        self.check_cancelled(cancel)?;

        let (transcript, segments) = if self
            .policy
            .fits_direct(active_info.size_bytes, active_info.duration_seconds)
        {
            let text = self
                .transcribe_direct(&active_path, provider.as_ref(), progress, cancel)
                .await?;
            (text, None)
        } else {
            let results = self
                .transcribe_segmented(workspace, &active_path, &active_info, &provider, progress, cancel)
                .await?;
            let text = assemble_transcript(&results, &self.policy.separator);
            (text, Some(results))
        };

        let (segments_total, segments_failed) = match &segments {
            Some(results) => (results.len(), results.iter().filter(|r| r.is_failed()).count()),
            None => (1, 0),
        };
        if segments_failed > 0 {
            tracing::warn!(
                failed = segments_failed,
                total = segments_total,
                "Transcription completed with failed segments"
            );
        }

        let record_id = self.persist(&source.original_name, &transcript).await;
        progress.emit(100, "finalized").await;

        Ok(FinalResult {
            transcript,
            duration_seconds: info.duration_seconds,
            size_bytes: info.size_bytes,
            segments_total,
            segments_failed,
            segments,
            record_id,
        })
    }

    async fn stage_upload(
        &self,
        workspace: &RunWorkspace,
        upload: UploadedAudio,
    ) -> Result<AudioSource, PipelineError> {
        let extension = Path::new(&upload.filename)
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("bin");
        let path = workspace.file_path(&format!("source.{}", extension));

        tokio::fs::write(&path, &upload.data)
            .await
            .map_err(PipelineError::Staging)?;

        tracing::debug!(
            filename = %upload.filename,
            bytes = upload.data.len(),
            path = %path.display(),
            "Upload staged"
        );

        Ok(AudioSource::new(
            path,
            upload.filename,
            upload.data.len() as u64,
            upload.mime_hint,
        ))
    }

    /// At most one compression attempt per run; the direct/segmented branch
    /// is then evaluated against the compressed result.
    async fn maybe_compress(
        &self,
        workspace: &RunWorkspace,
        source: &AudioSource,
        info: AudioInfo,
        provider: &dyn TranscriptionProvider,
        progress: &mut ProgressReporter,
    ) -> Result<(PathBuf, AudioInfo), PipelineError> {
        if !self.policy.needs_compression(info.size_bytes) {
            return Ok((source.path.clone(), info));
        }

        let encoding = provider
            .preferred_encoding()
            .compressed_variant(self.policy.compression_bitrate_kbps);
        let output = workspace.file_path(&format!("compressed.{}", encoding.container_extension));
        let spec = crate::application::ports::TransformSpec::reencode(encoding);

        self.media_tool
            .transform(&source.path, &spec, &output)
            .await
            .map_err(PipelineError::Compression)?;

        let compressed_info = self.media_tool.probe(&output).await?;
        tracing::info!(
            original_bytes = info.size_bytes,
            compressed_bytes = compressed_info.size_bytes,
            "Input compressed before branch decision"
        );
        progress.emit(20, "compression done").await;

        Ok((output, compressed_info))
    }

    async fn transcribe_direct(
        &self,
        path: &Path,
        provider: &dyn TranscriptionProvider,
        progress: &mut ProgressReporter,
        cancel: &CancellationToken,
    ) -> Result<String, PipelineError> {
        self.check_cancelled(cancel)?;
        progress.emit(30, "transcribing directly").await;

        // Direct mode has no degraded substitute: a provider failure fails
        // the whole run.
        let text = provider.transcribe(path, None).await?;
        progress.emit(90, "transcription done").await;
        Ok(text)
    }

    async fn transcribe_segmented(
        &self,
        workspace: &RunWorkspace,
        path: &Path,
        info: &AudioInfo,
        provider: &Arc<dyn TranscriptionProvider>,
        progress: &mut ProgressReporter,
        cancel: &CancellationToken,
    ) -> Result<Vec<SegmentTranscript>, PipelineError> {
        let plan = SegmentPlan::build(info.duration_seconds, self.policy.chunk_duration_seconds)?;
        progress
            .emit(25, format!("split into {} segments", plan.len()))
            .await;

        let files = self
            .segmenter
            .materialize(path, &plan, workspace.root(), &provider.preferred_encoding())
            .await?;
        progress.emit(35, "segmentation done").await;

        let total = files.len();
        let mut results: Vec<SegmentTranscript> = Vec::with_capacity(total);
        let mut last_success: Option<String> = None;

        for file in files {
            // Observed before each segment: nothing new starts after a
            // cancellation signal.
            self.check_cancelled(cancel)?;

            let context = last_success
                .as_deref()
                .map(|text| self.policy.context_tail(text).to_string());

            let attempt = provider.transcribe(&file.path, context.as_deref()).await;
            workspace.remove_file(&file.path).await;

            let result = match attempt {
                Ok(text) => {
                    last_success = Some(text.clone());
                    SegmentTranscript::success(file.index, text)
                }
                Err(e) => {
                    // Tolerated: the slot gets a placeholder and the next
                    // segment's context comes from the last success.
                    tracing::warn!(
                        segment = file.index,
                        error = %e,
                        "Segment transcription failed, continuing"
                    );
                    SegmentTranscript::failed(file.index, e.to_string())
                }
            };
            results.push(result);

            let done = results.len();
            let percent = 35 + ((55 * done) / total) as u8;
            progress
                .emit(percent, format!("segment {}/{} processed", done, total))
                .await;
        }

        Ok(results)
    }

    /// Best-effort: a persistence failure never fails an already-successful
    /// transcription.
    async fn persist(&self, filename: &str, transcript: &str) -> Option<String> {
        let record = TranscriptRecord::new(filename.to_string(), transcript.to_string());
        match self.repository.save(&record).await {
            Ok(()) => Some(record.id.as_uuid().to_string()),
            Err(e) => {
                tracing::warn!(error = %e, filename = %filename, "Transcript persistence failed");
                None
            }
        }
    }

    fn check_cancelled(&self, cancel: &CancellationToken) -> Result<(), PipelineError> {
        if cancel.is_cancelled() {
            tracing::info!("Pipeline run cancelled");
            return Err(PipelineError::Cancelled);
        }
        Ok(())
    }
}

/// Keeps emitted percentages monotonically non-decreasing. Send failures
/// mean the consumer is gone; they are ignored here because cancellation is
/// signalled separately.
struct ProgressReporter {
    sender: mpsc::Sender<PipelineEvent>,
    last_percent: u8,
}

impl ProgressReporter {
    fn new(sender: mpsc::Sender<PipelineEvent>) -> Self {
        Self {
            sender,
            last_percent: 0,
        }
    }

    async fn emit(&mut self, percent: u8, message: impl Into<String>) {
        let percent = percent.clamp(self.last_percent, 100);
        self.last_percent = percent;
        let _ = self
            .sender
            .send(PipelineEvent::Progress {
                percent,
                message: message.into(),
            })
            .await;
    }
}
