use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::application::ports::{AudioEncoding, MediaTool, TransformError, TransformSpec};
use crate::domain::SegmentPlan;

/// A materialized segment file, owned by the run workspace. Deleted right
/// after its transcription attempt completes.
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentFile {
    pub index: usize,
    pub path: PathBuf,
}

#[derive(Debug, thiserror::Error)]
#[error("segment {index} creation failed: {source}")]
pub struct SegmentCreationError {
    pub index: usize,
    #[source]
    pub source: TransformError,
}

/// Turns a [`SegmentPlan`] into one file per segment via the transcoding
/// tool, normalized to the active provider's ingest encoding.
pub struct Segmenter<M> {
    media_tool: Arc<M>,
}

impl<M> Segmenter<M>
where
    M: MediaTool,
{
    pub fn new(media_tool: Arc<M>) -> Self {
        Self { media_tool }
    }

    /// One transform call per segment, in index order. Output files are
    /// named by index so reassembly order never depends on directory
    /// listing order. The first failure aborts the whole plan; partial
    /// files are the workspace's to clean up.
    pub async fn materialize(
        &self,
        source_path: &Path,
        plan: &SegmentPlan,
        output_dir: &Path,
        encoding: &AudioEncoding,
    ) -> Result<Vec<SegmentFile>, SegmentCreationError> {
        let mut files = Vec::with_capacity(plan.len());

        for segment in plan.segments() {
            let output = output_dir.join(format!(
                "segment_{:03}.{}",
                segment.index, encoding.container_extension
            ));
            let spec = TransformSpec::trim(
                segment.start_seconds,
                segment.duration_seconds(),
                encoding.clone(),
            );

            tracing::debug!(
                index = segment.index,
                start = segment.start_seconds,
                end = segment.end_seconds,
                output = %output.display(),
                "Materializing segment"
            );

            self.media_tool
                .transform(source_path, &spec, &output)
                .await
                .map_err(|source| SegmentCreationError {
                    index: segment.index,
                    source,
                })?;

            files.push(SegmentFile {
                index: segment.index,
                path: output,
            });
        }

        Ok(files)
    }
}
