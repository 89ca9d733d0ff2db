use std::path::{Path, PathBuf};

use uuid::Uuid;

/// Exclusively-owned temp directory for one pipeline run. Everything the run
/// stages (upload, compressed re-encode, segment files) lives under it.
///
/// Cleanup is best-effort and never masks the run's result: the pipeline
/// calls [`RunWorkspace::cleanup`] on its single exit point, and `Drop`
/// covers any path that skipped it. Deletion failures are logged only.
pub struct RunWorkspace {
    root: PathBuf,
    cleaned: bool,
}

impl RunWorkspace {
    pub async fn create(base_dir: &Path) -> Result<Self, std::io::Error> {
        let root = base_dir.join(format!("run-{}", Uuid::new_v4()));
        tokio::fs::create_dir_all(&root).await?;
        tracing::debug!(path = %root.display(), "Run workspace created");
        Ok(Self {
            root,
            cleaned: false,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn file_path(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }

    /// Delete one file early, before the run ends. Used to drop each segment
    /// file right after its transcription attempt so temporary disk usage
    /// stays bounded by a single segment.
    pub async fn remove_file(&self, path: &Path) {
        if let Err(e) = tokio::fs::remove_file(path).await {
            tracing::warn!(error = %e, path = %path.display(), "Failed to remove temp file");
        }
    }

    pub async fn cleanup(mut self) {
        self.cleaned = true;
        if let Err(e) = tokio::fs::remove_dir_all(&self.root).await {
            if e.kind() != std::io::ErrorKind::NotFound {
                tracing::warn!(error = %e, path = %self.root.display(), "Run workspace cleanup failed");
            }
        } else {
            tracing::debug!(path = %self.root.display(), "Run workspace removed");
        }
    }
}

impl Drop for RunWorkspace {
    fn drop(&mut self) {
        if self.cleaned {
            return;
        }
        if let Err(e) = std::fs::remove_dir_all(&self.root) {
            if e.kind() != std::io::ErrorKind::NotFound {
                tracing::warn!(error = %e, path = %self.root.display(), "Run workspace cleanup failed on drop");
            }
        }
    }
}
