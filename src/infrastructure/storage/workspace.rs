use std::io;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use uuid::Uuid;

/// Per-job scratch directory under the shared temp root.
///
/// Removed exactly once: explicitly through [`JobWorkspace::remove`], or by
/// `Drop` if the owning request future is abandoned before reaching it.
#[derive(Debug)]
pub struct JobWorkspace {
    job_id: Uuid,
    path: PathBuf,
    removed: bool,
}

impl JobWorkspace {
    pub async fn create(root: &Path, job_id: Uuid) -> io::Result<Self> {
        let path = root.join(job_id.to_string());
        tokio::fs::create_dir_all(&path).await?;

        info!(job_id = %job_id, path = %path.display(), "📁 Workspace created");

        Ok(Self {
            job_id,
            path,
            removed: false,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn job_id(&self) -> Uuid {
        self.job_id
    }

    /// Local path of the `index`-th downloaded input.
    pub fn input_path(&self, index: usize) -> PathBuf {
        self.path.join(format!("video_{}.mp4", index))
    }

    pub fn output_path(&self) -> PathBuf {
        self.path.join("output.mp4")
    }

    /// Best-effort recursive removal. Failures are logged, never returned.
    pub async fn remove(mut self) {
        self.removed = true;

        match tokio::fs::remove_dir_all(&self.path).await {
            Ok(()) => info!(job_id = %self.job_id, "🧹 Workspace removed"),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => warn!(
                job_id = %self.job_id,
                path = %self.path.display(),
                "Failed to remove workspace: {}",
                e
            ),
        }
    }
}

impl Drop for JobWorkspace {
    fn drop(&mut self) {
        if self.removed {
            return;
        }

        warn!(job_id = %self.job_id, "Workspace dropped without cleanup, removing");
        if let Err(e) = std::fs::remove_dir_all(&self.path) {
            if e.kind() != io::ErrorKind::NotFound {
                warn!(job_id = %self.job_id, "Failed to remove workspace: {}", e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn create_makes_directory_named_after_job() {
        let root = tempdir().unwrap();
        let job_id = Uuid::new_v4();

        let workspace = JobWorkspace::create(root.path(), job_id).await.unwrap();

        assert_eq!(workspace.path(), root.path().join(job_id.to_string()));
        assert!(workspace.path().is_dir());
        workspace.remove().await;
    }

    #[tokio::test]
    async fn create_builds_missing_root() {
        let root = tempdir().unwrap();
        let nested = root.path().join("a").join("b");

        let workspace = JobWorkspace::create(&nested, Uuid::new_v4()).await.unwrap();

        assert!(workspace.path().is_dir());
        workspace.remove().await;
    }

    #[tokio::test]
    async fn remove_deletes_contents_recursively() {
        let root = tempdir().unwrap();
        let workspace = JobWorkspace::create(root.path(), Uuid::new_v4()).await.unwrap();
        let path = workspace.path().to_path_buf();
        tokio::fs::write(workspace.input_path(0), b"data").await.unwrap();
        tokio::fs::create_dir(path.join("nested")).await.unwrap();

        workspace.remove().await;

        assert!(!path.exists());
    }

    #[tokio::test]
    async fn remove_tolerates_already_missing_directory() {
        let root = tempdir().unwrap();
        let workspace = JobWorkspace::create(root.path(), Uuid::new_v4()).await.unwrap();
        std::fs::remove_dir_all(workspace.path()).unwrap();

        workspace.remove().await;
    }

    #[tokio::test]
    async fn drop_without_remove_still_cleans_up() {
        let root = tempdir().unwrap();
        let workspace = JobWorkspace::create(root.path(), Uuid::new_v4()).await.unwrap();
        let path = workspace.path().to_path_buf();

        drop(workspace);

        assert!(!path.exists());
    }

    #[test]
    fn input_paths_are_index_named() {
        let workspace = JobWorkspace {
            job_id: Uuid::nil(),
            path: PathBuf::from("/tmp/job"),
            removed: true,
        };

        assert_eq!(workspace.input_path(0), PathBuf::from("/tmp/job/video_0.mp4"));
        assert_eq!(workspace.input_path(12), PathBuf::from("/tmp/job/video_12.mp4"));
        assert_eq!(workspace.output_path(), PathBuf::from("/tmp/job/output.mp4"));
    }
}
