use async_trait::async_trait;
use chrono::Utc;
use std::{
    path::{Path, PathBuf},
    time::Duration,
};
use tokio::process::Command;
use tracing::{info, warn};

use crate::{
    error::{ArchiveError, Result},
    traits::{PublishOutcome, Publisher},
};

/// Timeout for a single git invocation (clone and push can be slow)
const GIT_TIMEOUT_SECS: u64 = 300;

const CLONE_DIR_NAME: &str = "temp-repo";

pub const DEFAULT_DEST_SUBDIR: &str = "years";
pub const DEFAULT_AUTHOR_NAME: &str = "GitHub Actions Bot";
pub const DEFAULT_AUTHOR_EMAIL: &str = "github-actions[bot]@users.noreply.github.com";

/// Publishes the playlist tree as a new branch of a git repository.
#[derive(Debug, Clone)]
pub struct GitPublisher {
    repo_url: String,
    work_dir: PathBuf,
    dest_subdir: String,
    author_name: String,
    author_email: String,
}

impl GitPublisher {
    pub fn new(repo_url: impl Into<String>, work_dir: impl Into<PathBuf>) -> Self {
        Self {
            repo_url: repo_url.into(),
            work_dir: work_dir.into(),
            dest_subdir: DEFAULT_DEST_SUBDIR.to_string(),
            author_name: DEFAULT_AUTHOR_NAME.to_string(),
            author_email: DEFAULT_AUTHOR_EMAIL.to_string(),
        }
    }

    pub fn dest_subdir(mut self, subdir: &str) -> Self {
        self.dest_subdir = subdir.to_string();
        self
    }

    pub fn author(mut self, name: &str, email: &str) -> Self {
        self.author_name = name.to_string();
        self.author_email = email.to_string();
        self
    }

    fn clone_dir(&self) -> PathBuf {
        self.work_dir.join(CLONE_DIR_NAME)
    }

    async fn git(&self, cwd: &Path, args: &[&str]) -> Result<String> {
        let command = format!("git {}", args.join(" "));
        info!("> {}", command);

        let mut cmd = Command::new("git");
        cmd.args(args).current_dir(cwd);

        let output =
            match tokio::time::timeout(Duration::from_secs(GIT_TIMEOUT_SECS), cmd.output()).await {
                Ok(result) => result?,
                Err(_) => {
                    return Err(ArchiveError::Git {
                        command,
                        message: format!("timed out after {GIT_TIMEOUT_SECS}s"),
                    })
                }
            };

        if output.status.success() {
            Ok(String::from_utf8_lossy(&output.stdout).to_string())
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let message = if stderr.trim().is_empty() {
                format!("exit code {:?}", output.status.code())
            } else {
                stderr.trim().to_string()
            };
            Err(ArchiveError::Git { command, message })
        }
    }

    async fn publish_from_clone(&self, clone_dir: &Path, source: &Path) -> Result<PublishOutcome> {
        // `clone_dir` is `work_dir/temp-repo`; git runs inside `work_dir`
        self.git(&self.work_dir, &["clone", &self.repo_url, CLONE_DIR_NAME])
            .await?;

        self.git(clone_dir, &["config", "user.name", &self.author_name])
            .await?;
        self.git(clone_dir, &["config", "user.email", &self.author_email])
            .await?;

        let branch = format!("update-playlists-{}", Utc::now().timestamp_millis());
        self.git(clone_dir, &["checkout", "-b", &branch]).await?;

        let dest = clone_dir.join(&self.dest_subdir);
        if dest.exists() {
            std::fs::remove_dir_all(&dest)?;
        }
        let files = copy_dir(source, &dest)?;
        info!("Copied {} playlist files", files);

        self.git(clone_dir, &["add", "--all", &self.dest_subdir])
            .await?;
        let status = self.git(clone_dir, &["status", "--porcelain"]).await?;
        if status.trim().is_empty() {
            info!("No changes to commit, destination is up to date");
            return Ok(PublishOutcome::NoChanges);
        }

        let message = format!("Update playlists - {}", Utc::now().format("%Y-%m-%d"));
        self.git(clone_dir, &["commit", "-m", &message]).await?;
        self.git(clone_dir, &["push", "origin", &branch]).await?;

        info!("Branch created: {}", branch);
        Ok(PublishOutcome::Published { branch, files })
    }
}

/// Recursively copy `src` into `dest`, returning the number of files copied.
pub fn copy_dir(src: &Path, dest: &Path) -> std::io::Result<usize> {
    std::fs::create_dir_all(dest)?;
    let mut copied = 0;
    for entry in std::fs::read_dir(src)? {
        let entry = entry?;
        let target = dest.join(entry.file_name());
        if entry.file_type()?.is_dir() {
            copied += copy_dir(&entry.path(), &target)?;
        } else {
            std::fs::copy(entry.path(), &target)?;
            copied += 1;
        }
    }
    Ok(copied)
}

#[async_trait]
impl Publisher for GitPublisher {
    fn name(&self) -> &'static str {
        "Git"
    }

    async fn publish(&self, source: &Path) -> Result<PublishOutcome> {
        if !source.is_dir() {
            return Err(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("source directory {} does not exist", source.display()),
            )
            .into());
        }

        std::fs::create_dir_all(&self.work_dir)?;
        let clone_dir = self.clone_dir();
        if clone_dir.exists() {
            info!("Cleaning up existing clone at {}", clone_dir.display());
            std::fs::remove_dir_all(&clone_dir)?;
        }

        let result = self.publish_from_clone(&clone_dir, source).await;

        if clone_dir.exists() {
            if let Err(e) = std::fs::remove_dir_all(&clone_dir) {
                warn!("Failed to remove {}: {}", clone_dir.display(), e);
            }
        }
        result
    }
}
