use std::path::{Path, PathBuf};
use std::process::Output;

use tokio::process::Command;
use tracing::{debug, warn};

use crate::error::{Result, TaskgenError};

/// Async wrapper around the `git` binary, rooted at a working directory.
pub struct GitRunner {
    working_dir: PathBuf,
}

impl GitRunner {
    pub fn new(working_dir: impl Into<PathBuf>) -> Self {
        Self {
            working_dir: working_dir.into(),
        }
    }

    pub fn working_dir(&self) -> &Path {
        &self.working_dir
    }

    async fn run(&self, args: &[&str]) -> Result<Output> {
        debug!(args = ?args, dir = %self.working_dir.display(), "Running git command");

        let output = Command::new("git")
            .args(args)
            .current_dir(&self.working_dir)
            .output()
            .await?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            warn!(args = ?args, stderr = %stderr, "Git command failed");
        }

        Ok(output)
    }

    async fn run_checked(&self, args: &[&str]) -> Result<Output> {
        let output = self.run(args).await?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(TaskgenError::Git(stderr.trim().to_string()));
        }

        Ok(output)
    }

    fn stdout_lines(output: &Output) -> Vec<String> {
        String::from_utf8_lossy(&output.stdout)
            .lines()
            .map(|l| l.trim().to_string())
            .filter(|l| !l.is_empty())
            .collect()
    }

    /// Paths with unstaged modifications relative to the index, repository-relative.
    pub async fn modified_paths(&self) -> Result<Vec<String>> {
        let output = self.run_checked(&["diff", "--name-only"]).await?;
        Ok(Self::stdout_lines(&output))
    }

    /// Paths on disk that git has never recorded, honoring ignore rules.
    pub async fn untracked_paths(&self) -> Result<Vec<String>> {
        let output = self
            .run_checked(&["ls-files", "--others", "--exclude-standard"])
            .await?;
        Ok(Self::stdout_lines(&output))
    }

    /// Paths with staged changes, repository-relative.
    pub async fn staged_paths(&self) -> Result<Vec<String>> {
        let output = self.run_checked(&["diff", "--name-only", "--cached"]).await?;
        Ok(Self::stdout_lines(&output))
    }

    /// Unified diff of the unstaged changes for exactly one path.
    pub async fn diff_file(&self, path: &str) -> Result<String> {
        let output = self.run_checked(&["diff", "--", path]).await?;
        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }

    /// Stage a single path for the next commit.
    pub async fn stage(&self, path: &str) -> Result<()> {
        self.run_checked(&["add", "--", path]).await?;
        Ok(())
    }

    /// Read the current on-disk content of a file (not the index version).
    pub async fn read_file(&self, path: &str) -> Result<String> {
        let full = if Path::new(path).is_absolute() {
            PathBuf::from(path)
        } else {
            self.working_dir.join(path)
        };
        Ok(tokio::fs::read_to_string(&full).await?)
    }
}
