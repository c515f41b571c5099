//! Fan-out/fan-in orchestration over the changed-file set.
//!
//! Drives the whole run: enumerate, synthesize concurrently, partition
//! outcomes, stage successes, aggregate.

use std::path::Path;
use std::sync::Arc;

use futures::future::join_all;
use tracing::{error, info, warn};

use crate::discovery::enumerate_changes;
use crate::error::{Result, TaskgenError};
use crate::git::GitRunner;
use crate::synth::{FileTaskResult, Summarizer, SynthesisAdapter};

/// Final result of one run: every successful per-file synthesis in the order
/// the fan-out settled, plus the number of per-file failures (logged, not
/// retained as data).
#[derive(Debug, Default)]
pub struct RunOutcome {
    pub results: Vec<FileTaskResult>,
    pub failure_count: usize,
}

impl RunOutcome {
    pub fn total_tasks(&self) -> usize {
        self.results.iter().map(|r| r.tasks.len()).sum()
    }
}

/// One-shot pipeline over a git working tree.
pub struct Pipeline {
    git: Arc<GitRunner>,
    adapter: Arc<SynthesisAdapter>,
}

impl Pipeline {
    pub fn new(git: Arc<GitRunner>, summarizer: Arc<dyn Summarizer>) -> Self {
        let adapter = Arc::new(SynthesisAdapter::new(Arc::clone(&git), summarizer));
        Self { git, adapter }
    }

    /// Run the full pipeline. Only enumeration failure is fatal; every
    /// per-file failure is logged and the run returns whatever succeeded. An
    /// empty outcome is valid, not an error.
    pub async fn run(&self, root: &Path) -> Result<RunOutcome> {
        let paths = enumerate_changes(&self.git, root).await?;

        if paths.is_empty() {
            info!("No changed files to process");
            return Ok(RunOutcome::default());
        }

        info!(files = paths.len(), "Synthesizing tasks for changed files");

        let (succeeded, failed) = self.fan_out(paths).await;

        for failure in &failed {
            error!(error = %failure, "Task synthesis failed");
        }

        // Staging runs only after the success/failure partition is final, so
        // a result is never staged while its membership is still undecided.
        self.stage_successes(&succeeded).await;

        Ok(RunOutcome {
            results: succeeded,
            failure_count: failed.len(),
        })
    }

    /// Launch one synthesis task per path, uncapped, and wait for all of them
    /// to settle. A failing file never aborts the others.
    async fn fan_out(&self, paths: Vec<String>) -> (Vec<FileTaskResult>, Vec<TaskgenError>) {
        let path_list = paths.clone();

        let handles: Vec<_> = paths
            .into_iter()
            .map(|path| {
                let adapter = Arc::clone(&self.adapter);
                tokio::spawn(async move {
                    info!(path = %path, "Creating tasks for file");
                    adapter.synthesize(&path).await
                })
            })
            .collect();

        let settled = join_all(handles).await;

        let mut succeeded = Vec::new();
        let mut failed = Vec::new();

        for (outcome, path) in settled.into_iter().zip(path_list) {
            match outcome {
                Ok(Ok(result)) => {
                    info!(
                        path = %result.full_file_path,
                        tasks = result.tasks.len(),
                        "Generated tasks for file"
                    );
                    succeeded.push(result);
                }
                Ok(Err(e)) => failed.push(e),
                Err(e) => failed.push(TaskgenError::synthesis(
                    path,
                    format!("synthesis task panicked: {}", e),
                )),
            }
        }

        (succeeded, failed)
    }

    /// Stage every successfully synthesized file. Staging failure is logged
    /// and skipped; it never revokes the synthesis result.
    async fn stage_successes(&self, succeeded: &[FileTaskResult]) {
        for result in succeeded {
            if let Err(e) = self.git.stage(&result.full_file_path).await {
                warn!(
                    path = %result.full_file_path,
                    error = %e,
                    "Failed to stage file; continuing"
                );
            }
        }
    }
}
