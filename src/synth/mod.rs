//! Work item synthesis.
//!
//! Turns one changed file into zero or more work items:
//! - `Summarizer`: the remote summarization boundary
//! - `OpenAiClient`: chat-completions implementation of `Summarizer`
//! - `SynthesisAdapter`: picks the change representation and normalizes the
//!   remote result

mod client;

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::discovery::{ChangeKind, ChangedFile, Classifier};
use crate::error::{Result, TaskgenError};
use crate::git::GitRunner;

pub use client::OpenAiClient;

/// A discrete, titled unit of explanatory content destined for the
/// project-tracking system.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskItem {
    pub title: String,
    pub description: String,
}

/// Remote summarizer response, schema-checked at the boundary. `tasks` is
/// required; `filename` is the canonical path as the summarizer reported it.
#[derive(Debug, Clone, Deserialize)]
pub struct SummaryResponse {
    #[serde(default)]
    pub filename: Option<String>,
    pub tasks: Vec<TaskItem>,
}

/// The work items synthesized for one successfully processed file. An empty
/// task list is a valid outcome.
#[derive(Debug, Clone)]
pub struct FileTaskResult {
    /// Authoritative path for the staging step.
    pub full_file_path: String,
    pub tasks: Vec<TaskItem>,
}

/// The textual payload sent to the summarizer. Exactly one representation is
/// produced per changed file, selected by its origin kind.
#[derive(Debug, Clone)]
pub enum ChangeContent {
    /// Unified diff, for modified files.
    Diff(String),
    /// Raw on-disk file text, for untracked files.
    FullText(String),
}

impl ChangeContent {
    pub fn text(&self) -> &str {
        match self {
            Self::Diff(s) | Self::FullText(s) => s,
        }
    }
}

/// The remote summarization boundary: (file identifier, change text) ->
/// work items plus a canonical file path. Implementations surface every
/// failure as `TaskgenError::Synthesis` for the given file.
#[async_trait]
pub trait Summarizer: Send + Sync {
    async fn summarize(&self, file: &str, change_text: &str) -> Result<SummaryResponse>;
}

/// Obtains the right change representation for a path and delegates to the
/// summarizer, normalizing the result into a `FileTaskResult`.
pub struct SynthesisAdapter {
    git: Arc<GitRunner>,
    summarizer: Arc<dyn Summarizer>,
}

impl SynthesisAdapter {
    pub fn new(git: Arc<GitRunner>, summarizer: Arc<dyn Summarizer>) -> Self {
        Self { git, summarizer }
    }

    pub async fn synthesize(&self, path: &str) -> Result<FileTaskResult> {
        let changed = self.classify(path).await;
        let content = self.change_content(&changed).await?;

        debug!(
            path = %changed.path,
            kind = ?changed.kind,
            content_len = content.text().len(),
            "Sending change to summarizer"
        );

        let response = self.summarizer.summarize(&changed.path, content.text()).await?;

        let full_file_path = response
            .filename
            .filter(|f| !f.trim().is_empty())
            .unwrap_or_else(|| changed.path.clone());

        Ok(FileTaskResult {
            full_file_path,
            tasks: response.tasks,
        })
    }

    async fn classify(&self, path: &str) -> ChangedFile {
        let kind = if Classifier::new(&self.git).is_untracked(path).await {
            ChangeKind::Untracked
        } else {
            ChangeKind::Modified
        };
        ChangedFile {
            path: path.to_string(),
            kind,
        }
    }

    async fn change_content(&self, changed: &ChangedFile) -> Result<ChangeContent> {
        match changed.kind {
            ChangeKind::Untracked => self
                .git
                .read_file(&changed.path)
                .await
                .map(ChangeContent::FullText)
                .map_err(|e| TaskgenError::synthesis(&changed.path, e)),
            ChangeKind::Modified => self
                .git
                .diff_file(&changed.path)
                .await
                .map(ChangeContent::Diff)
                .map_err(|e| TaskgenError::synthesis(&changed.path, e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_response_requires_tasks() {
        let json = r#"{"filename": "src/a.rs", "tasks": [{"title": "t", "description": "d"}]}"#;
        let parsed: SummaryResponse = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.filename.as_deref(), Some("src/a.rs"));
        assert_eq!(parsed.tasks.len(), 1);

        // Missing tasks field is a shape mismatch, not an empty result.
        assert!(serde_json::from_str::<SummaryResponse>(r#"{"filename": "a"}"#).is_err());

        // Missing filename is tolerated; the input path is used instead.
        let parsed: SummaryResponse = serde_json::from_str(r#"{"tasks": []}"#).unwrap();
        assert!(parsed.filename.is_none());
        assert!(parsed.tasks.is_empty());
    }

    #[test]
    fn change_content_exposes_inner_text() {
        assert_eq!(ChangeContent::Diff("d".into()).text(), "d");
        assert_eq!(ChangeContent::FullText("f".into()).text(), "f");
    }
}
