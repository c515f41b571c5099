use thiserror::Error;

#[derive(Error, Debug)]
pub enum TaskgenError {
    #[error("Failed to enumerate changed files: {0}")]
    Enumeration(String),

    #[error("Synthesis failed for {path}: {message}")]
    Synthesis { path: String, message: String },

    #[error("Export failed: {0}")]
    Export(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Not in a git repository")]
    NotInGitRepo,

    #[error("Git command failed: {0}")]
    Git(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

impl TaskgenError {
    /// Wrap an arbitrary failure as a per-file synthesis error.
    pub fn synthesis(path: impl Into<String>, message: impl std::fmt::Display) -> Self {
        Self::Synthesis {
            path: path.into(),
            message: message.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, TaskgenError>;
