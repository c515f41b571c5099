pub mod cli;
pub mod config;
pub mod discovery;
pub mod error;
pub mod export;
pub mod git;
pub mod pipeline;
pub mod synth;

pub use discovery::{enumerate_changes, ChangeKind, ChangedFile, Classifier};
pub use error::{Result, TaskgenError};
pub use export::ExportParams;
pub use git::GitRunner;
pub use pipeline::{Pipeline, RunOutcome};
pub use synth::{FileTaskResult, OpenAiClient, Summarizer, SummaryResponse, TaskItem};
