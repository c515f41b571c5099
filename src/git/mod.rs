//! Git command execution.
//!
//! Provides the source-control boundary used by change discovery,
//! classification, and staging:
//! - `GitRunner`: async wrapper around the `git` binary

mod runner;

pub use runner::GitRunner;
