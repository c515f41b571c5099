//! Change discovery against the working tree.
//!
//! Finds what the current run has to summarize:
//! - `enumerate_changes`: modified-but-unstaged plus new-and-untracked paths
//! - `Classifier`: decides whether a path is untracked (full content) or
//!   modified (unified diff)

use std::path::Path;

use tracing::{debug, warn};

use crate::error::{Result, TaskgenError};
use crate::git::GitRunner;

/// Dependency lockfiles that never produce work items. Matched on the bare
/// file name, not the full path.
pub const IGNORED_LOCKFILES: [&str; 3] = ["pnpm-lock.yaml", "bun.lockb", "package-lock.json"];

/// How a changed file entered the working tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    /// Tracked by git, with uncommitted modifications.
    Modified,
    /// Present on disk, never recorded by git.
    Untracked,
}

/// A single changed path, valid for the duration of one run.
#[derive(Debug, Clone)]
pub struct ChangedFile {
    pub path: String,
    pub kind: ChangeKind,
}

/// The bare file name of a repository path.
pub fn bare_name(path: &str) -> &str {
    path.rsplit(['/', '\\']).next().unwrap_or(path)
}

fn is_ignored(path: &str) -> bool {
    IGNORED_LOCKFILES.contains(&bare_name(path))
}

/// List every path the run should process: unstaged modifications first,
/// then untracked files, both filtered against the lockfile ignore-list and
/// joined onto `root`. An empty result is a valid terminal state.
///
/// The two underlying sets are disjoint under git semantics (a path is either
/// tracked or not), so no de-duplication is applied across them.
pub async fn enumerate_changes(git: &GitRunner, root: &Path) -> Result<Vec<String>> {
    let modified = git
        .modified_paths()
        .await
        .map_err(|e| TaskgenError::Enumeration(e.to_string()))?;
    let untracked = git
        .untracked_paths()
        .await
        .map_err(|e| TaskgenError::Enumeration(e.to_string()))?;

    let paths: Vec<String> = modified
        .into_iter()
        .chain(untracked)
        .filter(|p| !is_ignored(p))
        .map(|rel| root.join(rel).display().to_string())
        .collect();

    debug!(count = paths.len(), "Enumerated changed files");
    Ok(paths)
}

/// Classifies a changed path as untracked or modified by querying git.
pub struct Classifier<'a> {
    git: &'a GitRunner,
}

impl<'a> Classifier<'a> {
    pub fn new(git: &'a GitRunner) -> Self {
        Self { git }
    }

    /// Whether `path` is untracked: listed by `ls-files --others` and not
    /// already staged (a file `git add`-ed earlier in the run stays
    /// classified as modified).
    ///
    /// Fails soft: on any git query error the path is treated as modified,
    /// because diffing an untracked path yields an empty diff rather than an
    /// error.
    ///
    /// Known limitation: matching is by bare file name, so two same-named
    /// files in different directories can shadow each other's staged status.
    pub async fn is_untracked(&self, path: &str) -> bool {
        match self.query(path).await {
            Ok(untracked) => untracked,
            Err(e) => {
                warn!(path = %path, error = %e, "Classification failed; treating as modified");
                false
            }
        }
    }

    async fn query(&self, path: &str) -> Result<bool> {
        let name = bare_name(path);
        let untracked = self.git.untracked_paths().await?;
        let staged = self.git.staged_paths().await?;

        let in_untracked = untracked.iter().any(|p| bare_name(p) == name);
        let in_staged = staged.iter().any(|p| bare_name(p) == name);

        Ok(in_untracked && !in_staged)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_name_strips_directories() {
        assert_eq!(bare_name("src/git/runner.rs"), "runner.rs");
        assert_eq!(bare_name("runner.rs"), "runner.rs");
        assert_eq!(bare_name("/abs/path/to/a.ts"), "a.ts");
    }

    #[test]
    fn lockfiles_are_ignored_by_bare_name() {
        assert!(is_ignored("pnpm-lock.yaml"));
        assert!(is_ignored("nested/dir/package-lock.json"));
        assert!(is_ignored("a/bun.lockb"));
        assert!(!is_ignored("src/lockfile_parser.rs"));
        assert!(!is_ignored("Cargo.lock"));
    }
}
