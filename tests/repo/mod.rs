//! Scratch git repositories for integration tests.

#![allow(dead_code)]

use std::path::PathBuf;
use std::process::Command;

use tempfile::TempDir;

pub struct TestRepo {
    // Held for cleanup on drop.
    _dir: TempDir,
    pub root: PathBuf,
}

impl TestRepo {
    pub fn init() -> Self {
        let dir = tempfile::tempdir().expect("create temp dir");
        let root = dir.path().canonicalize().expect("canonicalize temp dir");

        let repo = Self { _dir: dir, root };
        repo.git(&["init", "-q"]);
        repo.git(&["config", "user.email", "tests@example.com"]);
        repo.git(&["config", "user.name", "Tests"]);
        repo.git(&["config", "commit.gpgsign", "false"]);
        repo
    }

    pub fn git(&self, args: &[&str]) {
        let status = Command::new("git")
            .args(args)
            .current_dir(&self.root)
            .status()
            .expect("run git");
        assert!(status.success(), "git {:?} failed", args);
    }

    pub fn write_file(&self, rel: &str, content: &str) {
        let path = self.root.join(rel);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("create parent dirs");
        }
        std::fs::write(path, content).expect("write file");
    }

    pub fn commit_file(&self, rel: &str, content: &str) {
        self.write_file(rel, content);
        self.git(&["add", rel]);
        self.git(&["commit", "-q", "-m", &format!("add {}", rel)]);
    }

    /// Repository-relative paths with staged changes.
    pub fn staged(&self) -> Vec<String> {
        let output = Command::new("git")
            .args(["diff", "--name-only", "--cached"])
            .current_dir(&self.root)
            .output()
            .expect("run git");
        String::from_utf8_lossy(&output.stdout)
            .lines()
            .map(|l| l.trim().to_string())
            .filter(|l| !l.is_empty())
            .collect()
    }
}
