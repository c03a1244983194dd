//! Shared test fixtures: scratch git repositories with a known change set.

use std::path::{Path, PathBuf};
use std::process::Command;

use tempfile::TempDir;

/// Run a git command in `repo`, panicking on failure.
pub fn git(repo: &Path, args: &[&str]) {
    let output = Command::new("git")
        .args(args)
        .current_dir(repo)
        .env("GIT_TERMINAL_PROMPT", "0")
        .output()
        .expect("failed to spawn git");
    assert!(
        output.status.success(),
        "git {:?} failed: {}",
        args,
        String::from_utf8_lossy(&output.stderr)
    );
}

/// Write a file and stage + commit it.
pub fn commit_file(repo: &Path, name: &str, content: &str, message: &str) {
    std::fs::write(repo.join(name), content).unwrap();
    git(repo, &["add", "."]);
    git(repo, &["commit", "-m", message]);
}

/// Create a repository with a `main` baseline and a `feature` branch carrying
/// a known change set:
///
/// - `file1.py` modified (+2 / -1), 3 lines at HEAD
/// - `file2.py` unchanged
/// - `file3.py` added (3 new lines)
///
/// HEAD is left on `feature`.
pub fn create_test_repo() -> (TempDir, PathBuf) {
    let dir = TempDir::new().unwrap();
    let repo = dir.path().to_path_buf();

    git(&repo, &["init"]);
    git(&repo, &["config", "user.email", "test@example.com"]);
    git(&repo, &["config", "user.name", "Test User"]);

    std::fs::write(repo.join("file1.py"), "def hello():\n    return 1\n").unwrap();
    std::fs::write(repo.join("file2.py"), "def world():\n    return 2\n").unwrap();
    git(&repo, &["add", "."]);
    git(&repo, &["commit", "-m", "Initial commit"]);
    git(&repo, &["branch", "-M", "main"]);

    git(&repo, &["checkout", "-b", "feature"]);
    std::fs::write(
        repo.join("file1.py"),
        "def hello():\n    print('hello')\n    return 42\n",
    )
    .unwrap();
    std::fs::write(
        repo.join("file3.py"),
        "def added():\n    x = 3\n    return x\n",
    )
    .unwrap();
    git(&repo, &["add", "."]);
    git(&repo, &["commit", "-m", "Add feature"]);

    (dir, repo)
}
