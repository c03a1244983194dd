//! Git Operations
//!
//! Safe wrapper around read-only git CLI invocations. Evidence gathering
//! never writes to the repository; every call here is a single synchronous
//! query against committed state.

use std::path::Path;
use std::process::Command;

use groundcheck_core::{CoreError, CoreResult};

/// Result of a git command execution
#[derive(Debug)]
pub struct GitResult {
    pub success: bool,
    pub stdout: String,
    pub stderr: String,
    pub exit_code: i32,
}

impl GitResult {
    /// Check if the command was successful and return stdout or error
    pub fn into_result(self) -> CoreResult<String> {
        if self.success {
            Ok(self.stdout)
        } else {
            Err(CoreError::external_tool(format!(
                "Git command failed (exit {}): {}",
                self.exit_code,
                self.stderr.trim()
            )))
        }
    }
}

/// Read-only git command wrapper
#[derive(Debug, Default)]
pub struct GitOps;

impl GitOps {
    /// Create a new GitOps instance
    pub fn new() -> Self {
        Self
    }

    /// Execute a git command in the specified directory
    pub fn execute(&self, cwd: &Path, args: &[&str]) -> CoreResult<GitResult> {
        let output = Command::new("git")
            .args(args)
            .current_dir(cwd)
            // Disable interactive prompts to avoid hanging automation flows/tests.
            .env("GIT_TERMINAL_PROMPT", "0")
            .output()
            .map_err(|e| CoreError::external_tool(format!("Failed to execute git: {}", e)))?;

        Ok(GitResult {
            success: output.status.success(),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            exit_code: output.status.code().unwrap_or(-1),
        })
    }

    /// Get the repository root directory
    pub fn repo_root(&self, cwd: &Path) -> CoreResult<String> {
        self.execute(cwd, &["rev-parse", "--show-toplevel"])?
            .into_result()
            .map(|s| s.trim().to_string())
    }

    /// Get the current branch name
    pub fn current_branch(&self, cwd: &Path) -> CoreResult<String> {
        self.execute(cwd, &["rev-parse", "--abbrev-ref", "HEAD"])?
            .into_result()
            .map(|s| s.trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::create_test_repo;

    #[test]
    fn test_execute_success() {
        let (_dir, repo) = create_test_repo();
        let git = GitOps::new();
        let result = git.execute(&repo, &["rev-parse", "HEAD"]).unwrap();
        assert!(result.success);
        assert!(!result.stdout.trim().is_empty());
    }

    #[test]
    fn test_execute_failure_surfaces_stderr() {
        let (_dir, repo) = create_test_repo();
        let git = GitOps::new();
        let result = git.execute(&repo, &["rev-parse", "no-such-ref"]).unwrap();
        assert!(!result.success);
        let err = result.into_result().unwrap_err();
        assert!(matches!(err, CoreError::ExternalTool(_)));
    }

    #[test]
    fn test_current_branch() {
        let (_dir, repo) = create_test_repo();
        let git = GitOps::new();
        assert_eq!(git.current_branch(&repo).unwrap(), "feature");
    }

    #[test]
    fn test_repo_root_matches_repo_path() {
        let (_dir, repo) = create_test_repo();
        let git = GitOps::new();
        let root = git.repo_root(&repo).unwrap();
        let canonical = repo.canonicalize().unwrap();
        assert_eq!(
            std::path::Path::new(&root).canonicalize().unwrap(),
            canonical
        );
    }
}
