//! Review Context Builder
//!
//! Assembles the change context handed to the verification pipeline: the
//! commit messages on the range and a unified diff per changed file. This
//! is the text the question and answering stages reason over before they
//! reach for the evidence tools.

use std::path::Path;

use groundcheck_core::{ChangeType, CoreResult, FileChange};
use groundcheck_tools::GitOps;

/// Build the review context for `base_ref...HEAD` of `repo_path`.
pub fn build_review_context(
    repo_path: &Path,
    base_ref: &str,
    changed_files: &[FileChange],
) -> CoreResult<String> {
    let git = GitOps::new();
    let mut sections = Vec::new();

    let log_range = format!("{}..HEAD", base_ref);
    let commits = git
        .execute(repo_path, &["log", "--pretty=format:- %s", log_range.as_str()])?
        .into_result()?;
    sections.push(format!("## Commits\n\n{}", commits.trim_end()));

    let diff_range = format!("{}...HEAD", base_ref);
    for change in changed_files {
        let header = match (&change.change_type, &change.old_path) {
            (ChangeType::Renamed, Some(old_path)) => {
                format!("## {} {} (was {})", change.change_type, change.path, old_path)
            }
            _ => format!("## {} {}", change.change_type, change.path),
        };

        let diff = git
            .execute(
                repo_path,
                &["diff", diff_range.as_str(), "--", change.path.as_str()],
            )?
            .into_result()?;
        let body = if diff.trim().is_empty() {
            format!(
                "(no textual diff: +{} -{})",
                change.additions, change.deletions
            )
        } else {
            format!("```diff\n{}\n```", diff.trim_end())
        };
        sections.push(format!("{}\n\n{}", header, body));
    }

    Ok(sections.join("\n\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::process::Command;
    use tempfile::TempDir;

    use groundcheck_tools::changed_files;

    fn git(repo: &Path, args: &[&str]) {
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

    fn setup_repo() -> (TempDir, std::path::PathBuf) {
        let dir = TempDir::new().unwrap();
        let repo = dir.path().to_path_buf();
        git(&repo, &["init"]);
        git(&repo, &["config", "user.email", "test@example.com"]);
        git(&repo, &["config", "user.name", "Test User"]);
        std::fs::write(repo.join("file1.py"), "def hello():\n    return 1\n").unwrap();
        git(&repo, &["add", "."]);
        git(&repo, &["commit", "-m", "Initial commit"]);
        git(&repo, &["branch", "-M", "main"]);
        git(&repo, &["checkout", "-b", "feature"]);
        std::fs::write(repo.join("file1.py"), "def hello():\n    return 2\n").unwrap();
        git(&repo, &["add", "."]);
        git(&repo, &["commit", "-m", "Change return value"]);
        (dir, repo)
    }

    #[test]
    fn test_context_includes_commits_and_diffs() {
        let (_dir, repo) = setup_repo();
        let changes = changed_files(&repo, "main").unwrap();
        let context = build_review_context(&repo, "main", &changes).unwrap();

        assert!(context.contains("## Commits"));
        assert!(context.contains("- Change return value"));
        assert!(context.contains("## modified file1.py"));
        assert!(context.contains("-    return 1"));
        assert!(context.contains("+    return 2"));
    }

    #[test]
    fn test_context_with_no_changes_has_commits_section_only() {
        let (_dir, repo) = setup_repo();
        let context = build_review_context(&repo, "main", &[]).unwrap();
        assert!(context.starts_with("## Commits"));
        assert!(!context.contains("```diff"));
    }
}
