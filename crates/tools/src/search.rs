//! Context-Aware Content Search
//!
//! Searches tracked file contents at HEAD via `git grep`, with optional
//! symmetric context lines, and reassembles the output into one ordered
//! per-file mapping keyed by true line number.
//!
//! The grep output uses two separator conventions: a directly matching
//! line is `source:file:line:content`, while a context line that did not
//! itself match is `source:file-line-content`. The parser branches on
//! which convention is present and splits on the first delimiters only, so
//! content containing colons or hyphens survives intact. Lines are never
//! truncated; evidence fidelity matters more than output size.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use groundcheck_core::tool::{Tool, ToolContext, ToolResult};
use groundcheck_core::{CoreError, CoreResult, SearchHit};

use crate::git_ops::GitOps;

/// One parsed grep output line, before flattening into the per-file map.
#[derive(Debug, Clone, PartialEq, Eq)]
enum GrepLine {
    /// A line that matched the pattern
    Match {
        file: String,
        line: usize,
        text: String,
    },
    /// A surrounding context line that did not itself match
    Context {
        file: String,
        line: usize,
        text: String,
    },
}

impl GrepLine {
    fn into_parts(self) -> (String, usize, String) {
        match self {
            GrepLine::Match { file, line, text } | GrepLine::Context { file, line, text } => {
                (file, line, text)
            }
        }
    }
}

/// Parse one raw grep output line, or `None` for separators and
/// unrecognized lines (binary-file notices, etc.).
fn parse_grep_line(raw: &str) -> Option<GrepLine> {
    if raw == "--" {
        return None;
    }

    // Strip the revision prefix; everything after the first colon is
    // `file:line:content` or `file-line-content`.
    let (_source, rest) = raw.split_once(':')?;

    // Matching line: split on the first two remaining colons.
    let mut fields = rest.splitn(3, ':');
    if let (Some(file), Some(number), Some(text)) = (fields.next(), fields.next(), fields.next()) {
        if let Ok(line) = number.parse::<usize>() {
            return Some(GrepLine::Match {
                file: file.to_string(),
                line,
                text: text.to_string(),
            });
        }
    }

    // Context line: hyphen-delimited, again split on the first two only.
    let mut fields = rest.splitn(3, '-');
    if let (Some(file), Some(number), Some(text)) = (fields.next(), fields.next(), fields.next()) {
        if let Ok(line) = number.parse::<usize>() {
            return Some(GrepLine::Context {
                file: file.to_string(),
                line,
                text: text.to_string(),
            });
        }
    }

    None
}

/// Search tracked content at HEAD for `pattern`, returning every matching
/// line plus `context_lines` of symmetric context, keyed by file and true
/// line number. Overlapping context windows collapse onto the same keys.
pub fn search_in_files(
    repo_path: &Path,
    pattern: &str,
    context_lines: usize,
) -> CoreResult<SearchHit> {
    let git = GitOps::new();
    let context = context_lines.to_string();
    let mut args = vec!["grep", "-n", "--no-color"];
    if context_lines > 0 {
        args.push("-C");
        args.push(context.as_str());
    }
    args.push("-e");
    args.push(pattern);
    args.push("HEAD");

    let result = git.execute(repo_path, &args)?;
    if !result.success {
        // git grep exits 1 for "no matches", which is an empty result, not
        // a failure.
        if result.exit_code == 1 && result.stderr.trim().is_empty() {
            return Ok(SearchHit::new());
        }
        return Err(CoreError::external_tool(format!(
            "git grep failed (exit {}): {}",
            result.exit_code,
            result.stderr.trim()
        )));
    }

    let mut hits = SearchHit::new();
    for raw in result.stdout.lines() {
        if let Some(parsed) = parse_grep_line(raw) {
            let (file, line, text) = parsed.into_parts();
            hits.entry(file).or_default().insert(line, text);
        }
    }
    Ok(hits)
}

/// Evidence tool searching tracked content with optional context lines.
pub struct SearchInFilesTool;

#[async_trait]
impl Tool for SearchInFilesTool {
    fn name(&self) -> &str {
        "search_in_files"
    }

    fn description(&self) -> &str {
        "Search all tracked files for a pattern. Returns matching lines and surrounding context keyed by file path and 1-indexed line number."
    }

    fn parameters_schema(&self) -> Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "pattern": {
                    "type": "string",
                    "description": "Pattern to search for"
                },
                "context_lines": {
                    "type": "integer",
                    "description": "Number of context lines before and after each match (default 0)"
                }
            },
            "required": ["pattern"]
        })
    }

    async fn execute(&self, ctx: &ToolContext, args: Value) -> ToolResult {
        let pattern = match args.get("pattern").and_then(|v| v.as_str()) {
            Some(p) => p,
            None => return ToolResult::err("Missing required parameter: pattern"),
        };
        let context_lines = args
            .get("context_lines")
            .and_then(|v| v.as_u64())
            .unwrap_or(0) as usize;

        match search_in_files(&ctx.repo_path, pattern, context_lines) {
            Ok(hits) => match serde_json::to_string_pretty(&hits) {
                Ok(json) => ToolResult::ok(json),
                Err(e) => ToolResult::err(format!("Failed to serialize search hits: {}", e)),
            },
            Err(e) => ToolResult::err(format!("Error searching files: {}", e)),
        }
    }
}

/// Shared constructor used by the registry builder.
pub fn tool() -> Arc<dyn Tool> {
    Arc::new(SearchInFilesTool)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{commit_file, create_test_repo};

    #[test]
    fn test_parse_match_line() {
        let parsed = parse_grep_line("HEAD:src/lib.rs:12:fn main() {").unwrap();
        assert_eq!(
            parsed,
            GrepLine::Match {
                file: "src/lib.rs".to_string(),
                line: 12,
                text: "fn main() {".to_string(),
            }
        );
    }

    #[test]
    fn test_parse_context_line() {
        let parsed = parse_grep_line("HEAD:src/lib.rs-11-use std::fmt;").unwrap();
        assert_eq!(
            parsed,
            GrepLine::Context {
                file: "src/lib.rs".to_string(),
                line: 11,
                text: "use std::fmt;".to_string(),
            }
        );
    }

    #[test]
    fn test_parse_match_content_with_colons() {
        let parsed = parse_grep_line("HEAD:a.py:3:value = {'k': 'v:1'}").unwrap();
        let (file, line, text) = parsed.into_parts();
        assert_eq!(file, "a.py");
        assert_eq!(line, 3);
        assert_eq!(text, "value = {'k': 'v:1'}");
    }

    #[test]
    fn test_parse_context_content_with_hyphens() {
        let parsed = parse_grep_line("HEAD:a.py-4-x = a - b - c").unwrap();
        let (file, line, text) = parsed.into_parts();
        assert_eq!(file, "a.py");
        assert_eq!(line, 4);
        assert_eq!(text, "x = a - b - c");
    }

    #[test]
    fn test_parse_skips_separators_and_noise() {
        assert!(parse_grep_line("--").is_none());
        assert!(parse_grep_line("Binary file HEAD:img.png matches").is_none());
    }

    #[test]
    fn test_search_finds_matches() {
        let (_dir, repo) = create_test_repo();
        let hits = search_in_files(&repo, "def", 0).unwrap();
        assert!(!hits.is_empty());
        let all_lines: Vec<&String> = hits.values().flat_map(|m| m.values()).collect();
        assert!(all_lines.iter().any(|l| l.contains("def")));
    }

    #[test]
    fn test_search_context_window_has_correct_line_numbers() {
        let (_dir, repo) = create_test_repo();
        commit_file(
            &repo,
            "context_test.py",
            "line1\nline2\nMATCH\nline4\nline5\n",
            "Add context test file",
        );

        let hits = search_in_files(&repo, "MATCH", 2).unwrap();
        let file_lines = &hits["context_test.py"];

        assert_eq!(
            file_lines.keys().copied().collect::<Vec<_>>(),
            vec![1, 2, 3, 4, 5]
        );
        assert_eq!(file_lines[&1], "line1");
        assert_eq!(file_lines[&2], "line2");
        assert_eq!(file_lines[&3], "MATCH");
        assert_eq!(file_lines[&4], "line4");
        assert_eq!(file_lines[&5], "line5");
    }

    #[test]
    fn test_search_returns_raw_untruncated_lines() {
        let (_dir, repo) = create_test_repo();
        let long_line = format!("searchterm {}", "a".repeat(1000));
        commit_file(&repo, "longfile.py", &long_line, "Add long file");

        let hits = search_in_files(&repo, "searchterm", 0).unwrap();
        let file_lines = &hits["longfile.py"];
        assert!(file_lines.values().any(|l| l.len() > 500));
    }

    #[test]
    fn test_overlapping_context_windows_collapse() {
        let (_dir, repo) = create_test_repo();
        commit_file(
            &repo,
            "overlap.py",
            "MATCH one\nfiller\nMATCH two\ntail\n",
            "Add overlap file",
        );

        let hits = search_in_files(&repo, "MATCH", 2).unwrap();
        let file_lines = &hits["overlap.py"];
        // Both windows cover lines 1-4; keys are unique and in order.
        assert_eq!(
            file_lines.keys().copied().collect::<Vec<_>>(),
            vec![1, 2, 3, 4]
        );
    }

    #[test]
    fn test_search_no_matches_is_empty() {
        let (_dir, repo) = create_test_repo();
        let hits = search_in_files(&repo, "zzz_never_present", 0).unwrap();
        assert!(hits.is_empty());
    }

    #[tokio::test]
    async fn test_search_tool_missing_param() {
        let (_dir, repo) = create_test_repo();
        let ctx = ToolContext::new("run", &repo, "main");
        let result = SearchInFilesTool.execute(&ctx, serde_json::json!({})).await;
        assert!(!result.success);
        assert!(result.error.unwrap().contains("pattern"));
    }

    #[tokio::test]
    async fn test_search_tool_outputs_json() {
        let (_dir, repo) = create_test_repo();
        let ctx = ToolContext::new("run", &repo, "main");
        let result = SearchInFilesTool
            .execute(&ctx, serde_json::json!({"pattern": "def"}))
            .await;
        assert!(result.success);
        let parsed: SearchHit = serde_json::from_str(&result.output.unwrap()).unwrap();
        assert!(!parsed.is_empty());
    }
}
