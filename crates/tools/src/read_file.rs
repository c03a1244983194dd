//! Line-Range File Reader
//!
//! Reads a contiguous line range from a file under the repository root.
//! `start_line` is 1-indexed; a window past end-of-file returns only the
//! lines that exist, and `total_lines` always reflects the file's true
//! length. Content is treated as opaque line-split text: non-UTF-8 bytes
//! are decoded lossily rather than rejected.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use groundcheck_core::tool::{Tool, ToolContext, ToolResult};
use groundcheck_core::{CoreError, CoreResult, FileSlice, LineMap};

const DEFAULT_NUM_LINES: usize = 200;

/// Read `num_lines` lines of `file_path` starting at `start_line`.
pub fn read_file_part(
    repo_path: &Path,
    file_path: &str,
    start_line: usize,
    num_lines: usize,
) -> CoreResult<FileSlice> {
    let path = repo_path.join(file_path);
    if !path.is_file() {
        return Err(CoreError::not_found(format!(
            "File not found: {}",
            file_path
        )));
    }

    let bytes = std::fs::read(&path)?;
    let content = String::from_utf8_lossy(&bytes);
    let all_lines: Vec<&str> = content.lines().collect();
    let total_lines = all_lines.len();

    let start = start_line.max(1) - 1;
    let end = start.saturating_add(num_lines).min(total_lines);

    let mut window = LineMap::new();
    if start < total_lines {
        for (offset, line) in all_lines[start..end].iter().enumerate() {
            window.insert(start + offset + 1, (*line).to_string());
        }
    }

    let mut lines = BTreeMap::new();
    lines.insert(file_path.to_string(), window);
    Ok(FileSlice { lines, total_lines })
}

/// Evidence tool reading a specific line range from a file.
pub struct ReadFilePartTool;

#[async_trait]
impl Tool for ReadFilePartTool {
    fn name(&self) -> &str {
        "read_file_part"
    }

    fn description(&self) -> &str {
        "Read a range of lines from a file in the repository. Returns the requested lines keyed by 1-indexed line number, plus the file's total line count."
    }

    fn parameters_schema(&self) -> Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "file_path": {
                    "type": "string",
                    "description": "Path relative to the repository root"
                },
                "start_line": {
                    "type": "integer",
                    "description": "1-indexed line to start reading from (default 1)"
                },
                "num_lines": {
                    "type": "integer",
                    "description": "Number of lines to read (default 200)"
                }
            },
            "required": ["file_path"]
        })
    }

    async fn execute(&self, ctx: &ToolContext, args: Value) -> ToolResult {
        let file_path = match args.get("file_path").and_then(|v| v.as_str()) {
            Some(p) => p,
            None => return ToolResult::err("Missing required parameter: file_path"),
        };
        let start_line = args
            .get("start_line")
            .and_then(|v| v.as_u64())
            .unwrap_or(1) as usize;
        let num_lines = args
            .get("num_lines")
            .and_then(|v| v.as_u64())
            .unwrap_or(DEFAULT_NUM_LINES as u64) as usize;

        match read_file_part(&ctx.repo_path, file_path, start_line, num_lines) {
            Ok(slice) => match serde_json::to_string_pretty(&slice) {
                Ok(json) => ToolResult::ok(json),
                Err(e) => ToolResult::err(format!("Failed to serialize slice: {}", e)),
            },
            Err(e) => ToolResult::err(format!("Error reading file: {}", e)),
        }
    }
}

/// Shared constructor used by the registry builder.
pub fn tool() -> Arc<dyn Tool> {
    Arc::new(ReadFilePartTool)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::create_test_repo;

    #[test]
    fn test_read_first_two_lines_of_three_line_file() {
        let (_dir, repo) = create_test_repo();
        let slice = read_file_part(&repo, "file1.py", 1, 2).unwrap();

        let file_lines = &slice.lines["file1.py"];
        assert_eq!(
            file_lines.keys().copied().collect::<Vec<_>>(),
            vec![1, 2]
        );
        assert!(file_lines[&1].contains("def hello():"));
        assert_eq!(slice.total_lines, 3);
    }

    #[test]
    fn test_window_past_end_of_file_is_clamped() {
        let (_dir, repo) = create_test_repo();
        let slice = read_file_part(&repo, "file1.py", 2, 100).unwrap();

        let file_lines = &slice.lines["file1.py"];
        assert_eq!(
            file_lines.keys().copied().collect::<Vec<_>>(),
            vec![2, 3]
        );
        assert_eq!(slice.total_lines, 3);
    }

    #[test]
    fn test_start_beyond_end_of_file_returns_empty_window() {
        let (_dir, repo) = create_test_repo();
        let slice = read_file_part(&repo, "file1.py", 50, 10).unwrap();
        assert!(slice.lines["file1.py"].is_empty());
        assert_eq!(slice.total_lines, 3);
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let (_dir, repo) = create_test_repo();
        let err = read_file_part(&repo, "nope.py", 1, 5).unwrap_err();
        assert!(matches!(err, CoreError::NotFound(_)));
    }

    #[test]
    fn test_no_trailing_newline() {
        let (_dir, repo) = create_test_repo();
        std::fs::write(repo.join("raw.txt"), "alpha\nbeta").unwrap();
        let slice = read_file_part(&repo, "raw.txt", 1, 10).unwrap();
        assert_eq!(slice.total_lines, 2);
        assert_eq!(slice.lines["raw.txt"][&2], "beta");
    }

    #[test]
    fn test_non_utf8_content_is_decoded_lossily() {
        let (_dir, repo) = create_test_repo();
        std::fs::write(repo.join("mixed.bin"), b"plain\n\xff\xfe garbled\n").unwrap();
        let slice = read_file_part(&repo, "mixed.bin", 1, 10).unwrap();
        assert_eq!(slice.total_lines, 2);
        assert_eq!(slice.lines["mixed.bin"][&1], "plain");
    }

    #[tokio::test]
    async fn test_read_tool_missing_param() {
        let (_dir, repo) = create_test_repo();
        let ctx = ToolContext::new("run", &repo, "main");
        let result = ReadFilePartTool
            .execute(&ctx, serde_json::json!({}))
            .await;
        assert!(!result.success);
        assert!(result.error.unwrap().contains("file_path"));
    }

    #[tokio::test]
    async fn test_read_tool_missing_file_becomes_error_outcome() {
        let (_dir, repo) = create_test_repo();
        let ctx = ToolContext::new("run", &repo, "main");
        let result = ReadFilePartTool
            .execute(&ctx, serde_json::json!({"file_path": "ghost.py"}))
            .await;
        assert!(!result.success);
        assert!(result.to_content().contains("Not found"));
    }
}
