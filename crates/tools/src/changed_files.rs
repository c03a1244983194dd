//! Changed File Extraction
//!
//! Extracts the set of files changed between a baseline ref and HEAD by
//! joining two diff queries: `--name-status` for the change kind (and, for
//! renames, both paths) and `--numstat` for per-file added/deleted counts.
//!
//! Numstat reports `-`/`-` for binary files; those become `0`/`0` rather
//! than being fed to an integer parser. A path present in the name-status
//! output but absent from the numstat join (mode changes, rename notation
//! differences) also defaults to `0`/`0`.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use groundcheck_core::tool::{Tool, ToolContext, ToolResult};
use groundcheck_core::{ChangeType, CoreError, CoreResult, FileChange};

use crate::git_ops::GitOps;

/// Extract all changes between `base_ref...HEAD`.
pub fn changed_files(repo_path: &Path, base_ref: &str) -> CoreResult<Vec<FileChange>> {
    let git = GitOps::new();
    let range = format!("{}...HEAD", base_ref);

    let name_status = git
        .execute(repo_path, &["diff", "--name-status", range.as_str()])?
        .into_result()?;
    let numstat = git
        .execute(repo_path, &["diff", "--numstat", range.as_str()])?
        .into_result()?;

    let counts = parse_numstat(&numstat)?;
    parse_name_status(&name_status, &counts)
}

/// Parse one numstat count field: a number, or `-` for binary files.
fn parse_count(field: &str) -> CoreResult<u32> {
    if field == "-" {
        return Ok(0);
    }
    field
        .parse::<u32>()
        .map_err(|_| CoreError::parse(format!("invalid numstat count: {:?}", field)))
}

/// Parse `git diff --numstat` output into a path -> (additions, deletions)
/// map. Rename lines carry `old => new` notation in the path field and
/// simply never match a name-status path, which is fine: the join falls
/// back to zero counts.
fn parse_numstat(output: &str) -> CoreResult<HashMap<String, (u32, u32)>> {
    let mut counts = HashMap::new();
    for line in output.lines() {
        if line.trim().is_empty() {
            continue;
        }
        let mut fields = line.splitn(3, '\t');
        let (additions, deletions, path) = match (fields.next(), fields.next(), fields.next()) {
            (Some(a), Some(d), Some(p)) => (parse_count(a)?, parse_count(d)?, p),
            _ => {
                return Err(CoreError::parse(format!(
                    "unexpected numstat line: {:?}",
                    line
                )))
            }
        };
        counts.insert(path.to_string(), (additions, deletions));
    }
    Ok(counts)
}

/// Parse `git diff --name-status` output, joining in numstat counts by the
/// final path.
fn parse_name_status(
    output: &str,
    counts: &HashMap<String, (u32, u32)>,
) -> CoreResult<Vec<FileChange>> {
    let mut changes = Vec::new();
    for line in output.lines() {
        if line.trim().is_empty() {
            continue;
        }
        let fields: Vec<&str> = line.split('\t').collect();
        if fields.len() < 2 {
            return Err(CoreError::parse(format!(
                "unexpected name-status line: {:?}",
                line
            )));
        }

        let status = fields[0];
        let change_type = match status.chars().next() {
            Some('A') => ChangeType::Added,
            Some('M') => ChangeType::Modified,
            Some('D') => ChangeType::Deleted,
            Some('R') => ChangeType::Renamed,
            _ => ChangeType::Modified,
        };

        // Rename lines carry three fields: status, old path, new path.
        let (old_path, path) = if status.starts_with('R') && fields.len() >= 3 {
            (Some(fields[1].to_string()), fields[2].to_string())
        } else {
            (None, fields[1].to_string())
        };

        let (additions, deletions) = counts.get(&path).copied().unwrap_or((0, 0));
        changes.push(FileChange {
            path,
            change_type,
            old_path,
            additions,
            deletions,
        });
    }
    Ok(changes)
}

/// Evidence tool listing all files changed between the baseline and HEAD.
pub struct ChangedFilesTool;

#[async_trait]
impl Tool for ChangedFilesTool {
    fn name(&self) -> &str {
        "changed_files"
    }

    fn description(&self) -> &str {
        "List all files that changed between the baseline ref and the current branch (HEAD), with change type, rename source, and added/deleted line counts."
    }

    fn parameters_schema(&self) -> Value {
        serde_json::json!({
            "type": "object",
            "properties": {}
        })
    }

    async fn execute(&self, ctx: &ToolContext, _args: Value) -> ToolResult {
        match changed_files(&ctx.repo_path, &ctx.base_ref) {
            Ok(changes) => match serde_json::to_string_pretty(&changes) {
                Ok(json) => ToolResult::ok(json),
                Err(e) => ToolResult::err(format!("Failed to serialize changes: {}", e)),
            },
            Err(e) => ToolResult::err(format!("Error getting changed files: {}", e)),
        }
    }
}

/// Shared constructor used by the registry builder.
pub fn tool() -> Arc<dyn Tool> {
    Arc::new(ChangedFilesTool)
}
