//! Review Data Model
//!
//! Shared data structures for changed-file extraction, evidence slices,
//! and review findings. Everything here is computed fresh per review run
//! and is immutable once produced.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Ordered mapping from 1-indexed line number to the raw line text.
pub type LineMap = BTreeMap<usize, String>;

/// Search result: file path -> line number -> raw line text, covering both
/// matched lines and their context lines for every file with at least one
/// match. Line keys are unique per file; overlapping context windows from
/// adjacent matches collapse onto the same keys.
pub type SearchHit = BTreeMap<String, LineMap>;

/// Kind of change a file underwent relative to the baseline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeType {
    Added,
    Modified,
    Deleted,
    Renamed,
}

impl std::fmt::Display for ChangeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChangeType::Added => write!(f, "added"),
            ChangeType::Modified => write!(f, "modified"),
            ChangeType::Deleted => write!(f, "deleted"),
            ChangeType::Renamed => write!(f, "renamed"),
        }
    }
}

/// A single changed file between the baseline ref and HEAD.
///
/// Binary files always report `additions == deletions == 0` even though
/// the underlying diff marks them as changed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileChange {
    /// Relative path from the repository root (the post-change path)
    pub path: String,
    /// Kind of change
    pub change_type: ChangeType,
    /// Previous path, present only for renames
    #[serde(skip_serializing_if = "Option::is_none")]
    pub old_path: Option<String>,
    /// Lines added
    pub additions: u32,
    /// Lines deleted
    pub deletions: u32,
}

/// A contiguous slice of a file, keyed by true line number.
///
/// `total_lines` always reflects the file's full length regardless of the
/// requested window; a window past end-of-file simply yields fewer keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileSlice {
    /// File path -> line number -> raw line text
    pub lines: BTreeMap<String, LineMap>,
    /// True total line count of the file
    pub total_lines: usize,
}

/// Severity of a review finding, ordered critical-first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueSeverity {
    Critical,
    High,
    Medium,
    Low,
}

impl IssueSeverity {
    /// Sort rank: lower sorts first (critical before high, and so on).
    pub fn rank(&self) -> u8 {
        match self {
            IssueSeverity::Critical => 0,
            IssueSeverity::High => 1,
            IssueSeverity::Medium => 2,
            IssueSeverity::Low => 3,
        }
    }
}

impl std::fmt::Display for IssueSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IssueSeverity::Critical => write!(f, "critical"),
            IssueSeverity::High => write!(f, "high"),
            IssueSeverity::Medium => write!(f, "medium"),
            IssueSeverity::Low => write!(f, "low"),
        }
    }
}

/// Category of a review finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueCategory {
    Logic,
    Security,
    Performance,
    Maintainability,
    Testing,
    Documentation,
}

impl std::fmt::Display for IssueCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IssueCategory::Logic => write!(f, "logic"),
            IssueCategory::Security => write!(f, "security"),
            IssueCategory::Performance => write!(f, "performance"),
            IssueCategory::Maintainability => write!(f, "maintainability"),
            IssueCategory::Testing => write!(f, "testing"),
            IssueCategory::Documentation => write!(f, "documentation"),
        }
    }
}

/// A location a finding refers to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueLocation {
    /// File path relative to the repository root
    pub filename: String,
    /// Optional 1-indexed line number
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,
}

/// A single finding produced by an upstream review step.
///
/// Consumed read-only by the verification pipeline. Identity inside the
/// pipeline is the finding's positional index in the input list, not any
/// content hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewIssue {
    pub title: String,
    pub category: IssueCategory,
    pub severity: IssueSeverity,
    pub location: Vec<IssueLocation>,
    pub explanation: String,
    pub suggested_fix: String,
}

/// A finding annotated by the verification pipeline.
///
/// All original fields are unchanged; only `confidence` and `rationale`
/// are appended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifiedIssue {
    #[serde(flatten)]
    pub issue: ReviewIssue,
    /// Confidence that the finding is real, 0-10 inclusive
    pub confidence: u8,
    /// Free-text justification for the score
    pub rationale: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_change_type_serialization() {
        let json = serde_json::to_string(&ChangeType::Renamed).unwrap();
        assert_eq!(json, "\"renamed\"");
        let parsed: ChangeType = serde_json::from_str("\"added\"").unwrap();
        assert_eq!(parsed, ChangeType::Added);
    }

    #[test]
    fn test_file_change_old_path_omitted_when_absent() {
        let change = FileChange {
            path: "src/lib.rs".to_string(),
            change_type: ChangeType::Modified,
            old_path: None,
            additions: 2,
            deletions: 1,
        };
        let json = serde_json::to_string(&change).unwrap();
        assert!(!json.contains("old_path"));
    }

    #[test]
    fn test_severity_rank_orders_critical_first() {
        assert!(IssueSeverity::Critical.rank() < IssueSeverity::High.rank());
        assert!(IssueSeverity::High.rank() < IssueSeverity::Medium.rank());
        assert!(IssueSeverity::Medium.rank() < IssueSeverity::Low.rank());
    }

    #[test]
    fn test_verified_issue_flattens_original_fields() {
        let issue = ReviewIssue {
            title: "Null pointer".to_string(),
            category: IssueCategory::Logic,
            severity: IssueSeverity::High,
            location: vec![IssueLocation {
                filename: "main.py".to_string(),
                line: Some(10),
            }],
            explanation: "Variable may be null".to_string(),
            suggested_fix: "Add null check".to_string(),
        };
        let verified = VerifiedIssue {
            issue: issue.clone(),
            confidence: 9,
            rationale: "Issue confirmed".to_string(),
        };
        let json = serde_json::to_value(&verified).unwrap();
        assert_eq!(json["title"], "Null pointer");
        assert_eq!(json["confidence"], 9);
        assert_eq!(json["rationale"], "Issue confirmed");

        let roundtrip: VerifiedIssue = serde_json::from_value(json).unwrap();
        assert_eq!(roundtrip.issue, issue);
    }

    #[test]
    fn test_file_slice_roundtrip() {
        let mut file_lines = LineMap::new();
        file_lines.insert(1, "def hello():".to_string());
        file_lines.insert(2, "    return 1".to_string());
        let mut lines = BTreeMap::new();
        lines.insert("file1.py".to_string(), file_lines);

        let slice = FileSlice {
            lines,
            total_lines: 3,
        };
        let json = serde_json::to_string(&slice).unwrap();
        let parsed: FileSlice = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.total_lines, 3);
        assert_eq!(parsed.lines["file1.py"][&1], "def hello():");
    }
}
