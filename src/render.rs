//! Markdown Rendering
//!
//! Renders a verified review to markdown: a summary, a severity-sorted
//! issues table, and a detail section per issue including its confidence
//! and rationale.

use groundcheck_core::{IssueSeverity, VerifiedIssue};

/// A complete review ready for rendering.
#[derive(Debug, Clone)]
pub struct ReviewReport {
    /// High-level summary of the change set
    pub description: String,
    /// Verified findings
    pub issues: Vec<VerifiedIssue>,
}

fn severity_marker(severity: IssueSeverity) -> &'static str {
    match severity {
        IssueSeverity::Critical => "🔴",
        IssueSeverity::High => "🟠",
        IssueSeverity::Medium => "🟡",
        IssueSeverity::Low => "🟢",
    }
}

fn sorted_by_severity(issues: &[VerifiedIssue]) -> Vec<&VerifiedIssue> {
    let mut sorted: Vec<&VerifiedIssue> = issues.iter().collect();
    sorted.sort_by_key(|issue| issue.issue.severity.rank());
    sorted
}

fn render_summary_table(issues: &[&VerifiedIssue]) -> String {
    let mut lines = vec![
        "## Issues Summary".to_string(),
        String::new(),
        "| # | Title | Category | Severity | Confidence | Location |".to_string(),
        "|---|-------|----------|----------|------------|----------|".to_string(),
    ];

    for (index, verified) in issues.iter().enumerate() {
        let issue = &verified.issue;
        let mut file_path = issue
            .location
            .first()
            .map(|loc| loc.filename.clone())
            .unwrap_or_else(|| "-".to_string());
        if issue.location.len() > 1 {
            file_path.push_str(&format!(" (+{})", issue.location.len() - 1));
        }
        lines.push(format!(
            "| {} | {} | {} | {} {} | {}/10 | `{}` |",
            index + 1,
            issue.title,
            issue.category,
            severity_marker(issue.severity),
            issue.severity,
            verified.confidence,
            file_path
        ));
    }

    lines.push(String::new());
    lines.join("\n")
}

fn render_issue(verified: &VerifiedIssue, index: usize) -> String {
    let issue = &verified.issue;
    let locations = issue
        .location
        .iter()
        .map(|loc| match loc.line {
            Some(line) => format!("`{}` (line {})", loc.filename, line),
            None => format!("`{}`", loc.filename),
        })
        .collect::<Vec<_>>()
        .join(", ");

    let lines = vec![
        format!("### {}. {}", index, issue.title),
        String::new(),
        format!(
            "**Severity:** {} {}  ",
            severity_marker(issue.severity),
            issue.severity
        ),
        format!("**Category:** {}  ", issue.category),
        format!("**Confidence:** {}/10  ", verified.confidence),
        format!("**Location:** {}", locations),
        String::new(),
        "#### Explanation".to_string(),
        String::new(),
        issue.explanation.clone(),
        String::new(),
        "#### Verification Rationale".to_string(),
        String::new(),
        verified.rationale.clone(),
        String::new(),
        "#### Suggested Fix".to_string(),
        String::new(),
        issue.suggested_fix.clone(),
        String::new(),
    ];

    lines.join("\n")
}

/// Render a verified review to markdown.
pub fn render_report(report: &ReviewReport) -> String {
    let mut sections = vec![
        "# Code Review".to_string(),
        String::new(),
        "## Summary".to_string(),
        String::new(),
        report.description.clone(),
        String::new(),
    ];

    if report.issues.is_empty() {
        sections.push("## Issues Summary".to_string());
        sections.push(String::new());
        sections.push("No issues found during the review. ✅".to_string());
        sections.push(String::new());
    } else {
        let sorted = sorted_by_severity(&report.issues);
        sections.push(render_summary_table(&sorted));
        sections.push("## Issues Details".to_string());
        sections.push(String::new());
        for (index, issue) in sorted.iter().enumerate() {
            sections.push(render_issue(issue, index + 1));
        }
    }

    sections.join("\n")
}
