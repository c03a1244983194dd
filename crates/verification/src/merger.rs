//! Issue Merger
//!
//! Joins the scoring stage's verdicts back onto the original findings by
//! positional identity. Pure and deterministic: given identical inputs the
//! output is identical, ordering and every original field preserved.
//!
//! Stage outputs are model-generated and only weakly trusted: an id is a
//! lookup into a bounds-checked map, never a direct index. Out-of-range
//! and duplicate ids are discarded with a logged inconsistency; a finding
//! left without a verdict is fatal, since an un-scored finding must never
//! reach users as "verified".

use std::collections::HashMap;

use groundcheck_core::{CoreError, CoreResult, ReviewIssue, VerifiedIssue};

use crate::schema::IssueVerification;

/// Merge verification verdicts onto the original findings list.
pub fn merge(
    findings: &[ReviewIssue],
    verifications: &[IssueVerification],
) -> CoreResult<Vec<VerifiedIssue>> {
    let mut by_id: HashMap<usize, &IssueVerification> = HashMap::new();
    for verification in verifications {
        if verification.issue_id >= findings.len() {
            tracing::warn!(
                issue_id = verification.issue_id,
                finding_count = findings.len(),
                "discarding verification with out-of-range issue id"
            );
            continue;
        }
        if by_id.contains_key(&verification.issue_id) {
            tracing::warn!(
                issue_id = verification.issue_id,
                "discarding duplicate verification for issue id"
            );
            continue;
        }
        by_id.insert(verification.issue_id, verification);
    }

    let mut merged = Vec::with_capacity(findings.len());
    for (id, finding) in findings.iter().enumerate() {
        let verification = by_id.get(&id).ok_or_else(|| {
            CoreError::incomplete(format!("finding {} has no verification result", id))
        })?;
        merged.push(VerifiedIssue {
            issue: finding.clone(),
            confidence: verification.confidence,
            rationale: verification.rationale.clone(),
        });
    }
    Ok(merged)
}
