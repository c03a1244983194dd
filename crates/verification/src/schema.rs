//! Stage Output Schemas
//!
//! Structured shapes each verification stage must return. `issue_id` is the
//! positional index of the finding in the pipeline's input list; it is the
//! sole join key across stages and is treated as untrusted model output
//! until validated.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use groundcheck_core::{CoreError, CoreResult};

/// Highest confidence the scoring stage may assign.
pub const MAX_CONFIDENCE: u8 = 10;

/// Verification questions generated for one finding.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IssueQuestions {
    /// Index of the finding in the original list
    pub issue_id: usize,
    /// Questions whose answers would confirm or refute the finding
    pub questions: Vec<String>,
}

/// Output of the question generation stage: one entry per finding.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionsOutput {
    pub issues: Vec<IssueQuestions>,
}

impl QuestionsOutput {
    /// Every finding entering the pipeline must receive questions; a
    /// finding absent from this output would otherwise silently reach the
    /// user "verified" without ever being examined.
    pub fn ensure_complete(&self, finding_count: usize) -> CoreResult<()> {
        let seen: HashSet<usize> = self.issues.iter().map(|q| q.issue_id).collect();
        for id in 0..finding_count {
            if !seen.contains(&id) {
                return Err(CoreError::incomplete(format!(
                    "question generation produced no questions for finding {}",
                    id
                )));
            }
        }
        Ok(())
    }
}

/// One question together with its evidence-grounded answer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionAnswer {
    pub question: String,
    pub answer: String,
}

/// Answers for one finding's question set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IssueAnswers {
    /// Index of the finding in the original list
    pub issue_id: usize,
    pub answers: Vec<QuestionAnswer>,
}

/// Output of the grounded answering stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnswersOutput {
    pub issues: Vec<IssueAnswers>,
}

/// Confidence verdict for one finding.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IssueVerification {
    /// Index of the finding in the original list
    pub issue_id: usize,
    /// Confidence that the finding is real, 0-10 inclusive
    pub confidence: u8,
    /// Free-text justification for the score
    pub rationale: String,
}

/// Output of the confidence scoring stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationOutput {
    pub issues: Vec<IssueVerification>,
}

impl VerificationOutput {
    /// Enforce the documented confidence range. Out-of-range values are a
    /// schema violation, not something to silently clamp.
    pub fn validate(&self) -> CoreResult<()> {
        for issue in &self.issues {
            if issue.confidence > MAX_CONFIDENCE {
                return Err(CoreError::schema(format!(
                    "confidence {} for finding {} outside 0-{}",
                    issue.confidence, issue.issue_id, MAX_CONFIDENCE
                )));
            }
        }
        Ok(())
    }
}
