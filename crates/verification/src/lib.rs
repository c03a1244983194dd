//! Groundcheck Verification
//!
//! The evidence-grounded verification pipeline: question generation,
//! grounded answering with the evidence tools, confidence scoring, and the
//! merge back onto the original findings.

pub mod merger;
pub mod pipeline;
pub mod prompts;
pub mod schema;

pub use merger::merge;
pub use pipeline::{run_verification, VerifyOptions, VerifyStage};
pub use schema::{
    AnswersOutput, IssueAnswers, IssueQuestions, IssueVerification, QuestionAnswer,
    QuestionsOutput, VerificationOutput, MAX_CONFIDENCE,
};
