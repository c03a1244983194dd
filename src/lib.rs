//! Groundcheck
//!
//! Evidence-grounded verification for automated code-review findings.
//!
//! An upstream review step produces findings; this library re-validates
//! each one against the repository before it reaches a user. Changed files
//! come from the git diff, grounding evidence from a context-aware search
//! and a line-range reader, and a three-stage generation pipeline
//! (questions, grounded answers, confidence scoring) annotates every
//! finding with a confidence score and rationale.
//!
//! The model itself is an integration point: callers supply an
//! [`LlmProvider`] and receive the same findings back, annotated, along
//! with the token usage of the run.

pub mod config;
pub mod context;
pub mod output;
pub mod render;

pub use config::{load_settings, VerifySettings};
pub use context::build_review_context;
pub use output::{determine_output_file, sanitize_branch_name};
pub use render::{render_report, ReviewReport};

pub use groundcheck_core::{
    ChangeType, CoreError, CoreResult, FileChange, FileSlice, IssueCategory, IssueLocation,
    IssueSeverity, ReviewIssue, SearchHit, VerifiedIssue,
};
pub use groundcheck_llm::{LlmProvider, UsageStats};
pub use groundcheck_tools::{changed_files, read_file_part, search_in_files, GitOps};
pub use groundcheck_verification::{run_verification, VerifyOptions, VerifyStage};
