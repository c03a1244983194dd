//! Groundcheck Core
//!
//! Foundational error types, review data model, and the evidence tool
//! abstraction shared by every crate in the Groundcheck workspace.
//!
//! This crate is intentionally lightweight: serde, serde_json, async-trait
//! and thiserror only.

pub mod error;
pub mod tool;
pub mod types;

pub use error::{CoreError, CoreResult};
pub use tool::{Tool, ToolContext, ToolRegistry, ToolResult};
pub use types::{
    ChangeType, FileChange, FileSlice, IssueCategory, IssueLocation, IssueSeverity, LineMap,
    ReviewIssue, SearchHit, VerifiedIssue,
};
