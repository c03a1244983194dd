//! Core Error Types
//!
//! Defines the foundational error taxonomy used across the Groundcheck
//! workspace. These error types are dependency-free (only thiserror + std)
//! to keep the core crate lightweight.
//!
//! The fatality policy lives with the callers: evidence-tool failures inside
//! the answering stage are absorbed as tool output, while the same errors
//! raised during extraction or from a generation stage abort the whole run.

use thiserror::Error;

/// Core error type for the Groundcheck workspace.
#[derive(Error, Debug)]
pub enum CoreError {
    /// An external process (git diff, git grep) exited non-zero
    #[error("External tool error: {0}")]
    ExternalTool(String),

    /// Process output did not match the expected tabular/line shape
    #[error("Parse error: {0}")]
    Parse(String),

    /// Requested file or path does not exist at the requested state
    #[error("Not found: {0}")]
    NotFound(String),

    /// A generation stage's structured output omitted a required finding
    #[error("Incomplete output: {0}")]
    IncompleteOutput(String),

    /// A generation stage's output violated its declared shape or range
    #[error("Schema violation: {0}")]
    SchemaViolation(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// The generation layer failed (provider error, retries exhausted)
    #[error("Generation error: {0}")]
    Generation(String),

    /// The run was cancelled before completing
    #[error("Verification cancelled")]
    Cancelled,

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type alias for core errors
pub type CoreResult<T> = Result<T, CoreError>;

impl CoreError {
    /// Create an external tool error
    pub fn external_tool(msg: impl Into<String>) -> Self {
        Self::ExternalTool(msg.into())
    }

    /// Create a parse error
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    /// Create a not found error
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Create an incomplete output error
    pub fn incomplete(msg: impl Into<String>) -> Self {
        Self::IncompleteOutput(msg.into())
    }

    /// Create a schema violation error
    pub fn schema(msg: impl Into<String>) -> Self {
        Self::SchemaViolation(msg.into())
    }

    /// Create a config error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a generation error
    pub fn generation(msg: impl Into<String>) -> Self {
        Self::Generation(msg.into())
    }
}

/// Convert CoreError to a string
impl From<CoreError> for String {
    fn from(err: CoreError) -> String {
        err.to_string()
    }
}
