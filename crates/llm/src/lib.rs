//! Groundcheck LLM
//!
//! Provider abstraction and the structured generation driver. The pipeline
//! talks to models exclusively through [`LlmProvider`] and
//! [`structured::run_structured`]; concrete network providers live with the
//! embedding application.

pub mod provider;
pub mod structured;
pub mod types;

pub use provider::LlmProvider;
pub use structured::{extract_json, run_structured, StructuredRequest, ToolAccess};
pub use types::{
    LlmError, LlmResponse, LlmResult, Message, MessageContent, MessageRole, StopReason, ToolCall,
    ToolDefinition, UsageStats,
};
