//! Evidence Tool Trait
//!
//! Defines the read-only evidence tool abstraction offered to the grounded
//! answering stage, and the registry that dispatches tool calls by name.
//!
//! Tools never mutate repository state. A tool failure is reported through
//! `ToolResult::err` and rendered as error text for the model; it is the
//! caller's policy, not the tool's, whether that failure is fatal.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

/// Context provided to each evidence tool during execution.
///
/// Carries the repository handle the whole verification run is scoped to:
/// tools answer questions about `base_ref...HEAD` of `repo_path` and
/// nothing else.
#[derive(Debug, Clone)]
pub struct ToolContext {
    /// Unique identifier for the verification run
    pub session_id: String,
    /// Path to the git repository under review
    pub repo_path: PathBuf,
    /// Baseline ref the changes are compared against
    pub base_ref: String,
}

impl ToolContext {
    pub fn new(
        session_id: impl Into<String>,
        repo_path: impl Into<PathBuf>,
        base_ref: impl Into<String>,
    ) -> Self {
        Self {
            session_id: session_id.into(),
            repo_path: repo_path.into(),
            base_ref: base_ref.into(),
        }
    }
}

/// Result of a tool execution.
#[derive(Debug, Clone)]
pub struct ToolResult {
    /// Whether the execution was successful
    pub success: bool,
    /// Output from the tool (if successful)
    pub output: Option<String>,
    /// Error message (if failed)
    pub error: Option<String>,
}

impl ToolResult {
    /// Create a successful result
    pub fn ok(output: impl Into<String>) -> Self {
        Self {
            success: true,
            output: Some(output.into()),
            error: None,
        }
    }

    /// Create an error result
    pub fn err(error: impl Into<String>) -> Self {
        Self {
            success: false,
            output: None,
            error: Some(error.into()),
        }
    }

    /// Render the result as text for model consumption. Failures become
    /// observable `Error: …` evidence rather than aborting the caller.
    pub fn to_content(&self) -> String {
        if self.success {
            self.output.clone().unwrap_or_default()
        } else {
            format!("Error: {}", self.error.as_deref().unwrap_or("Unknown error"))
        }
    }
}

/// Unified evidence tool interface.
///
/// Each tool provides identity (name, description, parameter schema) and
/// execution. Tools are registered in a `ToolRegistry` and dispatched
/// dynamically by name.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Unique name of this tool (e.g., "changed_files")
    fn name(&self) -> &str;

    /// Human-readable description of what this tool does
    fn description(&self) -> &str;

    /// JSON schema describing input parameters.
    ///
    /// Should conform to JSON Schema draft-07:
    /// ```json
    /// {
    ///   "type": "object",
    ///   "properties": {
    ///     "pattern": { "type": "string", "description": "Pattern to search for" }
    ///   },
    ///   "required": ["pattern"]
    /// }
    /// ```
    fn parameters_schema(&self) -> Value;

    /// Execute the tool with the given context and arguments.
    async fn execute(&self, ctx: &ToolContext, args: Value) -> ToolResult;
}

/// Registry of available evidence tools.
///
/// Provides O(1) lookup by name and ordered iteration for generating tool
/// definitions in a deterministic order.
pub struct ToolRegistry {
    tools: HashMap<String, Arc<dyn Tool>>,
    /// Insertion order for deterministic iteration
    order: Vec<String>,
}

impl ToolRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
            order: Vec::new(),
        }
    }

    /// Register a tool. Replaces any existing tool with the same name.
    pub fn register(&mut self, tool: Arc<dyn Tool>) {
        let name = tool.name().to_string();
        if !self.tools.contains_key(&name) {
            self.order.push(name.clone());
        }
        self.tools.insert(name, tool);
    }

    /// Look up a tool by name.
    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.get(name).cloned()
    }

    /// Get all registered tool names in registration order.
    pub fn names(&self) -> Vec<String> {
        self.order.clone()
    }

    /// Get all tools in registration order.
    pub fn tools(&self) -> Vec<Arc<dyn Tool>> {
        self.order
            .iter()
            .filter_map(|name| self.tools.get(name))
            .cloned()
            .collect()
    }

    /// Number of registered tools.
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Execute a tool by name.
    ///
    /// An unknown tool name is an error outcome like any other tool
    /// failure, so a hallucinated tool call degrades into evidence instead
    /// of crashing the answering stage.
    pub async fn execute(&self, name: &str, ctx: &ToolContext, args: Value) -> ToolResult {
        match self.tools.get(name) {
            Some(tool) => tool.execute(ctx, args).await,
            None => ToolResult::err(format!("Unknown tool: {}", name)),
        }
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}
