//! Structured Generation Driver
//!
//! Runs one structured-generation call against a provider: sends the
//! prompt, executes any requested evidence tool calls, feeds their results
//! back (failures included, rendered as error text), and finally parses
//! the model's answer into the requested output shape.
//!
//! Tool-use rounds are bounded. Once the bound is reached the next request
//! offers no tools, so the model must answer with whatever evidence it has
//! gathered rather than looping indefinitely.

use serde::de::DeserializeOwned;
use tokio_util::sync::CancellationToken;

use groundcheck_core::tool::{ToolContext, ToolRegistry};
use groundcheck_core::{CoreError, CoreResult};

use crate::provider::LlmProvider;
use crate::types::{Message, MessageContent, MessageRole, ToolDefinition, UsageStats};

/// Evidence tools offered to a structured call.
pub struct ToolAccess<'a> {
    pub registry: &'a ToolRegistry,
    pub context: &'a ToolContext,
}

/// One structured-generation request.
pub struct StructuredRequest<'a> {
    /// System prompt describing the task and the required output shape
    pub system_prompt: String,
    /// User message carrying the input payload
    pub user_message: String,
    /// Evidence tools to expose; `None` disables tool use entirely
    pub tools: Option<ToolAccess<'a>>,
    /// Maximum number of tool-invocation rounds before the model is forced
    /// to answer
    pub max_tool_rounds: u32,
    /// Cooperative cancellation, checked at the top of every round
    pub cancellation_token: CancellationToken,
    /// Emit per-tool progress lines on stderr
    pub show_progress: bool,
}

/// Build provider tool definitions from a registry, in registration order.
pub fn tool_definitions(registry: &ToolRegistry) -> Vec<ToolDefinition> {
    registry
        .tools()
        .iter()
        .map(|tool| ToolDefinition {
            name: tool.name().to_string(),
            description: tool.description().to_string(),
            input_schema: tool.parameters_schema(),
        })
        .collect()
}

/// Run a structured-generation call and parse the result into `T`.
///
/// Returns the parsed value together with the token usage accumulated
/// across every round of the call. Tool execution failures are absorbed as
/// error-text tool results; provider failures and unparseable final output
/// are fatal.
pub async fn run_structured<T: DeserializeOwned>(
    provider: &dyn LlmProvider,
    request: StructuredRequest<'_>,
) -> CoreResult<(T, UsageStats)> {
    let definitions = request
        .tools
        .as_ref()
        .map(|access| tool_definitions(access.registry))
        .unwrap_or_default();

    let mut messages = vec![Message::user(request.user_message)];
    let mut usage = UsageStats::default();
    let mut rounds = 0u32;

    loop {
        if request.cancellation_token.is_cancelled() {
            return Err(CoreError::Cancelled);
        }

        let offer_tools = !definitions.is_empty() && rounds < request.max_tool_rounds;
        let api_tools = if offer_tools {
            definitions.clone()
        } else {
            Vec::new()
        };

        let response = provider
            .send_message(messages.clone(), Some(request.system_prompt.clone()), api_tools)
            .await
            .map_err(|e| CoreError::generation(e.to_string()))?;

        usage.add(&response.usage);

        if offer_tools && response.has_tool_calls() {
            if let Some(access) = &request.tools {
                rounds += 1;

                // Record the assistant turn (text + tool_use blocks) before the
                // tool results, preserving the conversation shape providers expect.
                let mut content = Vec::new();
                if let Some(text) = &response.content {
                    content.push(MessageContent::Text { text: text.clone() });
                }
                for call in &response.tool_calls {
                    content.push(MessageContent::ToolUse {
                        id: call.id.clone(),
                        name: call.name.clone(),
                        input: call.arguments.clone(),
                    });
                }
                messages.push(Message {
                    role: MessageRole::Assistant,
                    content,
                });

                for call in &response.tool_calls {
                    if request.show_progress {
                        eprintln!("[groundcheck] tool {}", call.name);
                    }
                    let result = access
                        .registry
                        .execute(&call.name, access.context, call.arguments.clone())
                        .await;
                    if !result.success {
                        tracing::debug!(
                            tool = %call.name,
                            error = result.error.as_deref().unwrap_or(""),
                            "evidence tool failed; returning error text to the model"
                        );
                    }
                    messages.push(Message::tool_result(
                        &call.id,
                        result.to_content(),
                        !result.success,
                    ));
                }
                continue;
            }
        }

        // Final turn: with no tools offered the model has to answer, so any
        // stray tool calls are ignored and only the text matters.
        let content = response.content.as_deref().unwrap_or("").trim();
        if content.is_empty() {
            return Err(CoreError::schema(
                "model returned no content for a structured call",
            ));
        }
        let value = extract_json::<T>(content)?;
        return Ok((value, usage));
    }
}

/// Extract a JSON value of type `T` from model output text.
///
/// Tries a direct parse first, then the outermost `{…}` window, which
/// tolerates prose and markdown fences around the payload.
pub fn extract_json<T: DeserializeOwned>(text: &str) -> CoreResult<T> {
    let trimmed = text.trim();
    match serde_json::from_str::<T>(trimmed) {
        Ok(value) => Ok(value),
        Err(direct_err) => {
            if let (Some(start), Some(end)) = (trimmed.find('{'), trimmed.rfind('}')) {
                if start < end {
                    if let Ok(value) = serde_json::from_str::<T>(&trimmed[start..=end]) {
                        return Ok(value);
                    }
                }
            }
            Err(CoreError::schema(format!(
                "structured output did not match the expected shape: {}",
                direct_err
            )))
        }
    }
}
