//! LLM Provider Trait
//!
//! Defines the common interface every model provider must implement. The
//! verification pipeline only depends on this trait; concrete network
//! providers are supplied by the embedding application, and the test suite
//! supplies scripted doubles.

use async_trait::async_trait;

use crate::types::{LlmResponse, LlmResult, Message, ToolDefinition};

/// Trait that all LLM providers must implement.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Returns the provider name for identification.
    fn name(&self) -> &'static str;

    /// Returns the current model being used.
    fn model(&self) -> &str;

    /// Send a message and get a complete response.
    ///
    /// # Arguments
    /// * `messages` - Conversation history
    /// * `system` - Optional system prompt
    /// * `tools` - Tools the model may call; empty means tool use is not
    ///   offered for this request
    async fn send_message(
        &self,
        messages: Vec<Message>,
        system: Option<String>,
        tools: Vec<ToolDefinition>,
    ) -> LlmResult<LlmResponse>;
}
