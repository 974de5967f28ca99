//! Tool node: execute the tool calls of the last assistant message.
//!
//! # Error Handling
//!
//! By default tool errors fail the step. Use `with_handle_tool_errors`:
//!
//! - `HandleToolErrors::Never` - Errors propagate (default)
//! - `HandleToolErrors::Always` - Errors are returned to the LLM as tool messages
//!
//! # Interrupts
//!
//! Interrupts are atomic for the whole step: if any tool returns `ToolOutcome::Interrupt`,
//! results of the other calls are discarded and the step interrupts. On resume every call
//! runs again, so tools must be deterministic up to their `await_decision` call.

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, trace, warn};

use crate::error::AgentError;
use crate::graph::{Node, StepInput, StepOutcome};
use crate::message::{Message, ToolCall};
use crate::tool_source::{ToolOutcome, ToolRegistry, ToolSourceError};

/// Truncates a string for logging, appending "..." if longer than max_len.
fn truncate_for_log(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        format!("{}...", s.chars().take(max_len).collect::<String>())
    }
}

/// Message template for handled tool errors.
pub const DEFAULT_TOOL_ERROR_TEMPLATE: &str =
    "Error executing tool '{tool_name}' with kwargs {tool_kwargs} with error:\n {error}\n Please fix the error and try again.";

/// How `ToolNode` handles tool errors.
#[derive(Debug, Clone, Default)]
pub enum HandleToolErrors {
    /// Errors fail the step (default).
    #[default]
    Never,
    /// Errors become tool messages. Uses [`DEFAULT_TOOL_ERROR_TEMPLATE`] if None.
    Always(Option<String>),
}

/// Tool node: runs each tool call of the last assistant message and appends one tool
/// message per call, in request order.
///
/// **Interaction**: Implements `Node`; consumes a `ToolRegistry`. Usually reached through
/// `tools_condition`.
pub struct ToolNode {
    tools: ToolRegistry,
    handle_tool_errors: HandleToolErrors,
}

impl ToolNode {
    /// Creates a tool node. Tool errors propagate (HandleToolErrors::Never).
    pub fn new(tools: ToolRegistry) -> Self {
        Self {
            tools,
            handle_tool_errors: HandleToolErrors::Never,
        }
    }

    pub fn with_handle_tool_errors(mut self, handle_tool_errors: HandleToolErrors) -> Self {
        self.handle_tool_errors = handle_tool_errors;
        self
    }

    /// Some(message) when the error is handled, None when it should fail the step.
    fn handle_error(&self, error: &ToolSourceError, call: &ToolCall) -> Option<String> {
        match &self.handle_tool_errors {
            HandleToolErrors::Never => None,
            HandleToolErrors::Always(custom_msg) => Some(custom_msg.clone().unwrap_or_else(|| {
                DEFAULT_TOOL_ERROR_TEMPLATE
                    .replace("{tool_name}", &call.name)
                    .replace("{tool_kwargs}", &call.arguments.to_string())
                    .replace("{error}", &error.to_string())
            })),
        }
    }
}

fn into_agent_error(error: ToolSourceError) -> AgentError {
    match error {
        ToolSourceError::Execution(msg) => AgentError::UpstreamFailure(msg),
        other => AgentError::ExecutionFailed(other.to_string()),
    }
}

#[async_trait]
impl Node for ToolNode {
    fn id(&self) -> &str {
        super::TOOLS_NODE
    }

    async fn run(&self, mut input: StepInput) -> Result<StepOutcome, AgentError> {
        let calls: Vec<ToolCall> = match input.messages.iter().rev().find(|m| m.is_assistant()) {
            Some(message) if !message.tool_calls().is_empty() => message.tool_calls().to_vec(),
            _ => {
                return Err(AgentError::ExecutionFailed(
                    "no tool calls in the last assistant message".into(),
                ))
            }
        };

        let mut delta = Vec::with_capacity(calls.len());
        for call in &calls {
            let args = match &call.arguments {
                Value::Null => serde_json::json!({}),
                other => other.clone(),
            };
            debug!(tool = %call.name, args = ?args, "Calling tool");

            match self.tools.call(&call.name, args, &mut input).await {
                Ok(ToolOutcome::Output(text)) => {
                    trace!(
                        tool = %call.name,
                        result_len = text.len(),
                        result_preview = %truncate_for_log(&text, 200),
                        "Tool returned"
                    );
                    delta.push(Message::tool(call.id.clone(), call.name.clone(), text));
                }
                Ok(ToolOutcome::Interrupt(request)) => {
                    debug!(tool = %call.name, payload = %request.payload, "Tool requested interrupt");
                    return Ok(StepOutcome::Interrupt(request));
                }
                Err(e) => {
                    warn!(tool = %call.name, error = %e, "Tool call failed");
                    match self.handle_error(&e, call) {
                        Some(msg) => {
                            delta.push(Message::tool(call.id.clone(), call.name.clone(), msg))
                        }
                        None => return Err(into_agent_error(e)),
                    }
                }
            }
        }
        Ok(StepOutcome::Delta(delta))
    }
}
