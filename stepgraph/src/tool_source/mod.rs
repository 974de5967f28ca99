//! Tool registry: tool specs, execution and errors.
//!
//! A [`Tool`] is a named callable the LLM can request through a `ToolCall`. Tools run inside
//! the tool step and receive that step's [`StepInput`], so a tool that needs human approval
//! can call `StepInput::await_decision` and hand back [`ToolOutcome::Interrupt`].

mod mock;

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::graph::StepInput;
use crate::interrupt::InterruptRequest;

pub use mock::MockTool;

/// Tool description exposed to the LLM: name, description, JSON schema of the arguments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolSpec {
    pub name: String,
    pub description: Option<String>,
    pub input_schema: Value,
}

/// Result of one tool call.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolOutcome {
    /// Text recorded as the tool message content.
    Output(String),
    /// The tool is waiting for a decision; the whole tool step interrupts.
    Interrupt(InterruptRequest),
}

/// Error from looking up or running a tool.
#[derive(Debug, thiserror::Error)]
pub enum ToolSourceError {
    #[error("tool not found: {0}")]
    NotFound(String),
    /// Arguments did not match the tool's schema.
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// The tool's backend failed.
    #[error("execution: {0}")]
    Execution(String),
}

/// A callable tool.
///
/// **Interaction**: Registered in a [`ToolRegistry`]; called by `ToolNode` once per matching
/// tool call, in request order.
#[async_trait]
pub trait Tool: Send + Sync {
    fn spec(&self) -> ToolSpec;

    async fn call(
        &self,
        arguments: Value,
        input: &mut StepInput,
    ) -> Result<ToolOutcome, ToolSourceError>;
}

/// Name → tool lookup.
#[derive(Clone, Default)]
pub struct ToolRegistry {
    tools: HashMap<String, Arc<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `tool` under its spec name; replaces a tool with the same name.
    pub fn register(&mut self, tool: Arc<dyn Tool>) -> &mut Self {
        self.tools.insert(tool.spec().name, tool);
        self
    }

    /// Builder-style [`register`](Self::register).
    pub fn with(mut self, tool: Arc<dyn Tool>) -> Self {
        self.register(tool);
        self
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn Tool>> {
        self.tools.get(name)
    }

    /// Specs of all registered tools, sorted by name.
    pub fn specs(&self) -> Vec<ToolSpec> {
        let mut specs: Vec<ToolSpec> = self.tools.values().map(|t| t.spec()).collect();
        specs.sort_by(|a, b| a.name.cmp(&b.name));
        specs
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Calls the named tool.
    pub async fn call(
        &self,
        name: &str,
        arguments: Value,
        input: &mut StepInput,
    ) -> Result<ToolOutcome, ToolSourceError> {
        let tool = self
            .get(name)
            .ok_or_else(|| ToolSourceError::NotFound(name.to_string()))?;
        tool.call(arguments, input).await
    }
}
