//! Mock tool for tests: fixed result, optional approval gate.

use async_trait::async_trait;
use serde_json::{json, Value};

use super::{Tool, ToolOutcome, ToolSourceError, ToolSpec};
use crate::graph::StepInput;

/// Mock tool: returns a fixed text. With [`with_approval`](Self::with_approval) it first
/// awaits a decision and returns the text only when the decision is `yes`.
///
/// **Interaction**: Implements `Tool`; used by `ToolNode` tests.
pub struct MockTool {
    name: String,
    result: String,
    approval_payload: Option<String>,
}

impl MockTool {
    pub fn new(name: impl Into<String>, result: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            result: result.into(),
            approval_payload: None,
        }
    }

    pub fn with_approval(mut self, payload: impl Into<String>) -> Self {
        self.approval_payload = Some(payload.into());
        self
    }
}

#[async_trait]
impl Tool for MockTool {
    fn spec(&self) -> ToolSpec {
        ToolSpec {
            name: self.name.clone(),
            description: Some(format!("Mock tool {}.", self.name)),
            input_schema: json!({ "type": "object", "properties": {} }),
        }
    }

    async fn call(
        &self,
        _arguments: Value,
        input: &mut StepInput,
    ) -> Result<ToolOutcome, ToolSourceError> {
        if let Some(payload) = &self.approval_payload {
            match input.await_decision(payload.clone()) {
                Ok(decision) if decision == "yes" => {}
                Ok(_) => return Ok(ToolOutcome::Output("declined".to_string())),
                Err(request) => return Ok(ToolOutcome::Interrupt(request)),
            }
        }
        Ok(ToolOutcome::Output(self.result.clone()))
    }
}
