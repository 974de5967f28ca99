//! # stepgraph
//!
//! A resumable, checkpointed step-execution engine with human-in-the-loop interrupts.
//!
//! A session (keyed by `thread_id`) is an append-only list of [`Message`]s. A compiled graph
//! runs steps one at a time; each step returns a delta to append or an interrupt request. The
//! session is checkpointed at every step boundary, so a paused session survives process
//! restarts and resumes exactly at the step that asked for a decision.
//!
//! ## Main Modules
//!
//! - [`graph`]: `StateGraph`, `CompiledStateGraph`, `Node`, `Next`: build and run graphs.
//! - [`memory`]: `Checkpointer`, `MemorySaver` and (feature `sqlite`) `SqliteSaver`.
//! - [`interrupt`]: `InterruptRequest`, `ResumeCommand`.
//! - [`llm`]: `LlmClient` trait and `MockLlm`.
//! - [`tool_source`]: `Tool`, `ToolRegistry`, `ToolSpec`.
//! - [`react`]: `ChatNode`, `ToolNode` and the `tools_condition` router.
//! - [`stream`]: events yielded by `CompiledStateGraph::stream`.
//!
//! ## Features
//!
//! - `sqlite` (default): persistent `SqliteSaver`.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use async_trait::async_trait;
//! use stepgraph::{AgentError, Message, Node, StateGraph, StepInput, StepOutcome, END, START};
//!
//! struct Echo;
//!
//! #[async_trait]
//! impl Node for Echo {
//!     fn id(&self) -> &str { "echo" }
//!     async fn run(&self, input: StepInput) -> Result<StepOutcome, AgentError> {
//!         let text = input.last_message().map(|m| m.content().to_string()).unwrap_or_default();
//!         Ok(StepOutcome::Delta(vec![Message::assistant(text)]))
//!     }
//! }
//!
//! # #[tokio::main]
//! # async fn main() {
//! let mut graph = StateGraph::new();
//! graph.add_node("echo", Arc::new(Echo));
//! graph.add_edge(START, "echo");
//! graph.add_edge("echo", END);
//! let compiled = graph.compile().unwrap();
//! let out = compiled.invoke("thread-1", vec![Message::user("hello")]).await.unwrap();
//! assert_eq!(out.last_assistant_content(), Some("hello"));
//! # }
//! ```

pub mod error;
pub mod graph;
pub mod interrupt;
pub mod llm;
pub mod memory;
pub mod message;
pub mod react;
pub mod stream;
pub mod tool_source;

pub use error::{AgentError, RunError};
pub use graph::{
    CompilationError, CompiledStateGraph, Next, Node, NodeMiddleware, RunOutcome, StateGraph,
    StepExecutor, StepInput, StepOutcome, DEFAULT_STEP_LIMIT, END, START,
};
pub use interrupt::{InterruptRequest, ResumeCommand};
pub use llm::{LlmClient, LlmResponse, MockLlm};
pub use memory::{
    Checkpoint, CheckpointError, CheckpointMetadata, CheckpointSource, Checkpointer,
    JsonSerializer, MemorySaver, Serializer, SessionStatus,
};
#[cfg(feature = "sqlite")]
pub use memory::SqliteSaver;
pub use message::{Message, ToolCall};
pub use react::{tools_condition, ChatNode, HandleToolErrors, ToolNode, CHAT_NODE, TOOLS_NODE};
pub use stream::StreamEvent;
pub use tool_source::{MockTool, Tool, ToolOutcome, ToolRegistry, ToolSourceError, ToolSpec};
