//! State graph: steps, routes, compile and run.
//!
//! Build a [`StateGraph`] with nodes, fixed edges and routing functions, compile it, then run
//! sessions with [`CompiledStateGraph::invoke`] / [`CompiledStateGraph::resume`].

mod compile_error;
mod compiled;
mod executor;
mod logging;
mod next;
mod node;
mod node_middleware;
mod outcome;
mod route;
mod run_context;
mod state_graph;
mod thread_guard;

pub use compile_error::CompilationError;
pub use compiled::CompiledStateGraph;
pub use executor::StepExecutor;
pub use next::Next;
pub use node::{Node, StepInput, StepOutcome};
pub use node_middleware::{NodeMiddleware, StepFn, StepFuture};
pub use outcome::RunOutcome;
pub use route::Router;
pub use state_graph::{StateGraph, DEFAULT_STEP_LIMIT, END, START};
