//! State graph: steps plus routes (fixed edges or routing functions).
//!
//! Add steps with `add_node`, connect them with `add_edge(from, to)` or
//! `add_conditional_edges(from, router)` using `START` and `END` for entry/exit, then
//! `compile` or `compile_with_checkpointer` to get a `CompiledStateGraph`.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use crate::graph::compile_error::CompilationError;
use crate::graph::compiled::CompiledStateGraph;
use crate::graph::executor::StepExecutor;
use crate::graph::next::Next;
use crate::graph::node::Node;
use crate::graph::node_middleware::NodeMiddleware;
use crate::graph::route::{Route, Router};
use crate::graph::thread_guard::ThreadLocks;
use crate::memory::{Checkpointer, MemorySaver};
use crate::message::Message;

/// Sentinel for graph entry: use as `from_id` in `add_edge(START, first_node_id)`.
pub const START: &str = "__start__";

/// Sentinel for graph exit: use as `to_id` in `add_edge(last_node_id, END)`.
pub const END: &str = "__end__";

/// Steps executed per invoke / resume call before the run is stopped as runaway.
pub const DEFAULT_STEP_LIMIT: usize = 25;

/// State graph builder.
///
/// Every step needs exactly one outgoing route: a fixed edge or a routing function. Loops
/// are allowed (e.g. `tools → chatbot`); the step limit bounds them at run time.
///
/// **Interaction**: Accepts `Arc<dyn Node>`; produces `CompiledStateGraph`.
pub struct StateGraph {
    nodes: HashMap<String, Arc<dyn Node>>,
    /// Fixed edges (from_id, to_id).
    edges: Vec<(String, String)>,
    conditional: Vec<(String, Router)>,
    middleware: Option<Arc<dyn NodeMiddleware>>,
    step_limit: usize,
}

impl Default for StateGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl StateGraph {
    /// Creates an empty graph.
    pub fn new() -> Self {
        Self {
            nodes: HashMap::new(),
            edges: Vec::new(),
            conditional: Vec::new(),
            middleware: None,
            step_limit: DEFAULT_STEP_LIMIT,
        }
    }

    /// Wraps every step execution with `middleware`.
    pub fn with_middleware(self, middleware: Arc<dyn NodeMiddleware>) -> Self {
        Self {
            middleware: Some(middleware),
            ..self
        }
    }

    /// Maximum steps per invoke / resume call (default [`DEFAULT_STEP_LIMIT`]).
    pub fn with_step_limit(self, step_limit: usize) -> Self {
        Self { step_limit, ..self }
    }

    /// Adds a node; replaces any node with the same id.
    pub fn add_node(&mut self, id: impl Into<String>, node: Arc<dyn Node>) -> &mut Self {
        self.nodes.insert(id.into(), node);
        self
    }

    /// Adds a node under its own [`Node::id`].
    pub fn add_step(&mut self, node: Arc<dyn Node>) -> &mut Self {
        let id = node.id().to_string();
        self.add_node(id, node)
    }

    /// Adds a fixed edge from `from_id` to `to_id`.
    ///
    /// Use `START` for graph entry and `END` for graph exit. Both ids (except START/END)
    /// must be registered via `add_node` before `compile()`.
    pub fn add_edge(&mut self, from_id: impl Into<String>, to_id: impl Into<String>) -> &mut Self {
        self.edges.push((from_id.into(), to_id.into()));
        self
    }

    /// Routes out of `from_id` with a function of (state, last delta).
    ///
    /// The router runs after `from_id` produced its delta; the state it sees already
    /// includes that delta. A returned id that is not registered fails the run with
    /// `RunError::UnknownStep`.
    pub fn add_conditional_edges<F>(&mut self, from_id: impl Into<String>, router: F) -> &mut Self
    where
        F: Fn(&[Message], &[Message]) -> Next + Send + Sync + 'static,
    {
        self.conditional.push((from_id.into(), Arc::new(router)));
        self
    }

    /// Builds the executable graph with an in-memory checkpointer.
    pub fn compile(self) -> Result<CompiledStateGraph, CompilationError> {
        self.compile_with_checkpointer(Arc::new(MemorySaver::new()))
    }

    /// Builds the executable graph persisting sessions to `checkpointer`.
    ///
    /// Validates that exactly one edge leaves START, every edge endpoint is registered,
    /// and every node has exactly one outgoing route.
    pub fn compile_with_checkpointer(
        self,
        checkpointer: Arc<dyn Checkpointer>,
    ) -> Result<CompiledStateGraph, CompilationError> {
        let mut entry = None;
        let mut routes: HashMap<String, Route> = HashMap::new();

        for (from, to) in &self.edges {
            if from != START && !self.nodes.contains_key(from) {
                return Err(CompilationError::NodeNotFound(from.clone()));
            }
            if to != END && !self.nodes.contains_key(to) {
                return Err(CompilationError::NodeNotFound(to.clone()));
            }
            if from == START {
                if to == END || entry.replace(to.clone()).is_some() {
                    return Err(CompilationError::MissingStart);
                }
                continue;
            }
            if routes.insert(from.clone(), Route::Edge(to.clone())).is_some() {
                return Err(CompilationError::DuplicateRoute(from.clone()));
            }
        }

        for (from, router) in self.conditional {
            if !self.nodes.contains_key(&from) {
                return Err(CompilationError::NodeNotFound(from));
            }
            if routes.contains_key(&from) {
                return Err(CompilationError::DuplicateRoute(from));
            }
            routes.insert(from, Route::Conditional(router));
        }

        let entry = entry.ok_or(CompilationError::MissingStart)?;

        let ids: BTreeSet<&String> = self.nodes.keys().collect();
        if let Some(unrouted) = ids.into_iter().find(|id| !routes.contains_key(*id)) {
            return Err(CompilationError::MissingRoute(unrouted.clone()));
        }

        let executor = match self.middleware {
            Some(middleware) => StepExecutor::with_middleware(middleware),
            None => StepExecutor::new(),
        };

        Ok(CompiledStateGraph {
            nodes: self.nodes,
            entry,
            routes,
            checkpointer,
            executor,
            locks: ThreadLocks::default(),
            step_limit: self.step_limit,
        })
    }
}
