//! Outgoing route of a step: a fixed edge or a routing function.

use std::sync::Arc;

use crate::message::Message;

use super::next::Next;
use super::state_graph::END;

/// Routing function: `(state after the step, delta the step produced) -> Next`.
pub type Router = Arc<dyn Fn(&[Message], &[Message]) -> Next + Send + Sync>;

#[derive(Clone)]
pub(crate) enum Route {
    /// Fixed successor; `END` finishes the run.
    Edge(String),
    Conditional(Router),
}

impl Route {
    pub(crate) fn resolve(&self, state: &[Message], delta: &[Message]) -> Next {
        match self {
            Route::Edge(to) if to == END => Next::End,
            Route::Edge(to) => Next::Node(to.clone()),
            Route::Conditional(router) => router(state, delta),
        }
    }
}
