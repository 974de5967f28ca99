//! Per-call run context: thread id and optional stream sender.

use tokio::sync::mpsc;

use crate::stream::StreamEvent;

#[derive(Clone)]
pub(crate) struct RunContext {
    pub(crate) thread_id: String,
    /// Set by `stream` / `stream_resume`; `invoke` / `resume` run without one.
    pub(crate) stream_tx: Option<mpsc::Sender<StreamEvent>>,
}

impl RunContext {
    pub(crate) fn new(thread_id: &str) -> Self {
        Self {
            thread_id: thread_id.to_string(),
            stream_tx: None,
        }
    }

    pub(crate) fn with_stream(thread_id: &str, tx: mpsc::Sender<StreamEvent>) -> Self {
        Self {
            thread_id: thread_id.to_string(),
            stream_tx: Some(tx),
        }
    }

    /// Sends an event if streaming. A dropped receiver does not stop the run.
    pub(crate) async fn emit(&self, event: StreamEvent) {
        if let Some(tx) = &self.stream_tx {
            let _ = tx.send(event).await;
        }
    }
}
