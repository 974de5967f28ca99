//! Compiled state graph: the run controller.
//!
//! Built by `StateGraph::compile` or `compile_with_checkpointer`. Owns the step table, the
//! routes and the checkpointer. Each call loads the thread's checkpoint, runs steps one at a
//! time and saves a checkpoint at every step boundary, so a crash or restart loses at most the
//! step that was executing.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;

use crate::error::RunError;
use crate::interrupt::{InterruptRequest, ResumeCommand};
use crate::memory::{Checkpoint, CheckpointSource, Checkpointer, SessionStatus};
use crate::message::Message;
use crate::stream::StreamEvent;

use super::executor::StepExecutor;
use super::logging::{log_run_complete, log_run_error, log_run_interrupt, log_run_start};
use super::next::Next;
use super::node::{Node, StepInput, StepOutcome};
use super::outcome::RunOutcome;
use super::route::Route;
use super::run_context::RunContext;
use super::thread_guard::ThreadLocks;

/// Compiled graph: immutable structure, runs sessions keyed by `thread_id`.
///
/// Cloning is cheap and clones share the checkpointer and the per-thread guard, so a clone
/// moved into a spawned task still sees `RunError::Busy` for a thread another clone is running.
#[derive(Clone)]
pub struct CompiledStateGraph {
    pub(super) nodes: HashMap<String, Arc<dyn Node>>,
    pub(super) entry: String,
    pub(super) routes: HashMap<String, Route>,
    pub(super) checkpointer: Arc<dyn Checkpointer>,
    pub(super) executor: StepExecutor,
    pub(super) locks: ThreadLocks,
    pub(super) step_limit: usize,
}

impl CompiledStateGraph {
    /// Appends `input` to the thread's session and runs it.
    ///
    /// - no checkpoint: starts a new session at the entry step;
    /// - Completed / Cancelled: starts a new cycle at the entry step with history kept;
    /// - Failed / Running: replays from the step that did not finish;
    /// - Interrupted: `RunError::InterruptPending`, nothing changes.
    ///
    /// The input is checkpointed before any step runs.
    pub async fn invoke(
        &self,
        thread_id: &str,
        input: Vec<Message>,
    ) -> Result<RunOutcome, RunError> {
        let ctx = RunContext::new(thread_id);
        self.invoke_with_context(input, &ctx).await
    }

    /// Supplies a decision to the interrupted step and continues the run.
    ///
    /// Fails with `NoPendingInterrupt` unless the thread is Interrupted, and with
    /// `ThreadMismatch` when the command is addressed to another thread.
    pub async fn resume(
        &self,
        thread_id: &str,
        command: ResumeCommand,
    ) -> Result<RunOutcome, RunError> {
        let ctx = RunContext::new(thread_id);
        self.resume_with_context(command, &ctx).await
    }

    /// Abandons a pending interrupt without running any step. Returns the Cancelled checkpoint.
    pub async fn cancel(&self, thread_id: &str) -> Result<Checkpoint, RunError> {
        let _guard = self.locks.try_acquire(thread_id)?;
        log_run_start(thread_id, "cancel");
        let mut checkpoint = match self.load_existing(thread_id).await? {
            Some(cp) if cp.status == SessionStatus::Interrupted => cp,
            _ => return Err(RunError::NoPendingInterrupt(thread_id.to_string())),
        };
        checkpoint.mark_cancelled();
        self.checkpointer.save(thread_id, &checkpoint).await?;
        Ok(checkpoint)
    }

    /// Latest checkpoint of the thread, or `None` for a fresh thread.
    pub async fn get_state(&self, thread_id: &str) -> Result<Option<Checkpoint>, RunError> {
        self.load_existing(thread_id).await
    }

    /// Deletes the thread's checkpoint. Returns whether one existed.
    pub async fn purge(&self, thread_id: &str) -> Result<bool, RunError> {
        let _guard = self.locks.try_acquire(thread_id)?;
        Ok(self.checkpointer.purge(thread_id).await?)
    }

    pub async fn list_threads(&self) -> Result<Vec<String>, RunError> {
        Ok(self.checkpointer.list_threads().await?)
    }

    /// Like `invoke`, on a spawned task, yielding an event per step boundary.
    ///
    /// Ends with `StreamEvent::Done` or `StreamEvent::Error`.
    pub fn stream(&self, thread_id: impl Into<String>, input: Vec<Message>) -> ReceiverStream<StreamEvent> {
        let (tx, rx) = mpsc::channel(128);
        let graph = self.clone();
        let thread_id = thread_id.into();

        tokio::spawn(async move {
            let ctx = RunContext::with_stream(&thread_id, tx.clone());
            let result = graph.invoke_with_context(input, &ctx).await;
            let _ = tx.send(StreamEvent::finished(result)).await;
        });

        ReceiverStream::new(rx)
    }

    /// Like `resume`, streamed the same way as [`stream`](Self::stream).
    pub fn stream_resume(
        &self,
        thread_id: impl Into<String>,
        command: ResumeCommand,
    ) -> ReceiverStream<StreamEvent> {
        let (tx, rx) = mpsc::channel(128);
        let graph = self.clone();
        let thread_id = thread_id.into();

        tokio::spawn(async move {
            let ctx = RunContext::with_stream(&thread_id, tx.clone());
            let result = graph.resume_with_context(command, &ctx).await;
            let _ = tx.send(StreamEvent::finished(result)).await;
        });

        ReceiverStream::new(rx)
    }

    async fn invoke_with_context(
        &self,
        input: Vec<Message>,
        ctx: &RunContext,
    ) -> Result<RunOutcome, RunError> {
        let thread_id = ctx.thread_id.as_str();
        let _guard = self.locks.try_acquire(thread_id)?;
        log_run_start(thread_id, "invoke");

        let (mut checkpoint, start) = match self.load_existing(thread_id).await? {
            None => (Checkpoint::new(thread_id, input), self.entry.clone()),
            Some(mut cp) => match cp.status {
                SessionStatus::Interrupted => {
                    return Err(RunError::InterruptPending {
                        thread_id: thread_id.to_string(),
                        payload: cp.interrupt_payload().unwrap_or_default().to_string(),
                    });
                }
                SessionStatus::Completed | SessionStatus::Cancelled => {
                    cp.messages.extend(input);
                    (cp, self.entry.clone())
                }
                SessionStatus::Failed | SessionStatus::Running => {
                    let start = cp
                        .pending_step_id
                        .clone()
                        .unwrap_or_else(|| self.entry.clone());
                    cp.messages.extend(input);
                    (cp, start)
                }
            },
        };

        checkpoint.mark_input(&start);
        self.checkpointer.save(thread_id, &checkpoint).await?;

        let result = self.run_from(&mut checkpoint, start, ctx).await;
        if let Err(e) = &result {
            log_run_error(thread_id, e);
        }
        result
    }

    async fn resume_with_context(
        &self,
        command: ResumeCommand,
        ctx: &RunContext,
    ) -> Result<RunOutcome, RunError> {
        let thread_id = ctx.thread_id.as_str();
        if let Some(target) = &command.thread_id {
            if target != thread_id {
                return Err(RunError::ThreadMismatch {
                    expected: thread_id.to_string(),
                    got: target.clone(),
                });
            }
        }
        let _guard = self.locks.try_acquire(thread_id)?;
        log_run_start(thread_id, "resume");

        let mut checkpoint = match self.load_existing(thread_id).await? {
            Some(cp) if cp.status == SessionStatus::Interrupted => cp,
            _ => return Err(RunError::NoPendingInterrupt(thread_id.to_string())),
        };
        let step = checkpoint
            .pending_step_id
            .clone()
            .ok_or_else(|| RunError::NoPendingInterrupt(thread_id.to_string()))?;
        checkpoint.resume_values.push(command.decision);

        let result = self.run_from(&mut checkpoint, step, ctx).await;
        if let Err(e) = &result {
            log_run_error(thread_id, e);
        }
        result
    }

    /// The routing loop. Every exit path saves the checkpoint with its final status first.
    async fn run_from(
        &self,
        checkpoint: &mut Checkpoint,
        start: String,
        ctx: &RunContext,
    ) -> Result<RunOutcome, RunError> {
        let thread_id = ctx.thread_id.as_str();
        let mut current = start;
        let mut steps = 0;

        loop {
            if steps >= self.step_limit {
                let err = RunError::StepLimitExceeded(self.step_limit);
                checkpoint.mark_failed(&current, err.to_string());
                self.checkpointer.save(thread_id, checkpoint).await?;
                return Err(err);
            }
            steps += 1;

            let node = match self.nodes.get(&current) {
                Some(node) => node.clone(),
                None => {
                    let err = RunError::UnknownStep(current.clone());
                    checkpoint.mark_failed(&current, err.to_string());
                    self.checkpointer.save(thread_id, checkpoint).await?;
                    return Err(err);
                }
            };

            let input = StepInput::new(current.clone(), checkpoint.messages.clone())
                .with_decisions(checkpoint.resume_values.clone());

            let delta = match self.executor.run(node, input).await {
                Err(source) => {
                    checkpoint.mark_failed(&current, source.to_string());
                    self.checkpointer.save(thread_id, checkpoint).await?;
                    return Err(RunError::Step {
                        step_id: current,
                        source,
                    });
                }
                Ok(StepOutcome::Interrupt(request)) => {
                    let request = InterruptRequest::new(current.clone(), request.payload);
                    let supplied = std::mem::take(&mut checkpoint.resume_values);
                    checkpoint.mark_interrupted(request.clone(), supplied);
                    self.checkpointer.save(thread_id, checkpoint).await?;
                    log_run_interrupt(thread_id, &current);
                    ctx.emit(StreamEvent::Interrupt(request.clone())).await;
                    return Ok(RunOutcome::Interrupted {
                        interrupt: request,
                        messages: checkpoint.messages.clone(),
                    });
                }
                Ok(StepOutcome::Delta(delta)) => delta,
            };

            checkpoint.messages.extend(delta.iter().cloned());
            let next = match self.routes.get(&current) {
                Some(route) => route.resolve(&checkpoint.messages, &delta),
                None => Next::End,
            };

            match next {
                Next::End => {
                    checkpoint.mark_completed();
                    self.checkpointer.save(thread_id, checkpoint).await?;
                    ctx.emit(StreamEvent::Updates {
                        step_id: current,
                        delta,
                    })
                    .await;
                    log_run_complete(thread_id, checkpoint.messages.len());
                    return Ok(RunOutcome::Completed {
                        messages: checkpoint.messages.clone(),
                    });
                }
                Next::Node(next_id) => {
                    checkpoint.mark_running(&next_id, CheckpointSource::Loop);
                    self.checkpointer.save(thread_id, checkpoint).await?;
                    ctx.emit(StreamEvent::Updates {
                        step_id: current,
                        delta,
                    })
                    .await;
                    current = next_id;
                }
            }
        }
    }

    async fn load_existing(&self, thread_id: &str) -> Result<Option<Checkpoint>, RunError> {
        match self.checkpointer.load(thread_id).await {
            Ok(cp) => Ok(Some(cp)),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use tokio_stream::StreamExt;

    use super::*;
    use crate::error::AgentError;
    use crate::graph::{StateGraph, END, START};
    use crate::memory::MemorySaver;

    /// Appends one assistant message with a fixed text.
    struct Say(&'static str);

    #[async_trait]
    impl Node for Say {
        fn id(&self) -> &str {
            self.0
        }

        async fn run(&self, _input: StepInput) -> Result<StepOutcome, AgentError> {
            Ok(StepOutcome::Delta(vec![Message::assistant(self.0)]))
        }
    }

    /// Asks for approval, then reports the decision.
    struct Approve;

    #[async_trait]
    impl Node for Approve {
        fn id(&self) -> &str {
            "approve"
        }

        async fn run(&self, mut input: StepInput) -> Result<StepOutcome, AgentError> {
            let decision = match input.await_decision("Approve?") {
                Ok(d) => d,
                Err(request) => return Ok(StepOutcome::Interrupt(request)),
            };
            Ok(StepOutcome::Delta(vec![Message::assistant(format!(
                "decision: {}",
                decision
            ))]))
        }
    }

    /// Fails the first `failures` runs, then succeeds.
    struct Flaky {
        failures: usize,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl Node for Flaky {
        fn id(&self) -> &str {
            "flaky"
        }

        async fn run(&self, _input: StepInput) -> Result<StepOutcome, AgentError> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst);
            if n < self.failures {
                return Err(AgentError::UpstreamFailure("timeout".into()));
            }
            Ok(StepOutcome::Delta(vec![Message::assistant("recovered")]))
        }
    }

    fn approval_graph() -> CompiledStateGraph {
        let mut g = StateGraph::new();
        g.add_node("first", Arc::new(Say("first")));
        g.add_node("approve", Arc::new(Approve));
        g.add_edge(START, "first");
        g.add_edge("first", "approve");
        g.add_edge("approve", END);
        g.compile().expect("graph compiles")
    }

    /// **Scenario**: A linear graph appends each step's delta in order and completes.
    #[tokio::test]
    async fn invoke_linear_graph_completes() {
        let mut g = StateGraph::new();
        g.add_node("a", Arc::new(Say("a")));
        g.add_node("b", Arc::new(Say("b")));
        g.add_edge(START, "a");
        g.add_edge("a", "b");
        g.add_edge("b", END);
        let graph = g.compile().unwrap();

        let out = graph.invoke("t1", vec![Message::user("go")]).await.unwrap();
        assert_eq!(
            out,
            RunOutcome::Completed {
                messages: vec![
                    Message::user("go"),
                    Message::assistant("a"),
                    Message::assistant("b")
                ]
            }
        );
        let cp = graph.get_state("t1").await.unwrap().unwrap();
        assert_eq!(cp.status, SessionStatus::Completed);
        assert!(cp.pending_step_id.is_none());
    }

    /// **Scenario**: An interrupting step pauses the run; resume re-enters it with the decision.
    #[tokio::test]
    async fn interrupt_then_resume_continues_from_pending_step() {
        let graph = approval_graph();
        let out = graph.invoke("t1", vec![Message::user("go")]).await.unwrap();
        assert_eq!(
            out.interrupt(),
            Some(&InterruptRequest::new("approve", "Approve?"))
        );
        let cp = graph.get_state("t1").await.unwrap().unwrap();
        assert_eq!(cp.status, SessionStatus::Interrupted);
        assert_eq!(cp.pending_step_id.as_deref(), Some("approve"));
        assert_eq!(cp.messages.len(), 2);

        let out = graph.resume("t1", ResumeCommand::new("yes")).await.unwrap();
        assert_eq!(out.last_assistant_content(), Some("decision: yes"));
        // "first" did not run again.
        assert_eq!(out.messages().len(), 3);
    }

    /// **Scenario**: invoke on an interrupted thread is rejected without changing state.
    #[tokio::test]
    async fn invoke_while_interrupted_is_rejected() {
        let graph = approval_graph();
        graph.invoke("t1", vec![Message::user("go")]).await.unwrap();
        let before = graph.get_state("t1").await.unwrap().unwrap();
        let err = graph
            .invoke("t1", vec![Message::user("again")])
            .await
            .unwrap_err();
        assert!(
            matches!(&err, RunError::InterruptPending { payload, .. } if payload == "Approve?"),
            "{:?}",
            err
        );
        assert_eq!(graph.get_state("t1").await.unwrap().unwrap(), before);
    }

    /// **Scenario**: resume on a fresh or completed thread fails with NoPendingInterrupt.
    #[tokio::test]
    async fn resume_without_interrupt_is_rejected() {
        let graph = approval_graph();
        let err = graph.resume("fresh", ResumeCommand::new("yes")).await.unwrap_err();
        assert!(matches!(err, RunError::NoPendingInterrupt(_)), "{:?}", err);
        assert!(graph.get_state("fresh").await.unwrap().is_none());

        graph.invoke("t1", vec![Message::user("go")]).await.unwrap();
        graph.resume("t1", ResumeCommand::new("no")).await.unwrap();
        let err = graph.resume("t1", ResumeCommand::new("yes")).await.unwrap_err();
        assert!(matches!(err, RunError::NoPendingInterrupt(_)), "{:?}", err);
    }

    /// **Scenario**: A command addressed to another thread is rejected and state is untouched.
    #[tokio::test]
    async fn resume_thread_mismatch() {
        let graph = approval_graph();
        graph.invoke("t1", vec![Message::user("go")]).await.unwrap();
        let err = graph
            .resume("t1", ResumeCommand::new("yes").for_thread("t2"))
            .await
            .unwrap_err();
        assert!(
            matches!(&err, RunError::ThreadMismatch { expected, got } if expected == "t1" && got == "t2"),
            "{:?}",
            err
        );
        let cp = graph.get_state("t1").await.unwrap().unwrap();
        assert_eq!(cp.status, SessionStatus::Interrupted);
    }

    /// **Scenario**: cancel moves Interrupted to Cancelled; a later invoke starts a new cycle.
    #[tokio::test]
    async fn cancel_then_invoke_starts_new_cycle() {
        let graph = approval_graph();
        graph.invoke("t1", vec![Message::user("go")]).await.unwrap();
        let cp = graph.cancel("t1").await.unwrap();
        assert_eq!(cp.status, SessionStatus::Cancelled);
        assert!(cp.interrupt.is_none());

        let err = graph.cancel("t1").await.unwrap_err();
        assert!(matches!(err, RunError::NoPendingInterrupt(_)), "{:?}", err);

        let out = graph.invoke("t1", vec![Message::user("again")]).await.unwrap();
        assert!(out.is_interrupted());
        // go, first, again, first
        assert_eq!(out.messages().len(), 4);
    }

    /// **Scenario**: A failing step persists Failed; re-invoke replays from that step.
    #[tokio::test]
    async fn failed_step_is_replayed_on_next_invoke() {
        let mut g = StateGraph::new();
        g.add_node("a", Arc::new(Say("a")));
        g.add_node(
            "flaky",
            Arc::new(Flaky {
                failures: 1,
                calls: AtomicUsize::new(0),
            }),
        );
        g.add_edge(START, "a");
        g.add_edge("a", "flaky");
        g.add_edge("flaky", END);
        let graph = g.compile().unwrap();

        let err = graph.invoke("t1", vec![Message::user("go")]).await.unwrap_err();
        assert!(err.is_upstream_failure(), "{:?}", err);
        let cp = graph.get_state("t1").await.unwrap().unwrap();
        assert_eq!(cp.status, SessionStatus::Failed);
        assert_eq!(cp.pending_step_id.as_deref(), Some("flaky"));
        assert!(cp.last_error.as_deref().unwrap_or("").contains("timeout"));

        let out = graph.invoke("t1", vec![]).await.unwrap();
        assert_eq!(
            out.messages(),
            &[
                Message::user("go"),
                Message::assistant("a"),
                Message::assistant("recovered")
            ]
        );
    }

    /// **Scenario**: A routing loop longer than the step limit fails and is persisted as Failed.
    #[tokio::test]
    async fn step_limit_exceeded() {
        let mut g = StateGraph::new().with_step_limit(3);
        g.add_node("spin", Arc::new(Say("spin")));
        g.add_edge(START, "spin");
        g.add_edge("spin", "spin");
        let graph = g.compile().unwrap();

        let err = graph.invoke("t1", vec![]).await.unwrap_err();
        assert!(matches!(err, RunError::StepLimitExceeded(3)), "{:?}", err);
        let cp = graph.get_state("t1").await.unwrap().unwrap();
        assert_eq!(cp.status, SessionStatus::Failed);
        assert_eq!(cp.messages.len(), 3);
    }

    /// **Scenario**: A router that names an unregistered step fails with UnknownStep.
    #[tokio::test]
    async fn router_to_unknown_step_fails() {
        let mut g = StateGraph::new();
        g.add_node("a", Arc::new(Say("a")));
        g.add_edge(START, "a");
        g.add_conditional_edges("a", |_, _| Next::node("ghost"));
        let graph = g.compile().unwrap();

        let err = graph.invoke("t1", vec![]).await.unwrap_err();
        assert!(matches!(&err, RunError::UnknownStep(id) if id == "ghost"), "{:?}", err);
    }

    /// **Scenario**: A second call on a thread that is executing fails fast with Busy.
    #[tokio::test]
    async fn concurrent_call_on_same_thread_is_busy() {
        let graph = approval_graph();
        let _held = graph.locks.try_acquire("t1").unwrap();
        let err = graph.invoke("t1", vec![Message::user("go")]).await.unwrap_err();
        assert!(matches!(&err, RunError::Busy(t) if t == "t1"), "{:?}", err);
        assert!(graph.invoke("t2", vec![Message::user("go")]).await.is_ok());
    }

    /// **Scenario**: Per-thread guards do not accumulate: rejected calls on unknown threads,
    /// completed runs and purges leave no entries behind.
    #[tokio::test]
    async fn thread_guards_are_released_after_calls() {
        let graph = approval_graph();
        for i in 0..1000 {
            let err = graph
                .resume(&format!("ghost-{}", i), ResumeCommand::new("yes"))
                .await
                .unwrap_err();
            assert!(matches!(err, RunError::NoPendingInterrupt(_)), "{:?}", err);
        }
        graph.invoke("real", vec![Message::user("go")]).await.unwrap();
        graph.cancel("real").await.unwrap();
        assert!(graph.purge("real").await.unwrap());
        assert_eq!(graph.locks.len(), 0);
    }

    /// **Scenario**: stream yields one Updates per completed step, then Interrupt and Done.
    #[tokio::test]
    async fn stream_emits_updates_interrupt_and_done() {
        let graph = approval_graph();
        let events: Vec<_> = graph
            .stream("t1", vec![Message::user("go")])
            .collect()
            .await;
        assert_eq!(events.len(), 3, "{:?}", events);
        assert!(
            matches!(&events[0], StreamEvent::Updates { step_id, delta } if step_id == "first" && delta.len() == 1)
        );
        assert!(matches!(&events[1], StreamEvent::Interrupt(r) if r.step_id == "approve"));
        assert!(matches!(&events[2], StreamEvent::Done(o) if o.is_interrupted()));

        let events: Vec<_> = graph
            .stream_resume("t1", ResumeCommand::new("yes"))
            .collect()
            .await;
        assert!(matches!(events.last(), Some(StreamEvent::Done(RunOutcome::Completed { .. }))));
    }

    /// **Scenario**: A failing streamed call ends with an Error event.
    #[tokio::test]
    async fn stream_resume_error_event() {
        let graph = approval_graph();
        let events: Vec<_> = graph
            .stream_resume("nobody", ResumeCommand::new("yes"))
            .collect()
            .await;
        assert_eq!(events.len(), 1);
        assert!(matches!(&events[0], StreamEvent::Error(msg) if msg.contains("no pending interrupt")));
    }

    /// **Scenario**: purge removes the session; list_threads reflects stored threads.
    #[tokio::test]
    async fn purge_and_list_threads() {
        let saver = Arc::new(MemorySaver::new());
        let mut g = StateGraph::new();
        g.add_node("a", Arc::new(Say("a")));
        g.add_edge(START, "a");
        g.add_edge("a", END);
        let graph = g.compile_with_checkpointer(saver.clone()).unwrap();

        graph.invoke("b", vec![]).await.unwrap();
        graph.invoke("a", vec![]).await.unwrap();
        assert_eq!(graph.list_threads().await.unwrap(), vec!["a", "b"]);
        assert!(graph.purge("a").await.unwrap());
        assert!(graph.get_state("a").await.unwrap().is_none());
        assert_eq!(saver.list_threads().await.unwrap(), vec!["b"]);
    }
}
