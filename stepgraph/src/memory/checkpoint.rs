//! Checkpoint, session status and metadata types.
//!
//! A checkpoint is the durable snapshot of one session at a step boundary. It is keyed by
//! `thread_id` and replaced wholesale on every save.

use std::time::SystemTime;

use serde::{Deserialize, Serialize};

use crate::interrupt::InterruptRequest;
use crate::message::Message;

/// Lifecycle status of a session. A thread with no checkpoint is fresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    /// Steps are executing, or a run stopped without reaching a boundary status.
    Running,
    /// Paused at `pending_step_id`, waiting for a decision.
    Interrupted,
    /// The step sequence reached END.
    Completed,
    /// A step failed; `last_error` says why. Re-invoke replays from `pending_step_id`.
    Failed,
    /// A pending interrupt was abandoned via `cancel`.
    Cancelled,
}

impl SessionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionStatus::Running => "running",
            SessionStatus::Interrupted => "interrupted",
            SessionStatus::Completed => "completed",
            SessionStatus::Failed => "failed",
            SessionStatus::Cancelled => "cancelled",
        }
    }
}

/// Why a checkpoint was written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckpointSource {
    /// New input appended by `invoke`.
    Input,
    /// Step boundary inside the run loop.
    Loop,
    /// Status changed from outside the run loop (e.g. cancel).
    Update,
}

/// Metadata for a single checkpoint (source, step, created_at).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckpointMetadata {
    pub source: CheckpointSource,
    /// Number of checkpoints written for this thread so far.
    pub step: u64,
    pub created_at: Option<SystemTime>,
}

/// Durable snapshot of a session.
///
/// **Interaction**: Built and updated by `CompiledStateGraph`; persisted by
/// `Checkpointer::save`, returned by `Checkpointer::load`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Checkpoint {
    pub id: String,
    pub ts: String,
    pub thread_id: String,
    /// Session history. Append-only.
    pub messages: Vec<Message>,
    pub status: SessionStatus,
    /// Next step to run (Running / Failed) or the interrupted step (Interrupted).
    pub pending_step_id: Option<String>,
    /// Set while Interrupted.
    pub interrupt: Option<InterruptRequest>,
    /// Decisions already supplied to the pending step.
    #[serde(default)]
    pub resume_values: Vec<String>,
    pub last_error: Option<String>,
    pub metadata: CheckpointMetadata,
}

impl Checkpoint {
    /// Creates the first checkpoint of a session.
    pub fn new(thread_id: impl Into<String>, messages: Vec<Message>) -> Self {
        let (id, ts, now) = stamp(0);
        Self {
            id,
            ts,
            thread_id: thread_id.into(),
            messages,
            status: SessionStatus::Running,
            pending_step_id: None,
            interrupt: None,
            resume_values: Vec::new(),
            last_error: None,
            metadata: CheckpointMetadata {
                source: CheckpointSource::Input,
                step: 0,
                created_at: Some(now),
            },
        }
    }

    /// Payload shown to the decider while Interrupted.
    pub fn interrupt_payload(&self) -> Option<&str> {
        self.interrupt.as_ref().map(|i| i.payload.as_str())
    }

    pub fn last_message(&self) -> Option<&Message> {
        self.messages.last()
    }

    /// New input accepted; the run starts (or replays) at `next_step`. Keeps `resume_values`
    /// so replaying a failed, previously interrupted step sees the same decisions.
    pub(crate) fn mark_input(&mut self, next_step: &str) {
        self.status = SessionStatus::Running;
        self.pending_step_id = Some(next_step.to_string());
        self.interrupt = None;
        self.last_error = None;
        self.advance(CheckpointSource::Input);
    }

    pub(crate) fn mark_running(&mut self, next_step: &str, source: CheckpointSource) {
        self.status = SessionStatus::Running;
        self.pending_step_id = Some(next_step.to_string());
        self.interrupt = None;
        self.resume_values.clear();
        self.last_error = None;
        self.advance(source);
    }

    pub(crate) fn mark_interrupted(&mut self, request: InterruptRequest, decisions: Vec<String>) {
        self.status = SessionStatus::Interrupted;
        self.pending_step_id = Some(request.step_id.clone());
        self.interrupt = Some(request);
        self.resume_values = decisions;
        self.last_error = None;
        self.advance(CheckpointSource::Loop);
    }

    pub(crate) fn mark_completed(&mut self) {
        self.status = SessionStatus::Completed;
        self.pending_step_id = None;
        self.interrupt = None;
        self.resume_values.clear();
        self.last_error = None;
        self.advance(CheckpointSource::Loop);
    }

    /// Keeps `resume_values` so a replay of an interrupted step sees the same decisions.
    pub(crate) fn mark_failed(&mut self, step_id: &str, error: String) {
        self.status = SessionStatus::Failed;
        self.pending_step_id = Some(step_id.to_string());
        self.interrupt = None;
        self.last_error = Some(error);
        self.advance(CheckpointSource::Loop);
    }

    pub(crate) fn mark_cancelled(&mut self) {
        self.status = SessionStatus::Cancelled;
        self.pending_step_id = None;
        self.interrupt = None;
        self.resume_values.clear();
        self.advance(CheckpointSource::Update);
    }

    fn advance(&mut self, source: CheckpointSource) {
        let step = self.metadata.step + 1;
        let (id, ts, now) = stamp(step);
        self.id = id;
        self.ts = ts;
        self.metadata = CheckpointMetadata {
            source,
            step,
            created_at: Some(now),
        };
    }
}

fn stamp(step: u64) -> (String, String, SystemTime) {
    let now = SystemTime::now();
    let ts = format!(
        "{}",
        now.duration_since(SystemTime::UNIX_EPOCH)
            .map(|d| d.as_millis())
            .unwrap_or(0)
    );
    let id = format!("{}-{}", ts, step);
    (id, ts, now)
}
