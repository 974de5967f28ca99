//! One-shot commands for non-interactive use (`-m`, `--resume`, `--cancel`, ...).

use std::io::Write;

use stepgraph::CompiledStateGraph;

use super::turn::{render_outcome, run_turn, TurnInput};
use super::Error;

/// A single action on one thread.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Send one user message.
    Send(String),
    /// Answer the pending approval.
    Resume(String),
    /// Abandon the pending approval.
    Cancel,
    /// Print the thread's status and history.
    History,
    /// Print every thread id in the store.
    ListThreads,
    /// Delete the thread's session.
    Purge,
}

/// Executes `command` on `thread_id`, writing the result to `out`.
pub async fn execute<W: Write>(
    graph: &CompiledStateGraph,
    thread_id: &str,
    command: Command,
    out: &mut W,
) -> Result<(), Error> {
    match command {
        Command::Send(text) => {
            let outcome = run_turn(graph, thread_id, TurnInput::Message(text), out).await?;
            writeln!(out, "{}", render_outcome(&outcome))?;
        }
        Command::Resume(decision) => {
            let outcome = run_turn(graph, thread_id, TurnInput::Decision(decision), out).await?;
            writeln!(out, "{}", render_outcome(&outcome))?;
        }
        Command::Cancel => {
            let cp = graph.cancel(thread_id).await?;
            writeln!(out, "Thread {} is {}.", thread_id, cp.status.as_str())?;
        }
        Command::History => match graph.get_state(thread_id).await? {
            None => writeln!(out, "Thread {} has no session.", thread_id)?,
            Some(cp) => {
                writeln!(out, "Thread {} is {}.", thread_id, cp.status.as_str())?;
                for m in &cp.messages {
                    if m.content().is_empty() {
                        for call in m.tool_calls() {
                            writeln!(out, "[{}] -> {}({})", m.role(), call.name, call.arguments)?;
                        }
                    } else {
                        writeln!(out, "[{}] {}", m.role(), m.content())?;
                    }
                }
                if let Some(payload) = cp.interrupt_payload() {
                    writeln!(out, "Pending approval: {}", payload)?;
                }
                if let Some(err) = &cp.last_error {
                    writeln!(out, "Last error: {}", err)?;
                }
            }
        },
        Command::ListThreads => {
            for id in graph.list_threads().await? {
                writeln!(out, "{}", id)?;
            }
        }
        Command::Purge => {
            let existed = graph.purge(thread_id).await?;
            if existed {
                writeln!(out, "Thread {} deleted.", thread_id)?;
            } else {
                writeln!(out, "Thread {} has no session.", thread_id)?;
            }
        }
    }
    Ok(())
}
