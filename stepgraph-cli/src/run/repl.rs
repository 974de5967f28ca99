//! Interactive loop over one thread. Reads lines from any `BufRead`, writes to any `Write`.

use std::io::{BufRead, Write};

use stepgraph::{CompiledStateGraph, RunOutcome, SessionStatus};

use super::turn::{render_outcome, run_turn, TurnInput};
use super::Error;

const USER_PROMPT: &str = "User: ";
const DECISION_PROMPT: &str = "Decision (yes/no): ";

/// Runs the chat loop on `thread_id` until `quit` / `exit` or end of input.
///
/// A thread left waiting for approval (by an earlier process) is picked up first. Run errors
/// are printed and the loop continues; I/O errors end it.
pub async fn repl<R: BufRead, W: Write>(
    graph: &CompiledStateGraph,
    thread_id: &str,
    mut input: R,
    out: &mut W,
) -> Result<(), Error> {
    if let Some(cp) = graph.get_state(thread_id).await? {
        if cp.status == SessionStatus::Interrupted {
            writeln!(
                out,
                "Pending approval: {}",
                cp.interrupt_payload().unwrap_or_default()
            )?;
            if !await_decisions(graph, thread_id, &mut input, out).await? {
                return Ok(());
            }
        }
    }

    loop {
        let Some(line) = prompt(USER_PROMPT, &mut input, out)? else {
            break;
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line.eq_ignore_ascii_case("quit") || line.eq_ignore_ascii_case("exit") {
            break;
        }

        match run_turn(graph, thread_id, TurnInput::Message(line.to_string()), out).await {
            Ok(outcome) => {
                writeln!(out, "{}", render_outcome(&outcome))?;
                if outcome.is_interrupted()
                    && !await_decisions(graph, thread_id, &mut input, out).await?
                {
                    break;
                }
            }
            Err(e) => writeln!(out, "Error: {}", e)?,
        }
    }
    Ok(())
}

/// Reads decisions until the thread is no longer interrupted. Returns false on end of input;
/// the session then stays Interrupted in the checkpointer.
async fn await_decisions<R: BufRead, W: Write>(
    graph: &CompiledStateGraph,
    thread_id: &str,
    input: &mut R,
    out: &mut W,
) -> Result<bool, Error> {
    loop {
        let Some(line) = prompt(DECISION_PROMPT, input, out)? else {
            return Ok(false);
        };
        let decision = line.trim();
        if decision.is_empty() {
            continue;
        }

        match run_turn(graph, thread_id, TurnInput::Decision(decision.to_string()), out).await {
            Ok(outcome @ RunOutcome::Interrupted { .. }) => {
                writeln!(out, "{}", render_outcome(&outcome))?;
            }
            Ok(outcome) => {
                writeln!(out, "{}", render_outcome(&outcome))?;
                return Ok(true);
            }
            Err(e) => {
                writeln!(out, "Error: {}", e)?;
                return Ok(true);
            }
        }
    }
}

fn prompt<R: BufRead, W: Write>(
    text: &str,
    input: &mut R,
    out: &mut W,
) -> Result<Option<String>, Error> {
    write!(out, "{}", text)?;
    out.flush()?;
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line))
}
