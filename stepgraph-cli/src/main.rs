//! Stock desk binary: chat in a REPL, or run a single command on a thread.

use clap::Parser;
use stepgraph_cli::{
    build_stock_desk, execute, init_tracing, print_config_summary, repl, Command, Error,
    RunConfig, RunOptions,
};

#[derive(Parser, Debug)]
#[command(name = "stepgraph")]
#[command(about = "Stock desk agent: look up prices, buy shares after approval. Sessions resume across runs.")]
struct Args {
    /// Send one message and exit (otherwise start the interactive loop).
    #[arg(short, long, value_name = "TEXT")]
    message: Option<String>,

    /// Answer the thread's pending approval (e.g. "yes") and exit.
    #[arg(long, value_name = "DECISION", conflicts_with = "message")]
    resume: Option<String>,

    /// Abandon the thread's pending approval and exit.
    #[arg(long, conflicts_with_all = ["message", "resume"])]
    cancel: bool,

    /// Print the thread's status and history and exit.
    #[arg(long)]
    history: bool,

    /// Print all thread ids in the store and exit.
    #[arg(long)]
    list_threads: bool,

    /// Delete the thread's session and exit.
    #[arg(long)]
    purge: bool,

    /// Session id (overrides THREAD_ID).
    #[arg(short, long, value_name = "ID")]
    thread_id: Option<String>,

    /// SQLite file for sessions (overrides DB_PATH).
    #[arg(long, value_name = "PATH")]
    db_path: Option<String>,

    /// Keep sessions in memory even when DB_PATH is set.
    #[arg(long)]
    in_memory: bool,

    /// Steps per call before the run is stopped (overrides STEP_LIMIT).
    #[arg(long, value_name = "N", value_parser = clap::value_parser!(u64).range(1..))]
    step_limit: Option<u64>,

    /// Log step enter/exit and run control to stderr.
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    fn options(&self) -> RunOptions {
        RunOptions {
            thread_id: self.thread_id.clone(),
            db_path: self.db_path.clone(),
            in_memory: self.in_memory,
            step_limit: self.step_limit.map(|n| n as usize),
            verbose: self.verbose,
        }
    }

    fn command(&self) -> Option<Command> {
        if let Some(text) = &self.message {
            Some(Command::Send(text.clone()))
        } else if let Some(decision) = &self.resume {
            Some(Command::Resume(decision.clone()))
        } else if self.cancel {
            Some(Command::Cancel)
        } else if self.history {
            Some(Command::History)
        } else if self.list_threads {
            Some(Command::ListThreads)
        } else if self.purge {
            Some(Command::Purge)
        } else {
            None
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    dotenv::dotenv().ok();
    let args = Args::parse();

    let mut config = RunConfig::from_env()?;
    config.apply_options(&args.options());
    init_tracing(config.verbose)?;
    if config.verbose {
        print_config_summary(&config);
    }

    let graph = build_stock_desk(&config)?;
    let mut stdout = std::io::stdout();

    match args.command() {
        Some(command) => {
            if let Err(e) = execute(&graph, &config.thread_id, command, &mut stdout).await {
                eprintln!("error: {}", e);
                std::process::exit(1);
            }
        }
        None => {
            let stdin = std::io::stdin();
            repl(&graph, &config.thread_id, stdin.lock(), &mut stdout).await?;
        }
    }
    Ok(())
}
