//! Tracing setup for the `stepgraph` binary.
//!
//! Logs go to stderr so stdout carries only the conversation. `RUST_LOG` overrides the
//! default filter; `LOG_FILE` adds a plain-text file layer (append).

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::Layer;

use crate::config::Error;

/// Filter used when `RUST_LOG` is unset.
pub fn default_filter(verbose: bool) -> &'static str {
    if verbose {
        "info,stepgraph=debug,stepgraph_cli=debug"
    } else {
        "warn"
    }
}

/// Initializes tracing. A second call is a no-op (the global subscriber is already set).
pub fn init_tracing(verbose: bool) -> Result<(), Error> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter(verbose)));

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_filter(filter.clone());

    let registry = tracing_subscriber::registry().with(stderr_layer);

    if let Ok(path) = std::env::var("LOG_FILE") {
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)?;
        let file_layer = tracing_subscriber::fmt::layer()
            .with_writer(std::sync::Mutex::new(file))
            .with_ansi(false)
            .with_target(true)
            .with_thread_ids(false)
            .with_filter(filter);
        let _ = registry.with(file_layer).try_init();
        tracing::info!(path = %path, "logging to file");
    } else {
        let _ = registry.try_init();
    }
    Ok(())
}
