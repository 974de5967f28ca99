//! Config summary printed to stderr when running verbose.

use crate::config::{RunConfig, StoreConfig};

/// `(key, value)` entries describing the effective run config.
pub fn config_summary(config: &RunConfig) -> Vec<(&'static str, String)> {
    let store = match &config.store {
        StoreConfig::InMemory => "memory".to_string(),
        StoreConfig::Sqlite { .. } => "sqlite".to_string(),
    };
    let mut entries = vec![
        ("thread_id", config.thread_id.clone()),
        ("store", store),
    ];
    if let Some(path) = config.db_path() {
        entries.push(("db_path", path.to_string()));
    }
    entries.push(("step_limit", config.step_limit.to_string()));
    entries
}

pub fn print_config_summary(config: &RunConfig) {
    let line = config_summary(config)
        .into_iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join(" ");
    eprintln!("[config] {}", line);
}
