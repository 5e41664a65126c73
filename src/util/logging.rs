//! Tracing subscriber setup for hosts that want file logging

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

/// Install a global fmt subscriber appending to `path`.
///
/// The filter defaults to WARN and honours `RUST_LOG`. Returns `Ok(false)`
/// if a global subscriber was already installed.
pub fn init_file_logging(path: &Path) -> anyhow::Result<bool> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("creating log directory {}", parent.display()))?;
    }

    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("opening log file {}", path.display()))?;

    let installed = tracing_subscriber::fmt()
        .with_env_filter(env_filter(std::env::var("RUST_LOG").ok().as_deref()))
        .with_writer(Mutex::new(log_file))
        .with_ansi(false)
        .try_init()
        .is_ok();

    Ok(installed)
}

/// `RUST_LOG`-style directives, or WARN when unset or unparseable
fn env_filter(directives: Option<&str>) -> EnvFilter {
    directives
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new("warn"))
}
