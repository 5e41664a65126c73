//! Path utilities for storysave data directories

use std::path::PathBuf;
use std::sync::OnceLock;

/// Global storage for custom data directory path
static DATA_DIR: OnceLock<PathBuf> = OnceLock::new();

/// Initialize the data directory with an optional custom path.
/// Must be called before any other path functions are used.
/// If custom_path is None, uses the platform data directory.
pub fn init_data_dir(custom_path: Option<PathBuf>) {
    let path = custom_path.unwrap_or_else(default_data_dir);
    if DATA_DIR.set(path.clone()).is_err() {
        let existing = DATA_DIR
            .get()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "<unknown>".to_string());
        tracing::debug!(
            path = %path.display(),
            existing = %existing,
            "Data directory already initialized"
        );
    }
}

/// Get the default data directory path (<platform data dir>/storysave)
fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .or_else(dirs::home_dir)
        .map(|d| d.join("storysave"))
        .unwrap_or_else(|| PathBuf::from(".storysave"))
}

/// Get the base data directory.
/// Returns the custom path if set via init_data_dir(), otherwise the default
pub fn data_dir() -> PathBuf {
    DATA_DIR.get().cloned().unwrap_or_else(default_data_dir)
}

/// Get the default saves directory (<data dir>/saves)
pub fn saves_dir() -> PathBuf {
    data_dir().join("saves")
}

/// Get the logs directory (<data dir>/logs)
pub fn logs_dir() -> PathBuf {
    data_dir().join("logs")
}

/// Get the default log file path (<data dir>/logs/storysave.log)
pub fn log_file_path() -> PathBuf {
    logs_dir().join("storysave.log")
}

/// Get the config file path (<data dir>/storysave.toml)
pub fn config_path() -> PathBuf {
    data_dir().join("storysave.toml")
}
