use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// Environment variable overriding the store file location
pub const STORE_ENV: &str = "LOG_FILTERS_STORE";
/// Environment variable holding the log filter directive
pub const LOG_ENV: &str = "LOG_FILTERS_LOG";

const APP_DIR: &str = "log-filters";
const STORE_FILENAME: &str = "filters.json";
const LOG_FILENAME: &str = "log-filters.log";

/// Get the default store file path (<data dir>/log-filters/filters.json)
pub fn default_store_path() -> Result<PathBuf> {
    let data_dir = dirs::data_dir().context("Failed to get platform data directory")?;
    Ok(data_dir.join(APP_DIR).join(STORE_FILENAME))
}

/// Log file used while the terminal UI owns the screen, next to the store
pub fn log_file_path(store: &Path) -> PathBuf {
    store.with_file_name(LOG_FILENAME)
}
