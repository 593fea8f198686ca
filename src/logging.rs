//! Logging setup for the binary, using `tracing` and `tracing-subscriber`.
//!
//! The library only emits events. The binary installs the subscriber once:
//! plain commands log to stderr, the terminal UI logs to a file because it
//! owns the screen. `LOG_FILTERS_LOG` takes an `EnvFilter` directive and
//! overrides the `-v` count.

use std::fs::{self, OpenOptions};
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{Context, Result, anyhow};
use tracing::Level;
use tracing_subscriber::EnvFilter;

use crate::utils::LOG_ENV;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogTarget {
    Stderr,
    File(PathBuf),
}

#[derive(Debug, Clone)]
pub struct LogConfig {
    pub level: Level,
    pub target: LogTarget,
}

impl LogConfig {
    /// 0 → warn, 1 → info, 2 → debug, 3+ → trace
    pub fn from_verbosity(verbosity: u8) -> Self {
        let level = match verbosity {
            0 => Level::WARN,
            1 => Level::INFO,
            2 => Level::DEBUG,
            _ => Level::TRACE,
        };
        Self { level, target: LogTarget::Stderr }
    }

    pub fn to_file(self, path: PathBuf) -> Self {
        Self { target: LogTarget::File(path), ..self }
    }
}

fn build_env_filter(level: Level) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| {
        // Dependencies stay at warn
        EnvFilter::new(format!("warn,log_filters={}", level.as_str().to_lowercase()))
    })
}

/// Install the global subscriber
pub fn init(config: &LogConfig) -> Result<()> {
    let filter = build_env_filter(config.level);
    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_target(false);

    let installed = match &config.target {
        LogTarget::Stderr => builder.with_writer(std::io::stderr).try_init(),
        LogTarget::File(path) => {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).context("Failed to create log directory")?;
            }
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;
            builder.with_writer(Mutex::new(file)).with_ansi(false).try_init()
        }
    };
    installed.map_err(|err| anyhow!("Failed to install log subscriber: {err}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_verbosity() {
        assert_eq!(LogConfig::from_verbosity(0).level, Level::WARN);
        assert_eq!(LogConfig::from_verbosity(1).level, Level::INFO);
        assert_eq!(LogConfig::from_verbosity(2).level, Level::DEBUG);
        assert_eq!(LogConfig::from_verbosity(7).level, Level::TRACE);
    }

    #[test]
    fn test_to_file_keeps_level() {
        let config = LogConfig::from_verbosity(2).to_file(PathBuf::from("/tmp/x.log"));
        assert_eq!(config.level, Level::DEBUG);
        assert_eq!(config.target, LogTarget::File(PathBuf::from("/tmp/x.log")));
    }

    #[test]
    fn test_default_filter_scopes_crate() {
        if std::env::var(LOG_ENV).is_ok() {
            return;
        }
        let filter = build_env_filter(Level::DEBUG).to_string();
        assert!(filter.contains("log_filters=debug"));
        assert!(filter.contains("warn"));
    }
}
