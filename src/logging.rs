//! File logging. The terminal belongs to the UI, so nothing is written to
//! stdout or stderr once the screen is up.

use std::fs::OpenOptions;
use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::filter::{EnvFilter, LevelFilter};
use tracing_subscriber::{Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::{LogSettings, default_log_path};

/// Keeps the background writer alive; drop it last.
pub struct LogGuard {
    _guard: WorkerGuard,
}

/// Where the log goes: the configured file or the XDG state default.
pub fn log_path(settings: &LogSettings) -> Option<PathBuf> {
    settings.file.clone().or_else(default_log_path)
}

/// Default level for `level`, falling back to `info`. Per-target filters
/// go through `RUST_LOG`.
fn default_level(level: &str) -> LevelFilter {
    level.trim().parse().unwrap_or(LevelFilter::INFO)
}

/// Install the global subscriber. Returns `None` when logging is disabled
/// or no log location can be determined.
pub fn init(settings: &LogSettings) -> Result<Option<LogGuard>> {
    if !settings.enabled {
        return Ok(None);
    }
    let Some(path) = log_path(settings) else {
        return Ok(None);
    };

    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("failed to create log directory {}", dir.display()))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("failed to open log file {}", path.display()))?;

    let filter = EnvFilter::builder()
        .with_default_directive(default_level(&settings.level).into())
        .from_env_lossy();

    let (writer, guard) = tracing_appender::non_blocking(file);
    let layer = fmt::layer()
        .with_writer(writer)
        .with_ansi(false)
        .with_filter(filter);

    tracing_subscriber::registry()
        .with(layer)
        .try_init()
        .context("a global tracing subscriber is already installed")?;

    tracing::info!(path = %path.display(), level = %settings.level, "logging initialized");
    Ok(Some(LogGuard { _guard: guard }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_strings_are_case_insensitive() {
        assert_eq!(default_level("debug"), LevelFilter::DEBUG);
        assert_eq!(default_level(" WARN "), LevelFilter::WARN);
        assert_eq!(default_level("off"), LevelFilter::OFF);
    }

    #[test]
    fn unparsable_level_falls_back_to_info() {
        assert_eq!(default_level("loud"), LevelFilter::INFO);
        assert_eq!(default_level(""), LevelFilter::INFO);
    }

    #[test]
    fn explicit_file_wins_over_default_location() {
        let settings = LogSettings {
            file: Some(PathBuf::from("/var/tmp/m.log")),
            ..LogSettings::default()
        };
        assert_eq!(log_path(&settings), Some(PathBuf::from("/var/tmp/m.log")));
    }

    #[test]
    fn disabled_logging_installs_nothing() {
        let settings = LogSettings {
            enabled: false,
            ..LogSettings::default()
        };
        assert!(init(&settings).unwrap().is_none());
    }
}
