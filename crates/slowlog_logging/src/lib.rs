//! Logging setup for slowlog binaries.
//!
//! Everything goes to a daily log file under `<slowlog home>/logs`.
//! The stderr layer is muted while the dashboard owns the terminal.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

const DEFAULT_LOG_FILTER: &str = "slowlog=info,slowlog_core=info,slowlog_db=info";
const MAX_LOG_FILES: usize = 5;
const LOG_SUFFIX: &str = "log";

/// Logging options for one process.
pub struct LogConfig<'a> {
    /// Prefix of the log file (`<app_name>.<date>.log`)
    pub app_name: &'a str,
    /// Mirror the file filter on stderr
    pub verbose: bool,
    /// The terminal is in raw/alternate-screen mode
    pub tui_mode: bool,
}

/// Keeps the background log writer alive. Dropping it flushes pending lines.
pub struct LogGuard {
    pub log_dir: PathBuf,
    _worker: WorkerGuard,
}

/// Install the global tracing subscriber.
///
/// Hold on to the returned guard until the process exits.
pub fn init_logging(config: LogConfig<'_>) -> Result<LogGuard> {
    let log_dir = ensure_logs_dir().context("Failed to ensure log directory")?;
    let appender = daily_appender(&log_dir, config.app_name)?;
    let (file_writer, worker) = tracing_appender::non_blocking(appender);

    let file_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    // Anything written to stderr while the dashboard is up corrupts the screen.
    let console_filter = if config.tui_mode {
        EnvFilter::new("off")
    } else if config.verbose {
        file_filter.clone()
    } else {
        EnvFilter::new("warn")
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(file_writer)
                .with_ansi(false)
                .with_filter(file_filter),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_filter(console_filter),
        )
        .try_init()
        .context("A global tracing subscriber is already installed")?;

    Ok(LogGuard {
        log_dir,
        _worker: worker,
    })
}

/// Daily-rotated file appender keeping the newest `MAX_LOG_FILES` files.
fn daily_appender(dir: &Path, app_name: &str) -> Result<RollingFileAppender> {
    RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(sanitize_name(app_name))
        .filename_suffix(LOG_SUFFIX)
        .max_log_files(MAX_LOG_FILES)
        .build(dir)
        .with_context(|| format!("Failed to open log file in {}", dir.display()))
}

/// slowlog home directory.
///
/// Priority:
/// 1) SLOWLOG_HOME
/// 2) ~/.slowlog
/// 3) ./.slowlog
pub fn slowlog_home() -> PathBuf {
    if let Ok(override_path) = std::env::var("SLOWLOG_HOME") {
        return PathBuf::from(override_path);
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".slowlog")
}

/// Logs directory: <home>/logs
pub fn logs_dir() -> PathBuf {
    slowlog_home().join("logs")
}

/// Ensure the logs directory exists.
pub fn ensure_logs_dir() -> Result<PathBuf> {
    let logs = logs_dir();
    fs::create_dir_all(&logs)
        .with_context(|| format!("Failed to create logs directory: {}", logs.display()))?;
    Ok(logs)
}

fn sanitize_name(name: &str) -> String {
    name.chars()
        .map(|ch| if ch.is_ascii_alphanumeric() || ch == '-' || ch == '_' { ch } else { '_' })
        .collect()
}
