//! Configuration for slowlog
//!
//! Resolution order: command-line flags, then `<home>/config.toml`, then
//! built-in defaults. The home directory is ~/.slowlog/ unless
//! `SLOWLOG_HOME` points elsewhere.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

pub use slowlog_logging::{logs_dir, slowlog_home};

use crate::cli::error::HelpfulError;
use crate::cli::tui::app::HighlightMode;

pub const DEFAULT_DSN: &str = "mysql://root@127.0.0.1:3306/mysql";
pub const DEFAULT_STATUS_MS: u64 = 1500;
pub const DEFAULT_TICK_MS: u64 = 250;

/// Get config file path: ~/.slowlog/config.toml
pub fn config_path() -> PathBuf {
    slowlog_home().join("config.toml")
}

/// Keys accepted in config.toml. Every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub dsn: Option<String>,
    pub save_dir: Option<PathBuf>,
    pub status_ms: Option<u64>,
    pub highlight: Option<HighlightMode>,
    pub tick_ms: Option<u64>,
}

impl FileConfig {
    pub fn parse(text: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    /// Load an explicit config file, or the default one when `path` is `None`.
    ///
    /// A missing default file means "no overrides"; a missing explicit file
    /// is an error.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let (path, explicit) = match path {
            Some(path) => (path.to_path_buf(), true),
            None => (config_path(), false),
        };

        if !path.exists() {
            if explicit {
                return Err(HelpfulError::invalid_config(&path, "The file does not exist").into());
            }
            return Ok(Self::default());
        }

        let text = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config =
            Self::parse(&text).map_err(|err| HelpfulError::invalid_config(&path, &err.to_string()))?;
        debug!(path = %path.display(), "Loaded config file");
        Ok(config)
    }
}

/// Settings after defaults and config.toml have been applied.
///
/// Command-specific flags are layered on top by each command.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Settings {
    pub dsn: String,
    pub save_dir: PathBuf,
    pub status_ms: u64,
    pub highlight: HighlightMode,
    pub tick_ms: u64,
}

impl Settings {
    pub fn from_file(file: &FileConfig) -> Self {
        Self {
            dsn: file.dsn.clone().unwrap_or_else(|| DEFAULT_DSN.to_string()),
            save_dir: file
                .save_dir
                .as_deref()
                .map(expand_home)
                .unwrap_or_else(|| PathBuf::from(".")),
            status_ms: file.status_ms.unwrap_or(DEFAULT_STATUS_MS),
            highlight: file.highlight.unwrap_or_default(),
            tick_ms: file.tick_ms.unwrap_or(DEFAULT_TICK_MS).max(1),
        }
    }

    /// How long a status message stays up.
    pub fn status_ttl(&self) -> Duration {
        Duration::from_millis(self.status_ms)
    }

    /// Input poll interval of the dashboard.
    pub fn tick_rate(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self::from_file(&FileConfig::default())
    }
}

/// Expand a leading `~` to the user's home directory.
pub fn expand_home(path: &Path) -> PathBuf {
    let Ok(rest) = path.strip_prefix("~") else {
        return path.to_path_buf();
    };
    match dirs::home_dir() {
        Some(home) => home.join(rest),
        None => path.to_path_buf(),
    }
}

/// Arguments for the config command
#[derive(Debug, clap::Args)]
pub struct ConfigArgs {
    /// Show resolved paths and settings in JSON format
    #[arg(long)]
    pub json: bool,
}

/// Run the config command - shows resolved paths and settings
pub fn run(args: ConfigArgs, config_file: &Path, settings: &Settings) -> Result<()> {
    let home = slowlog_home();
    let logs = logs_dir();
    let dsn = slowlog_db::redact_dsn(&settings.dsn);

    if args.json {
        let config = serde_json::json!({
            "home": home.to_string_lossy(),
            "config_file": {
                "path": config_file.to_string_lossy(),
                "exists": config_file.exists(),
            },
            "logs": {
                "path": logs.to_string_lossy(),
                "exists": logs.exists(),
            },
            "settings": {
                "dsn": dsn,
                "save_dir": settings.save_dir.to_string_lossy(),
                "status_ms": settings.status_ms,
                "highlight": settings.highlight,
                "tick_ms": settings.tick_ms,
            },
        });
        println!("{}", serde_json::to_string_pretty(&config)?);
    } else {
        println!("SLOWLOG CONFIGURATION");
        println!("=====================");
        println!();
        println!("Home:      {}", home.display());
        println!(
            "Config:    {} ({})",
            config_file.display(),
            if config_file.exists() { "exists" } else { "not found" }
        );
        println!(
            "Logs:      {} ({})",
            logs.display(),
            if logs.exists() { "exists" } else { "not found" }
        );
        println!();
        println!("DSN:       {}", dsn);
        println!("Save dir:  {}", settings.save_dir.display());
        println!("Status:    {} ms", settings.status_ms);
        println!("Highlight: {}", settings.highlight.as_str());
        println!("Tick:      {} ms", settings.tick_ms);
    }

    Ok(())
}
