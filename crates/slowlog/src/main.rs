//! slowlog: MySQL slow queries, grouped by statement shape
//!
//! - `slowlog` / `slowlog tui`: interactive dashboard
//! - `slowlog report`: grouped summary as a table or JSON
//! - `slowlog config`: resolved paths and settings

mod cli;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use slowlog_logging::{init_logging, LogConfig};
use tracing::debug;

use crate::cli::config::{config_path, FileConfig, Settings};
use crate::cli::source::{LogSource, SourceArgs};

#[derive(Parser, Debug)]
#[command(name = "slowlog", version, about = "Browse MySQL slow queries grouped by statement shape")]
struct Cli {
    /// Enable verbose logging (info/debug to stderr)
    #[arg(short = 'v', long, global = true)]
    verbose: bool,

    /// Config file (default: ~/.slowlog/config.toml)
    #[arg(long, value_name = "PATH", global = true)]
    config: Option<PathBuf>,

    #[command(flatten)]
    source: SourceArgs,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Interactive dashboard (the default)
    Tui {
        #[command(flatten)]
        args: cli::tui::TuiArgs,
    },

    /// Print the grouped slow queries
    Report {
        #[command(flatten)]
        args: cli::report::ReportArgs,
    },

    /// Show resolved paths and settings
    Config {
        #[command(flatten)]
        args: cli::config::ConfigArgs,
    },
}

fn run_command(cli: Cli) -> Result<()> {
    let file_config = FileConfig::load(cli.config.as_deref())?;
    let settings = Settings::from_file(&file_config);
    let source = LogSource::resolve(&cli.source, &settings);
    debug!(source = %source.describe(), "Resolved slow log source");

    let command = cli.command.unwrap_or(Commands::Tui {
        args: cli::tui::TuiArgs::default(),
    });
    match command {
        Commands::Tui { args } => cli::tui::run(args, &source, &settings),
        Commands::Report { args } => cli::report::run(args, &source),
        Commands::Config { args } => {
            let path = cli.config.unwrap_or_else(config_path);
            cli::config::run(args, &path, &settings)
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Anything on stderr corrupts the dashboard while it owns the terminal
    let tui_mode = matches!(cli.command, None | Some(Commands::Tui { .. }));
    let _log_guard = match init_logging(LogConfig {
        app_name: "slowlog",
        verbose: cli.verbose,
        tui_mode,
    }) {
        Ok(guard) => Some(guard),
        Err(err) => {
            eprintln!("Warning: failed to initialize logging: {:#}", err);
            None
        }
    };

    match run_command(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{:?}", err);
            ExitCode::from(1)
        }
    }
}
