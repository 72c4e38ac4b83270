//! Interactive dashboard
//!
//! The loop owns the terminal. Every input goes through [`App::update`] and
//! the effects it returns are run here, so the state machine itself stays
//! free of I/O.

pub mod app;
pub mod components;
pub mod event;
pub mod keymap;
pub mod theme;
pub mod ui;

use std::collections::VecDeque;
use std::fs;
use std::io::stdout;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Result};
use clap::Args;
use crossterm::{
    cursor::Show,
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, prelude::*, Terminal};
use tracing::{debug, info, warn};

use crate::cli::config::Settings;
use crate::cli::source::{load_groups, LogSource};
use crate::cli::tui::app::{App, AppConfig, Effect, HighlightMode};
use crate::cli::tui::event::{Event, EventHandler};
use crate::cli::tui::theme::Theme;

/// TUI command arguments
#[derive(Debug, Clone, Default, Args)]
pub struct TuiArgs {
    /// Directory saved queries are written to
    #[arg(long, value_name = "DIR")]
    pub save_dir: Option<PathBuf>,

    /// How long status messages stay visible, in milliseconds
    #[arg(long, value_name = "MS")]
    pub status_ms: Option<u64>,

    /// Start with syntax highlighting off
    #[arg(long)]
    pub no_highlight: bool,
}

impl TuiArgs {
    /// Flags layered over the resolved settings.
    pub fn app_config(&self, settings: &Settings) -> AppConfig {
        AppConfig {
            save_dir: self
                .save_dir
                .clone()
                .unwrap_or_else(|| settings.save_dir.clone()),
            status_ttl: self
                .status_ms
                .map(Duration::from_millis)
                .unwrap_or_else(|| settings.status_ttl()),
            highlight: if self.no_highlight {
                HighlightMode::Off
            } else {
                settings.highlight
            },
        }
    }
}

/// Run the TUI
pub fn run(args: TuiArgs, source: &LogSource, settings: &Settings) -> Result<()> {
    let rt = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    rt.block_on(run_dashboard(args, source, settings))
}

async fn run_dashboard(args: TuiArgs, source: &LogSource, settings: &Settings) -> Result<()> {
    println!("Loading slow queries from {} ...", source.describe());
    let groups = load_groups(source).await?;
    if groups.is_empty() {
        println!("No slow queries found.");
        return Ok(());
    }
    println!("Loaded {} grouped slow queries", groups.len());

    let mut app = App::new(groups, args.app_config(settings));
    let theme = Theme::default();

    let _guard = TerminalGuard::enter()?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;
    let mut events = EventHandler::new(settings.tick_rate());

    run_app(&mut terminal, &mut app, &theme, &mut events).await
}

/// Raw mode plus alternate screen, undone on drop (error paths included).
struct TerminalGuard;

impl TerminalGuard {
    fn enter() -> Result<Self> {
        enable_raw_mode()?;
        let guard = TerminalGuard;
        execute!(stdout(), EnterAlternateScreen)?;
        Ok(guard)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(stdout(), LeaveAlternateScreen, Show);
    }
}

/// Run the application loop
async fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    theme: &Theme,
    events: &mut EventHandler,
) -> Result<()> {
    let size = terminal.size()?;
    let effects = app.update(Event::Resize(size.width, size.height));
    run_effects(app, effects, events);

    while app.running {
        terminal.draw(|frame| ui::draw(frame, app, theme))?;

        let Some(event) = events.next().await else {
            debug!("Event channel closed");
            break;
        };
        let effects = app.update(event);
        run_effects(app, effects, events);
    }

    match app.input_lost.take() {
        Some(reason) => bail!("Terminal input failed: {}", reason),
        None => Ok(()),
    }
}

fn run_effects(app: &mut App, effects: Vec<Effect>, events: &EventHandler) {
    let mut queue: VecDeque<Effect> = effects.into();
    while let Some(effect) = queue.pop_front() {
        match effect {
            Effect::Quit => debug!("Quit requested"),
            Effect::WriteFile { path, contents } => {
                let result = save_query(&path, &contents);
                queue.extend(app.update(Event::SaveCompleted(result)));
            }
            Effect::ScheduleStatusClear(after) => events.schedule(after, Event::StatusExpired),
        }
    }
}

/// Write one saved query, reporting failures as text for the status line.
pub fn save_query(path: &Path, contents: &str) -> std::result::Result<PathBuf, String> {
    match fs::write(path, contents) {
        Ok(()) => {
            info!(path = %path.display(), "Saved query");
            Ok(path.to_path_buf())
        }
        Err(err) => {
            warn!(path = %path.display(), error = %err, "Failed to save query");
            Err(err.to_string())
        }
    }
}
