//! Event handling for the TUI
//!
//! Terminal input is read on a blocking task and forwarded into one tokio
//! channel. Timers and finished saves feed the same channel, so the loop has
//! a single place to wait.

use std::io;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crossterm::event::{self, Event as CrosstermEvent, KeyEvent, KeyEventKind};
use tokio::sync::mpsc;
use tracing::warn;

/// Inputs of the dashboard state machine
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// Key press
    Key(KeyEvent),
    /// Terminal resize
    Resize(u16, u16),
    /// The status message timer fired
    StatusExpired,
    /// A save finished, with the written path or the error text
    SaveCompleted(Result<PathBuf, String>),
    /// The terminal reader failed and stopped
    InputLost(String),
}

/// Event handler
pub struct EventHandler {
    tx: mpsc::UnboundedSender<Event>,
    rx: mpsc::UnboundedReceiver<Event>,
    stop: Arc<AtomicBool>,
}

impl EventHandler {
    /// Start reading terminal input, polling every `tick_rate`.
    pub fn new(tick_rate: Duration) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let stop = Arc::new(AtomicBool::new(false));

        let input_tx = tx.clone();
        let input_stop = Arc::clone(&stop);
        tokio::task::spawn_blocking(move || read_terminal(input_tx, input_stop, tick_rate));

        Self { tx, rx, stop }
    }

    /// Channel-only handler for tests; nothing reads the terminal.
    #[cfg(test)]
    pub fn detached() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            tx,
            rx,
            stop: Arc::new(AtomicBool::new(true)),
        }
    }

    /// Sender for timers and other producers.
    pub fn sender(&self) -> mpsc::UnboundedSender<Event> {
        self.tx.clone()
    }

    /// Wait for the next event. `None` once every sender is gone.
    pub async fn next(&mut self) -> Option<Event> {
        self.rx.recv().await
    }

    /// Send `event` after `delay`. Earlier timers are not cancelled.
    pub fn schedule(&self, delay: Duration, event: Event) {
        let tx = self.sender();
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = tx.send(event);
        });
    }
}

impl Drop for EventHandler {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
    }
}

fn read_terminal(tx: mpsc::UnboundedSender<Event>, stop: Arc<AtomicBool>, tick_rate: Duration) {
    pump_input(&tx, &stop, || {
        if event::poll(tick_rate)? {
            event::read().map(Some)
        } else {
            Ok(None)
        }
    });
}

/// Forward input until stopped. A failing source ends with `InputLost`, so
/// the loop never waits on a reader that is gone.
fn pump_input(
    tx: &mpsc::UnboundedSender<Event>,
    stop: &AtomicBool,
    mut next: impl FnMut() -> io::Result<Option<CrosstermEvent>>,
) {
    while !stop.load(Ordering::Relaxed) {
        let forwarded = match next() {
            Ok(Some(CrosstermEvent::Key(key))) if key.kind != KeyEventKind::Release => Event::Key(key),
            Ok(Some(CrosstermEvent::Resize(w, h))) => Event::Resize(w, h),
            Ok(_) => continue,
            Err(err) => {
                warn!(error = %err, "Terminal input failed; reader stopping");
                let _ = tx.send(Event::InputLost(err.to_string()));
                return;
            }
        };

        if tx.send(forwarded).is_err() {
            return;
        }
    }
}
