//! Key bindings and the hints shown for them.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use super::app::HighlightMode;
use super::components::help_bar::ActionHint;

/// What a key press asks the dashboard to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    SwitchFocus,
    Save,
    Select,
    ToggleHighlight,
    ToggleZoom,
    OpenSort,
    Up,
    Down,
    PageUp,
    PageDown,
    Top,
    Bottom,
}

impl Action {
    /// Actions handled on every screen, even with the sort modal open.
    pub fn is_global(self) -> bool {
        !matches!(
            self,
            Action::Up
                | Action::Down
                | Action::PageUp
                | Action::PageDown
                | Action::Top
                | Action::Bottom
        )
    }
}

/// Keys the sort modal binds once global actions have run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalAction {
    SwitchAxis,
    ColumnAxis,
    OrderAxis,
    Up,
    Down,
    Apply,
    Cancel,
}

fn is_quit(key: &KeyEvent) -> bool {
    match key.code {
        KeyCode::Char('q') => true,
        KeyCode::Char('c') => key.modifiers.contains(KeyModifiers::CONTROL),
        _ => false,
    }
}

/// Resolve a key on the main screen.
pub fn resolve(key: KeyEvent) -> Option<Action> {
    if key.kind == KeyEventKind::Release {
        return None;
    }
    if is_quit(&key) {
        return Some(Action::Quit);
    }
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return None;
    }

    let action = match key.code {
        KeyCode::Tab => Action::SwitchFocus,
        KeyCode::Char('s') => Action::Save,
        KeyCode::Enter => Action::Select,
        KeyCode::Char('h') => Action::ToggleHighlight,
        KeyCode::Char('z') => Action::ToggleZoom,
        KeyCode::Char('l') => Action::OpenSort,
        KeyCode::Up | KeyCode::Char('k') => Action::Up,
        KeyCode::Down | KeyCode::Char('j') => Action::Down,
        KeyCode::PageUp => Action::PageUp,
        KeyCode::PageDown => Action::PageDown,
        KeyCode::Home | KeyCode::Char('g') => Action::Top,
        KeyCode::End | KeyCode::Char('G') => Action::Bottom,
        _ => return None,
    };
    Some(action)
}

/// Resolve a key for the open sort modal.
///
/// `h` and `l` stay global (highlight, open sort), so only the arrows pick
/// an axis directly.
pub fn resolve_modal(key: KeyEvent) -> Option<ModalAction> {
    if key.kind == KeyEventKind::Release || key.modifiers.contains(KeyModifiers::CONTROL) {
        return None;
    }

    let action = match key.code {
        KeyCode::Tab => ModalAction::SwitchAxis,
        KeyCode::Left => ModalAction::ColumnAxis,
        KeyCode::Right => ModalAction::OrderAxis,
        KeyCode::Up | KeyCode::Char('k') => ModalAction::Up,
        KeyCode::Down | KeyCode::Char('j') => ModalAction::Down,
        KeyCode::Enter => ModalAction::Apply,
        KeyCode::Esc => ModalAction::Cancel,
        _ => return None,
    };
    Some(action)
}

fn ordered_hints(items: &[(&'static str, &'static str)]) -> Vec<ActionHint> {
    let mut hints = Vec::with_capacity(items.len());
    let mut priority: i16 = 100;
    for (key, label) in items {
        hints.push(ActionHint::new(*key, *label, priority.max(1) as u8));
        priority -= 5;
    }
    hints
}

/// Hints for the bottom help panel.
pub fn main_hints(highlight: HighlightMode) -> Vec<ActionHint> {
    let mut hints = ordered_hints(&[
        ("↑/↓", "Scroll"),
        ("↵", "Show Queries"),
        ("Tab", "Switch panel"),
        ("l", "Sort"),
        ("s", "Save queries"),
        ("z", "Zoom"),
        ("h", "HL-mode"),
        ("q", "Quit"),
    ]);
    hints.push(ActionHint::new(
        "h",
        format!("Highlight: {}", highlight.label()),
        1,
    ));
    hints
}

/// Hints while the preview is zoomed.
pub fn zoom_hints() -> Vec<ActionHint> {
    ordered_hints(&[("z", "Unzoom"), ("h", "Highlight"), ("q", "Quit")])
}

/// Hints at the bottom of the sort modal.
pub fn modal_hints() -> Vec<ActionHint> {
    ordered_hints(&[
        ("Tab", "Switch"),
        ("↑/↓", "Move"),
        ("Enter", "Apply"),
        ("Esc", "Cancel"),
    ])
}
