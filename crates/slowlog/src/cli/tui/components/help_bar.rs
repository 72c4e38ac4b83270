use std::borrow::Cow;

use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph},
};

/// One `[key] label` entry of the help bar.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ActionHint {
    pub key: Cow<'static, str>,
    pub label: Cow<'static, str>,
    /// Lower priorities are dropped first when space runs out
    pub priority: u8,
}

impl ActionHint {
    pub fn new(key: impl Into<Cow<'static, str>>, label: impl Into<Cow<'static, str>>, priority: u8) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            priority,
        }
    }

    fn width(&self) -> usize {
        self.key.chars().count() + self.label.chars().count() + 3
    }
}

const GAP_WIDTH: usize = 2;

fn line_width(hints: &[&ActionHint]) -> usize {
    let items: usize = hints.iter().map(|hint| hint.width()).sum();
    items + GAP_WIDTH * hints.len().saturating_sub(1)
}

/// Keep as many hints as fit in `width`, dropping the lowest priority first.
///
/// Surviving hints keep their original order.
pub fn fit_hints(hints: &[ActionHint], width: usize) -> Vec<&ActionHint> {
    let mut kept: Vec<&ActionHint> = hints.iter().collect();
    while !kept.is_empty() && line_width(&kept) > width {
        let drop = kept
            .iter()
            .enumerate()
            .rev()
            .min_by_key(|(_, hint)| hint.priority)
            .map(|(idx, _)| idx)
            .unwrap_or(kept.len() - 1);
        kept.remove(drop);
    }
    kept
}

/// `[key] label` spans separated by two spaces.
pub fn hint_spans(hints: &[&ActionHint], key_style: Style) -> Vec<Span<'static>> {
    let mut spans = Vec::with_capacity(hints.len() * 3);
    for (idx, hint) in hints.iter().enumerate() {
        if idx > 0 {
            spans.push(Span::raw(" ".repeat(GAP_WIDTH)));
        }
        spans.push(Span::styled(format!("[{}]", hint.key), key_style));
        spans.push(Span::raw(format!(" {}", hint.label)));
    }
    spans
}

/// Bordered one-line help panel with an optional status on the right.
pub fn render_help_bar(
    frame: &mut Frame,
    area: Rect,
    hints: &[ActionHint],
    status: Option<(&str, Style)>,
    key_style: Style,
    border_style: Style,
) {
    if area.height == 0 || area.width == 0 {
        return;
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style);
    let inner = block.inner(area);
    frame.render_widget(block, area);
    if inner.height == 0 || inner.width == 0 {
        return;
    }

    let status_width = status
        .map(|(text, _)| text.chars().count() + GAP_WIDTH)
        .unwrap_or(0);
    let available = (inner.width as usize).saturating_sub(status_width);
    let kept = fit_hints(hints, available);

    let mut spans = hint_spans(&kept, key_style);

    if let Some((text, style)) = status {
        let used = line_width(&kept);
        let pad = (inner.width as usize)
            .saturating_sub(used + text.chars().count())
            .max(1);
        spans.push(Span::raw(" ".repeat(pad)));
        spans.push(Span::styled(text.to_string(), style));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), inner);
}
