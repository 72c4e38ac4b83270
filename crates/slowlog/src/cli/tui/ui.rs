//! Rendering. Reads `App` state and a `Theme`; never mutates either.

use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
};
use slowlog_core::format::SUMMARY_COLUMNS;
use slowlog_core::{SortColumn, SortDirection};

use super::app::{App, Focus, SortAxis, SortModal, StatusTone};
use super::components::help_bar::{hint_spans, render_help_bar, ActionHint};
use super::components::modal::render_modal;
use super::keymap;
use super::theme::Theme;

/// Widths of every column but the query text. With the column gaps they add
/// up to `FIXED_COLUMNS_WIDTH`, so the query column fills the rest.
const FIXED_COLUMN_WIDTHS: [u16; 8] = [4, 8, 24, 16, 8, 10, 12, 10];
const HELP_HEIGHT: u16 = 3;
const MODAL_WIDTH: u16 = 64;
const MODAL_ORDER_COLUMN: usize = 36;
const EMPTY_PREVIEW: &str = "Press ↵ on a row to show its queries";

pub fn draw(frame: &mut Frame, app: &App, theme: &Theme) {
    let area = frame.area();
    if app.zoomed {
        draw_zoomed(frame, area, app, theme);
    } else {
        draw_panels(frame, area, app, theme);
    }

    if let Some(modal) = &app.sort_modal {
        draw_sort_modal(frame, area, modal, theme);
    }
}

fn draw_panels(frame: &mut Frame, area: Rect, app: &App, theme: &Theme) {
    let chunks = Layout::vertical([
        Constraint::Length(app.layout.table_height + 2),
        Constraint::Length(app.layout.preview_height + 2),
        Constraint::Length(HELP_HEIGHT),
        Constraint::Min(0),
    ])
    .split(area);

    draw_table(frame, chunks[0], app, theme);
    draw_preview(frame, chunks[1], app, theme);
    draw_help(frame, chunks[2], app, theme, &keymap::main_hints(app.highlight));
}

fn draw_zoomed(frame: &mut Frame, area: Rect, app: &App, theme: &Theme) {
    let chunks = Layout::vertical([Constraint::Min(0), Constraint::Length(HELP_HEIGHT)]).split(area);

    draw_preview(frame, chunks[0], app, theme);
    draw_help(frame, chunks[1], app, theme, &keymap::zoom_hints());
}

fn draw_table(frame: &mut Frame, area: Rect, app: &App, theme: &Theme) {
    let widths: Vec<Constraint> = FIXED_COLUMN_WIDTHS
        .iter()
        .copied()
        .chain(std::iter::once(app.table.query_width as u16))
        .map(Constraint::Length)
        .collect();

    let header = Row::new(SUMMARY_COLUMNS.iter().map(|title| Cell::from(*title))).style(theme.header());
    let rows = app
        .table
        .rows
        .iter()
        .map(|cells| Row::new(cells.iter().map(|cell| Cell::from(cell.as_str()))));

    let selected_style = if app.table.focused {
        theme.selected_row()
    } else {
        Style::default().add_modifier(Modifier::BOLD)
    };
    let title = format!(
        " Slow Queries ({}) - {} {} ",
        app.table.rows.len(),
        app.sort.column.label(),
        direction_arrow(app.sort.direction)
    );
    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme.border(app.table.focused))
                .title(title),
        )
        .row_highlight_style(selected_style);

    let selected = (!app.table.rows.is_empty()).then_some(app.table.cursor);
    let mut state = TableState::default()
        .with_offset(app.table.offset)
        .with_selected(selected);
    frame.render_stateful_widget(table, area, &mut state);
}

fn direction_arrow(direction: SortDirection) -> &'static str {
    match direction {
        SortDirection::Ascending => "↑",
        SortDirection::Descending => "↓",
    }
}

fn draw_preview(frame: &mut Frame, area: Rect, app: &App, theme: &Theme) {
    let active = app.focus == Focus::Preview;
    let title = match app.preview.selected_row {
        Some(row) => format!(" Queries #{} ", row + 1),
        None => " Queries ".to_string(),
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.border(active))
        .title(title);

    let Some(header) = &app.preview.header else {
        let hint = Paragraph::new(Span::styled(EMPTY_PREVIEW, Style::default().fg(theme.muted))).block(block);
        frame.render_widget(hint, area);
        return;
    };

    let mut lines: Vec<Line> = Vec::with_capacity(app.preview.line_count());
    lines.push(Line::from(vec![
        Span::styled(header.query_type.as_str(), Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(header.summary.as_str()),
    ]));
    lines.push(Line::default());
    for fragments in &app.preview.lines {
        let spans: Vec<Span> = fragments
            .iter()
            .map(|fragment| Span::styled(fragment.text.as_str(), theme.token(fragment.token)))
            .collect();
        lines.push(Line::from(spans));
    }

    let scroll = u16::try_from(app.preview.scroll).unwrap_or(u16::MAX);
    frame.render_widget(Paragraph::new(lines).block(block).scroll((scroll, 0)), area);
}

fn draw_help(frame: &mut Frame, area: Rect, app: &App, theme: &Theme, hints: &[ActionHint]) {
    let status = app.status.as_ref().map(|status| {
        let color = match status.tone {
            StatusTone::Success => theme.success,
            StatusTone::Error => theme.error,
        };
        (status.text.as_str(), Style::default().fg(color))
    });
    render_help_bar(
        frame,
        area,
        hints,
        status,
        Style::default().fg(theme.hint_key),
        theme.border(false),
    );
}

fn draw_sort_modal(frame: &mut Frame, area: Rect, modal: &SortModal, theme: &Theme) {
    let rows = SortColumn::ALL.len().max(SortDirection::ALL.len());
    let height = rows as u16 + 8;
    let layout = render_modal(
        frame,
        area,
        MODAL_WIDTH,
        height,
        1,
        " Sort ",
        theme.border(true),
    );

    let divider_width = layout.body.width as usize;
    let mut lines = vec![
        Line::from("Sort by column and order:"),
        Line::default(),
        Line::styled(
            format!("{:<width$}{}", "Column", "Order", width = MODAL_ORDER_COLUMN),
            theme.header(),
        ),
        Line::from("─".repeat(divider_width)),
    ];

    let active = Style::default()
        .fg(theme.border_active)
        .add_modifier(Modifier::BOLD);
    for idx in 0..rows {
        let column = SortColumn::from_index(idx).map(|column| {
            radio_item(
                column.label(),
                modal.column_cursor == idx,
                modal.axis == SortAxis::Columns,
            )
        });
        let order = SortDirection::from_index(idx).map(|direction| {
            radio_item(
                direction.label(),
                modal.order_cursor == idx,
                modal.axis == SortAxis::Order,
            )
        });

        let column_span = match column {
            Some((text, true)) => Span::styled(format!("{:<width$}", text, width = MODAL_ORDER_COLUMN), active),
            Some((text, false)) => Span::raw(format!("{:<width$}", text, width = MODAL_ORDER_COLUMN)),
            None => Span::raw(" ".repeat(MODAL_ORDER_COLUMN)),
        };
        let order_span = match order {
            Some((text, true)) => Span::styled(text, active),
            Some((text, false)) => Span::raw(text),
            None => Span::raw(""),
        };
        lines.push(Line::from(vec![column_span, order_span]));
    }

    frame.render_widget(Paragraph::new(lines), layout.body);

    let hints = keymap::modal_hints();
    let hint_refs: Vec<&ActionHint> = hints.iter().collect();
    let footer = Paragraph::new(Line::from(hint_spans(&hint_refs, Style::default().fg(theme.hint_key))))
        .alignment(Alignment::Center);
    frame.render_widget(footer, layout.footer);
}

/// `▶ ● Label` for the cursor of the active list, `  ○ Label` otherwise.
/// The flag tells whether the item is under the active cursor.
fn radio_item(label: &str, selected: bool, axis_active: bool) -> (String, bool) {
    let under_cursor = selected && axis_active;
    let marker = if under_cursor { "▶ " } else { "  " };
    let radio = if selected { "●" } else { "○" };
    (format!("{}{} {}", marker, radio, label), under_cursor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::tui::app::AppConfig;
    use crate::cli::tui::event::Event;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use ratatui::backend::TestBackend;
    use slowlog_core::{aggregate, RawQueryRecord, SlowLogRow};
    use std::path::PathBuf;

    fn sample_app(width: u16, height: u16) -> App {
        let records = [
            ("SELECT * FROM users WHERE id = 1", "00:00:02"),
            ("SELECT * FROM users WHERE id = 2", "00:00:04"),
            ("DELETE FROM sessions WHERE expires < 100", "00:00:01"),
        ]
        .into_iter()
        .zip(1u64..)
        .map(|((sql, time), id)| {
            RawQueryRecord::from_row(
                id,
                SlowLogRow {
                    db: "shop".to_string(),
                    sql_text: sql.to_string(),
                    query_time: time.to_string(),
                    rows_examined: 100,
                    ..SlowLogRow::default()
                },
            )
        });
        let mut app = App::new(aggregate(records), AppConfig::default());
        app.update(Event::Resize(width, height));
        app
    }

    fn press(app: &mut App, code: KeyCode) {
        app.update(Event::Key(KeyEvent::new(code, KeyModifiers::NONE)));
    }

    fn render(app: &App, width: u16, height: u16) -> (String, Buffer) {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal.draw(|frame| draw(frame, app, &Theme::default())).unwrap();
        let buffer = terminal.backend().buffer().clone();
        let mut text = String::new();
        for y in 0..height {
            for x in 0..width {
                text.push_str(buffer[(x, y)].symbol());
            }
            text.push('\n');
        }
        (text, buffer)
    }

    #[test]
    fn test_main_view_shows_table_and_help() {
        let app = sample_app(140, 30);
        let (text, _) = render(&app, 140, 30);
        assert!(text.contains("Slow Queries (2) - Count ↓"));
        assert!(text.contains("Avg Examined"));
        assert!(text.contains("SELECT"));
        assert!(text.contains("users"));
        assert!(text.contains("3.00s"));
        assert!(text.contains("[q] Quit"));
        assert!(text.contains("Highlight: ON"));
        assert!(text.contains(EMPTY_PREVIEW));
    }

    #[test]
    fn test_preview_after_select() {
        let mut app = sample_app(140, 30);
        press(&mut app, KeyCode::Enter);
        let (text, _) = render(&app, 140, 30);
        assert!(text.contains("SELECT | 2 queries | Avg: 3.00s, 100 rows examined, 0 sent"));
        assert!(text.contains("WHERE id = 2"));
        assert!(text.contains("---"));
    }

    #[test]
    fn test_focused_table_border_uses_active_color() {
        let mut app = sample_app(140, 30);
        let theme = Theme::default();
        let (_, buffer) = render(&app, 140, 30);
        assert_eq!(buffer[(0, 0)].fg, theme.border_active);

        press(&mut app, KeyCode::Tab);
        let (_, buffer) = render(&app, 140, 30);
        assert_eq!(buffer[(0, 0)].fg, theme.border_inactive);
    }

    #[test]
    fn test_zoomed_view_hides_table() {
        let mut app = sample_app(100, 24);
        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Char('z'));
        let (text, _) = render(&app, 100, 24);
        assert!(text.contains("[z] Unzoom  [h] Highlight  [q] Quit"));
        assert!(!text.contains("Avg Examined"));
        assert!(text.contains("2 queries"));
    }

    #[test]
    fn test_sort_modal_overlay() {
        let mut app = sample_app(120, 30);
        press(&mut app, KeyCode::Char('l'));
        press(&mut app, KeyCode::Down);
        let (text, _) = render(&app, 120, 30);
        assert!(text.contains("Sort by column and order:"));
        assert!(text.contains("  ○ Count"));
        assert!(text.contains("▶ ● Avg Time"));
        assert!(text.contains("  ● Descending"));
        assert!(text.contains("[Esc] Cancel"));
    }

    #[test]
    fn test_status_is_shown_in_help_bar() {
        let mut app = sample_app(140, 30);
        app.update(Event::SaveCompleted(Ok(PathBuf::from("query_1.sql"))));
        let (text, _) = render(&app, 140, 30);
        assert!(text.contains("Query saved!"));
    }

    #[test]
    fn test_tiny_terminal_renders() {
        let app = sample_app(10, 5);
        let (text, _) = render(&app, 10, 5);
        assert_eq!(text.lines().count(), 5);
    }
}
