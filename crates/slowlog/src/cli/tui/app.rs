//! Dashboard state machine
//!
//! `App::update` is the only place dashboard state changes. It never touches
//! the terminal or the file system: side effects are returned as [`Effect`]s
//! and the event loop runs them.

use std::path::PathBuf;
use std::time::Duration;

use crossterm::event::KeyEvent;
use serde::{Deserialize, Serialize};
use slowlog_core::format::{
    format_for_display, format_rows, format_seconds, query_column_width, summary_cells,
};
use slowlog_core::{
    highlight_sql, plain_sql, sort_view, split_lines, Fragment, QueryGroup, SortColumn,
    SortDirection, SortSpec,
};

use super::event::Event;
use super::keymap::{self, Action, ModalAction};

/// Rows used by the help panel and the panel borders.
pub const CHROME_HEIGHT: u16 = 8;
/// Rows around the zoomed preview text: its border plus the help panel.
pub const ZOOM_CHROME_HEIGHT: u16 = 5;
pub const SAVED_STATUS: &str = "Query saved!";
const EXAMPLE_SEPARATOR: &str = "\n---\n";

/// Side effects requested by [`App::update`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    Quit,
    WriteFile { path: PathBuf, contents: String },
    ScheduleStatusClear(Duration),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    #[default]
    Table,
    Preview,
}

impl Focus {
    fn other(self) -> Self {
        match self {
            Focus::Table => Focus::Preview,
            Focus::Preview => Focus::Table,
        }
    }
}

/// Preview coloring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HighlightMode {
    Off,
    #[default]
    Simple,
}

impl HighlightMode {
    pub fn toggled(self) -> Self {
        match self {
            HighlightMode::Off => HighlightMode::Simple,
            HighlightMode::Simple => HighlightMode::Off,
        }
    }

    /// Help panel wording.
    pub fn label(self) -> &'static str {
        match self {
            HighlightMode::Off => "OFF",
            HighlightMode::Simple => "ON",
        }
    }

    /// Config file wording.
    pub fn as_str(self) -> &'static str {
        match self {
            HighlightMode::Off => "off",
            HighlightMode::Simple => "simple",
        }
    }
}

/// Which list of the sort modal the arrow keys move in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortAxis {
    #[default]
    Columns,
    Order,
}

impl SortAxis {
    fn toggled(self) -> Self {
        match self {
            SortAxis::Columns => SortAxis::Order,
            SortAxis::Order => SortAxis::Columns,
        }
    }
}

/// Open sort modal. The cursors are the candidate column and direction;
/// nothing is applied until Enter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortModal {
    pub axis: SortAxis,
    pub column_cursor: usize,
    pub order_cursor: usize,
}

impl SortModal {
    fn open(current: SortSpec) -> Self {
        Self {
            axis: SortAxis::Columns,
            column_cursor: current.column.index(),
            order_cursor: current.direction.index(),
        }
    }

    pub fn candidate(&self) -> SortSpec {
        SortSpec::new(
            SortColumn::from_index(self.column_cursor).unwrap_or_default(),
            SortDirection::from_index(self.order_cursor).unwrap_or_default(),
        )
    }

    fn navigate(&mut self, action: ModalAction) {
        let (cursor, len) = match self.axis {
            SortAxis::Columns => (&mut self.column_cursor, SortColumn::ALL.len()),
            SortAxis::Order => (&mut self.order_cursor, SortDirection::ALL.len()),
        };
        match action {
            ModalAction::Up => *cursor = cursor.saturating_sub(1),
            ModalAction::Down => *cursor = (*cursor + 1).min(len - 1),
            ModalAction::SwitchAxis => self.axis = self.axis.toggled(),
            ModalAction::ColumnAxis => self.axis = SortAxis::Columns,
            ModalAction::OrderAxis => self.axis = SortAxis::Order,
            ModalAction::Apply | ModalAction::Cancel => {}
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusTone {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub text: String,
    pub tone: StatusTone,
}

/// Panel sizes derived from the terminal size.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PanelLayout {
    pub width: u16,
    pub height: u16,
    pub panel_width: u16,
    /// Text rows of the table panel, header included
    pub table_height: u16,
    /// Text rows of the preview panel
    pub preview_height: u16,
}

impl PanelLayout {
    pub fn for_terminal(width: u16, height: u16) -> Self {
        let remaining = height.saturating_sub(CHROME_HEIGHT);
        let table_height = remaining / 2;
        Self {
            width,
            height,
            panel_width: width.saturating_sub(2),
            table_height,
            preview_height: remaining - table_height,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct TableView {
    /// Display cells in current sort order
    pub rows: Vec<[String; 9]>,
    pub cursor: usize,
    pub offset: usize,
    pub focused: bool,
    pub query_width: usize,
}

/// First line of the preview: bold query type, then the summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewHeader {
    pub query_type: String,
    pub summary: String,
}

#[derive(Debug, Clone, Default)]
pub struct Preview {
    /// Index into the group list, stable across re-sorts
    pub group: Option<usize>,
    /// Table row the preview was opened from
    pub selected_row: Option<usize>,
    pub header: Option<PreviewHeader>,
    pub lines: Vec<Vec<Fragment>>,
    pub scroll: usize,
}

impl Preview {
    /// Header and blank line included.
    pub fn line_count(&self) -> usize {
        match self.header {
            Some(_) => self.lines.len() + 2,
            None => self.lines.len(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub save_dir: PathBuf,
    pub status_ttl: Duration,
    pub highlight: HighlightMode,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            save_dir: PathBuf::from("."),
            status_ttl: Duration::from_millis(1500),
            highlight: HighlightMode::Simple,
        }
    }
}

/// Dashboard state
pub struct App {
    pub running: bool,
    groups: Vec<QueryGroup>,
    view: Vec<usize>,
    pub sort: SortSpec,
    pub focus: Focus,
    focus_before_zoom: Focus,
    pub zoomed: bool,
    pub highlight: HighlightMode,
    pub sort_modal: Option<SortModal>,
    pub table: TableView,
    pub preview: Preview,
    pub status: Option<StatusMessage>,
    pub layout: PanelLayout,
    /// Why terminal input stopped, if it did
    pub input_lost: Option<String>,
    config: AppConfig,
}

impl App {
    pub fn new(groups: Vec<QueryGroup>, config: AppConfig) -> Self {
        let sort = SortSpec::default();
        let mut view: Vec<usize> = (0..groups.len()).collect();
        sort_view(&groups, &mut view, sort);

        let mut app = Self {
            running: true,
            groups,
            view,
            sort,
            focus: Focus::Table,
            focus_before_zoom: Focus::Table,
            zoomed: false,
            highlight: config.highlight,
            sort_modal: None,
            table: TableView {
                focused: true,
                ..TableView::default()
            },
            preview: Preview::default(),
            status: None,
            layout: PanelLayout::default(),
            input_lost: None,
            config,
        };
        app.rebuild_rows();
        app
    }

    pub fn group_at_row(&self, row: usize) -> Option<&QueryGroup> {
        self.view.get(row).and_then(|&idx| self.groups.get(idx))
    }

    /// Data rows visible in the table panel.
    pub fn visible_table_rows(&self) -> usize {
        (self.layout.table_height as usize).saturating_sub(1).max(1)
    }

    /// Text rows visible in the preview panel.
    pub fn preview_viewport_height(&self) -> usize {
        let rows = if self.zoomed {
            self.layout.height.saturating_sub(ZOOM_CHROME_HEIGHT)
        } else {
            self.layout.preview_height
        };
        rows as usize
    }

    pub fn update(&mut self, event: Event) -> Vec<Effect> {
        match event {
            Event::Key(key) => self.handle_key(key),
            Event::Resize(width, height) => {
                self.resize(width, height);
                Vec::new()
            }
            Event::StatusExpired => {
                self.status = None;
                Vec::new()
            }
            Event::SaveCompleted(result) => self.finish_save(result),
            Event::InputLost(reason) => {
                self.input_lost = Some(reason);
                self.quit()
            }
        }
    }

    fn handle_key(&mut self, key: KeyEvent) -> Vec<Effect> {
        let action = keymap::resolve(key);
        if self.sort_modal.is_none() {
            return action.map(|action| self.handle_action(action)).unwrap_or_default();
        }

        // Global keys run first; the modal then consumes whatever it binds.
        let effects = match action {
            Some(action) if action.is_global() => self.handle_action(action),
            _ => Vec::new(),
        };
        if self.running && self.sort_modal.is_some() {
            if let Some(modal_action) = keymap::resolve_modal(key) {
                self.handle_modal(modal_action);
            }
        }
        effects
    }

    fn handle_action(&mut self, action: Action) -> Vec<Effect> {
        match action {
            Action::Quit => return self.quit(),
            Action::Save => return self.save_current(),
            Action::SwitchFocus => self.switch_focus(),
            Action::Select => self.select_current(),
            Action::ToggleHighlight => {
                self.highlight = self.highlight.toggled();
                self.refresh_preview();
            }
            Action::ToggleZoom => self.toggle_zoom(),
            Action::OpenSort => {
                if self.sort_modal.is_none() {
                    self.sort_modal = Some(SortModal::open(self.sort));
                }
            }
            Action::Up
            | Action::Down
            | Action::PageUp
            | Action::PageDown
            | Action::Top
            | Action::Bottom => match self.focus {
                Focus::Table => self.move_cursor(action),
                Focus::Preview => self.scroll_preview(action),
            },
        }
        Vec::new()
    }

    fn handle_modal(&mut self, action: ModalAction) {
        match action {
            ModalAction::Apply => {
                if let Some(modal) = self.sort_modal.take() {
                    self.apply_sort(modal.candidate());
                }
            }
            ModalAction::Cancel => self.sort_modal = None,
            other => {
                if let Some(modal) = self.sort_modal.as_mut() {
                    modal.navigate(other);
                }
            }
        }
    }

    fn quit(&mut self) -> Vec<Effect> {
        self.running = false;
        vec![Effect::Quit]
    }

    fn switch_focus(&mut self) {
        self.focus = self.focus.other();
        self.table.focused = self.focus == Focus::Table;
    }

    fn toggle_zoom(&mut self) {
        if self.zoomed {
            self.zoomed = false;
            self.focus = self.focus_before_zoom;
        } else {
            self.focus_before_zoom = self.focus;
            self.zoomed = true;
            self.focus = Focus::Preview;
        }
        self.table.focused = self.focus == Focus::Table;
        self.clamp_preview_scroll();
    }

    fn select_current(&mut self) {
        if self.focus != Focus::Table {
            return;
        }
        let row = self.table.cursor;
        let Some(&group) = self.view.get(row) else {
            return;
        };
        self.preview.group = Some(group);
        self.preview.selected_row = Some(row);
        self.preview.scroll = 0;
        self.refresh_preview();
    }

    fn save_current(&self) -> Vec<Effect> {
        let row = self.table.cursor;
        let Some(first) = self.group_at_row(row).and_then(|group| group.first_example()) else {
            return Vec::new();
        };
        vec![Effect::WriteFile {
            path: self.config.save_dir.join(format!("query_{}.sql", row + 1)),
            contents: first.sql_text.clone(),
        }]
    }

    fn finish_save(&mut self, result: Result<PathBuf, String>) -> Vec<Effect> {
        self.status = Some(match result {
            Ok(_) => StatusMessage {
                text: SAVED_STATUS.to_string(),
                tone: StatusTone::Success,
            },
            Err(err) => StatusMessage {
                text: format!("Save failed: {}", err),
                tone: StatusTone::Error,
            },
        });
        vec![Effect::ScheduleStatusClear(self.config.status_ttl)]
    }

    fn apply_sort(&mut self, spec: SortSpec) {
        self.sort = spec;
        sort_view(&self.groups, &mut self.view, spec);
        self.table.cursor = 0;
        self.table.offset = 0;
        self.rebuild_rows();
    }

    fn resize(&mut self, width: u16, height: u16) {
        self.layout = PanelLayout::for_terminal(width, height);
        sort_view(&self.groups, &mut self.view, self.sort);
        self.rebuild_rows();
        self.table.cursor = self.table.cursor.min(self.table.rows.len().saturating_sub(1));
        self.scroll_table_to_cursor();
        self.refresh_preview();
    }

    fn rebuild_rows(&mut self) {
        let query_width = query_column_width(self.layout.panel_width as usize);
        self.table.query_width = query_width;
        self.table.rows = self
            .view
            .iter()
            .enumerate()
            .map(|(row, &idx)| summary_cells(row + 1, &self.groups[idx], query_width))
            .collect();
    }

    fn move_cursor(&mut self, action: Action) {
        let len = self.table.rows.len();
        if len == 0 {
            return;
        }
        let last = len - 1;
        let page = self.visible_table_rows();
        let cursor = self.table.cursor;
        self.table.cursor = match action {
            Action::Up => cursor.saturating_sub(1),
            Action::Down => (cursor + 1).min(last),
            Action::PageUp => cursor.saturating_sub(page),
            Action::PageDown => (cursor + page).min(last),
            Action::Top => 0,
            Action::Bottom => last,
            _ => cursor,
        };
        self.scroll_table_to_cursor();
    }

    fn scroll_table_to_cursor(&mut self) {
        let page = self.visible_table_rows();
        let cursor = self.table.cursor;
        if cursor < self.table.offset {
            self.table.offset = cursor;
        } else if cursor >= self.table.offset + page {
            self.table.offset = cursor + 1 - page;
        }
    }

    fn max_preview_scroll(&self) -> usize {
        self.preview
            .line_count()
            .saturating_sub(self.preview_viewport_height())
    }

    fn scroll_preview(&mut self, action: Action) {
        let max = self.max_preview_scroll();
        let page = self.preview_viewport_height().max(1);
        let scroll = self.preview.scroll;
        self.preview.scroll = match action {
            Action::Up => scroll.saturating_sub(1),
            Action::Down => (scroll + 1).min(max),
            Action::PageUp => scroll.saturating_sub(page),
            Action::PageDown => (scroll + page).min(max),
            Action::Top => 0,
            Action::Bottom => max,
            _ => scroll,
        };
    }

    fn clamp_preview_scroll(&mut self) {
        self.preview.scroll = self.preview.scroll.min(self.max_preview_scroll());
    }

    fn refresh_preview(&mut self) {
        let Some(group) = self.preview.group.and_then(|idx| self.groups.get(idx)) else {
            self.preview.header = None;
            self.preview.lines.clear();
            self.preview.scroll = 0;
            return;
        };
        let (header, lines) = build_preview(group, self.highlight);
        self.preview.header = Some(header);
        self.preview.lines = lines;
        self.clamp_preview_scroll();
    }
}

/// Header and body lines for one group.
pub fn build_preview(group: &QueryGroup, highlight: HighlightMode) -> (PreviewHeader, Vec<Vec<Fragment>>) {
    let header = PreviewHeader {
        query_type: group.query_type().to_string(),
        summary: format!(
            " | {} queries | Avg: {}, {} rows examined, {} sent",
            group.count(),
            format_seconds(group.avg_query_time()),
            format_rows(group.avg_rows_examined()),
            format_rows(group.avg_rows_sent()),
        ),
    };

    let body = group
        .examples()
        .iter()
        .map(|q| format_for_display(&q.sql_text))
        .collect::<Vec<_>>()
        .join(EXAMPLE_SEPARATOR);
    let fragments = match highlight {
        HighlightMode::Simple => highlight_sql(&body),
        HighlightMode::Off => plain_sql(&body),
    };

    (header, split_lines(&fragments))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyModifiers};
    use slowlog_core::{aggregate, RawQueryRecord, SlowLogRow, SqlToken};

    fn record(id: u64, sql: &str, time: &str, examined: u64, sent: u64) -> RawQueryRecord {
        RawQueryRecord::from_row(
            id,
            SlowLogRow {
                db: "shop".to_string(),
                sql_text: sql.to_string(),
                query_time: time.to_string(),
                rows_examined: examined,
                rows_sent: sent,
                ..SlowLogRow::default()
            },
        )
    }

    /// Three groups: SELECT (2 rows, 3s avg), UPDATE (1 row, 10s), DELETE (3 rows, 1s).
    fn sample_groups() -> Vec<QueryGroup> {
        aggregate([
            record(1, "SELECT * FROM users WHERE id = 1", "00:00:02", 100, 1),
            record(2, "SELECT * FROM users WHERE id = 2", "00:00:04", 300, 1),
            record(3, "UPDATE orders SET paid = 1 WHERE id = 5", "00:00:10", 50, 0),
            record(4, "DELETE FROM sessions WHERE expires < 100", "00:00:01", 10, 0),
            record(5, "DELETE FROM sessions WHERE expires < 200", "00:00:01", 20, 0),
            record(6, "DELETE FROM sessions WHERE expires < 300", "00:00:01", 30, 0),
        ])
    }

    fn app() -> App {
        let mut app = App::new(sample_groups(), AppConfig::default());
        app.update(Event::Resize(120, 20));
        app
    }

    fn press(app: &mut App, code: KeyCode) -> Vec<Effect> {
        app.update(Event::Key(KeyEvent::new(code, KeyModifiers::NONE)))
    }

    fn row_types(app: &App) -> Vec<String> {
        app.table.rows.iter().map(|row| row[1].clone()).collect()
    }

    fn line_text(line: &[Fragment]) -> String {
        line.iter().map(|f| f.text.as_str()).collect()
    }

    #[test]
    fn test_initial_state() {
        let app = App::new(sample_groups(), AppConfig::default());
        assert!(app.running);
        assert_eq!(app.focus, Focus::Table);
        assert!(app.table.focused);
        assert!(!app.zoomed);
        assert!(app.sort_modal.is_none());
        assert!(app.status.is_none());
        assert_eq!(app.highlight, HighlightMode::Simple);
        assert_eq!(app.sort, SortSpec::default());
        assert_eq!(row_types(&app), vec!["DELETE", "SELECT", "UPDATE"]);
    }

    #[test]
    fn test_resize_layout() {
        let mut app = App::new(sample_groups(), AppConfig::default());
        app.update(Event::Resize(120, 40));
        assert_eq!(app.layout.table_height, 16);
        assert_eq!(app.layout.preview_height, 16);
        assert_eq!(app.layout.panel_width, 118);
        assert_eq!(app.table.query_width, 18);

        app.update(Event::Resize(120, 41));
        assert_eq!(app.layout.table_height, 16);
        assert_eq!(app.layout.preview_height, 17);
    }

    #[test]
    fn test_tiny_terminal_does_not_underflow() {
        let mut app = App::new(sample_groups(), AppConfig::default());
        app.update(Event::Resize(1, 3));
        assert_eq!(app.layout.table_height, 0);
        assert_eq!(app.layout.preview_height, 0);
        assert_eq!(app.layout.panel_width, 0);
        press(&mut app, KeyCode::PageDown);
        assert_eq!(app.table.cursor, 1);
    }

    #[test]
    fn test_cursor_moves_within_bounds() {
        let mut app = app();
        press(&mut app, KeyCode::Up);
        assert_eq!(app.table.cursor, 0);
        press(&mut app, KeyCode::Char('j'));
        assert_eq!(app.table.cursor, 1);
        press(&mut app, KeyCode::End);
        assert_eq!(app.table.cursor, 2);
        press(&mut app, KeyCode::Down);
        assert_eq!(app.table.cursor, 2);
        press(&mut app, KeyCode::Char('g'));
        assert_eq!(app.table.cursor, 0);
    }

    #[test]
    fn test_resize_clamps_cursor_and_keeps_offset_valid() {
        let mut app = app();
        press(&mut app, KeyCode::End);
        app.update(Event::Resize(120, 11));
        assert_eq!(app.visible_table_rows(), 1);
        assert_eq!(app.table.offset, 2);
        assert_eq!(app.table.cursor, 2);
    }

    #[test]
    fn test_empty_app_ignores_navigation_and_save() {
        let mut app = App::new(Vec::new(), AppConfig::default());
        app.update(Event::Resize(80, 24));
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.table.cursor, 0);
        assert!(app.preview.group.is_none());
        assert!(press(&mut app, KeyCode::Char('s')).is_empty());
        assert!(app.status.is_none());
    }

    #[test]
    fn test_tab_switches_focus() {
        let mut app = app();
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.focus, Focus::Preview);
        assert!(!app.table.focused);
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.focus, Focus::Table);
        assert!(app.table.focused);
    }

    #[test]
    fn test_zoom_twice_restores_focus() {
        let mut app = app();
        press(&mut app, KeyCode::Char('z'));
        assert!(app.zoomed);
        assert_eq!(app.focus, Focus::Preview);
        assert!(!app.table.focused);

        press(&mut app, KeyCode::Char('z'));
        assert!(!app.zoomed);
        assert_eq!(app.focus, Focus::Table);
        assert!(app.table.focused);
    }

    #[test]
    fn test_tab_switches_focus_while_zoomed() {
        let mut app = app();
        press(&mut app, KeyCode::Char('z'));
        press(&mut app, KeyCode::Tab);
        assert!(app.zoomed);
        assert_eq!(app.focus, Focus::Table);
        assert!(app.table.focused);

        // leaving zoom restores the focus held before it
        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Char('z'));
        assert_eq!(app.focus, Focus::Table);
    }

    #[test]
    fn test_zoom_from_preview_returns_to_preview() {
        let mut app = app();
        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Char('z'));
        press(&mut app, KeyCode::Char('z'));
        assert_eq!(app.focus, Focus::Preview);
        assert!(!app.table.focused);
    }

    #[test]
    fn test_select_builds_preview() {
        let mut app = app();
        press(&mut app, KeyCode::Enter);

        assert_eq!(app.preview.group, Some(2));
        assert_eq!(app.preview.selected_row, Some(0));
        assert_eq!(app.preview.scroll, 0);
        assert_eq!(
            app.preview.header,
            Some(PreviewHeader {
                query_type: "DELETE".to_string(),
                summary: " | 3 queries | Avg: 1.00s, 20 rows examined, 0 sent".to_string(),
            })
        );

        let lines: Vec<String> = app.preview.lines.iter().map(|l| line_text(l)).collect();
        assert_eq!(lines.len(), 8);
        assert_eq!(lines[0], "DELETE FROM sessions ");
        assert_eq!(lines[1], "WHERE expires < 100");
        assert_eq!(lines[2], "---");
        assert_eq!(lines[7], "WHERE expires < 300");
        assert_eq!(app.preview.line_count(), 10);
    }

    #[test]
    fn test_select_ignored_with_preview_focus() {
        let mut app = app();
        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Enter);
        assert!(app.preview.group.is_none());
        assert!(app.preview.header.is_none());
    }

    #[test]
    fn test_highlight_toggle_rebuilds_same_group() {
        let mut app = app();
        press(&mut app, KeyCode::Enter);
        let tagged = app.preview.lines[0]
            .iter()
            .any(|f| f.token == Some(SqlToken::Keyword) && f.text == "FROM");
        assert!(tagged);

        press(&mut app, KeyCode::Char('h'));
        assert_eq!(app.highlight, HighlightMode::Off);
        assert_eq!(app.preview.group, Some(2));
        assert!(app
            .preview
            .lines
            .iter()
            .flatten()
            .all(|f| f.token.is_none()));

        press(&mut app, KeyCode::Char('h'));
        assert_eq!(app.highlight, HighlightMode::Simple);
    }

    #[test]
    fn test_preview_scrolls_with_preview_focus() {
        let mut app = app();
        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Tab);

        // 10 lines in a 6 row viewport
        for _ in 0..10 {
            press(&mut app, KeyCode::Down);
        }
        assert_eq!(app.preview.scroll, 4);
        assert_eq!(app.table.cursor, 0);

        press(&mut app, KeyCode::Home);
        assert_eq!(app.preview.scroll, 0);
        press(&mut app, KeyCode::PageDown);
        assert_eq!(app.preview.scroll, 4);

        // zoomed viewport shows everything
        press(&mut app, KeyCode::Char('z'));
        assert_eq!(app.preview_viewport_height(), 15);
        assert_eq!(app.preview.scroll, 0);
    }

    #[test]
    fn test_save_emits_write_effect() {
        let config = AppConfig {
            save_dir: PathBuf::from("/tmp/out"),
            ..AppConfig::default()
        };
        let mut app = App::new(sample_groups(), config);
        press(&mut app, KeyCode::Down);

        let effects = press(&mut app, KeyCode::Char('s'));
        assert_eq!(
            effects,
            vec![Effect::WriteFile {
                path: PathBuf::from("/tmp/out/query_2.sql"),
                contents: "SELECT * FROM users WHERE id = 1".to_string(),
            }]
        );
        assert!(app.status.is_none());
    }

    #[test]
    fn test_save_completion_sets_status_and_schedules_clear() {
        let mut app = app();
        let effects = app.update(Event::SaveCompleted(Ok(PathBuf::from("query_1.sql"))));
        assert_eq!(
            effects,
            vec![Effect::ScheduleStatusClear(Duration::from_millis(1500))]
        );
        assert_eq!(
            app.status,
            Some(StatusMessage {
                text: SAVED_STATUS.to_string(),
                tone: StatusTone::Success,
            })
        );

        app.update(Event::StatusExpired);
        assert!(app.status.is_none());
    }

    #[test]
    fn test_save_failure_is_error_status() {
        let mut app = app();
        let effects = app.update(Event::SaveCompleted(Err("permission denied".to_string())));
        assert_eq!(effects.len(), 1);
        let status = app.status.unwrap();
        assert_eq!(status.tone, StatusTone::Error);
        assert!(status.text.contains("permission denied"));
    }

    #[test]
    fn test_quit_keys() {
        let mut app = app();
        assert_eq!(press(&mut app, KeyCode::Char('q')), vec![Effect::Quit]);
        assert!(!app.running);

        let mut app = self::app();
        let effects = app.update(Event::Key(KeyEvent::new(
            KeyCode::Char('c'),
            KeyModifiers::CONTROL,
        )));
        assert_eq!(effects, vec![Effect::Quit]);
    }

    #[test]
    fn test_lost_input_quits() {
        let mut app = app();
        let effects = app.update(Event::InputLost("tty gone".to_string()));
        assert_eq!(effects, vec![Effect::Quit]);
        assert!(!app.running);
        assert_eq!(app.input_lost.as_deref(), Some("tty gone"));
    }

    #[test]
    fn test_sort_modal_cancel_discards_candidates() {
        let mut app = app();
        let rows_before = app.table.rows.clone();

        press(&mut app, KeyCode::Char('l'));
        assert!(app.sort_modal.is_some());
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Down);
        assert_eq!(app.sort_modal.unwrap().column_cursor, 2);
        press(&mut app, KeyCode::Esc);

        assert!(app.sort_modal.is_none());
        assert_eq!(app.sort, SortSpec::default());
        assert_eq!(app.table.rows, rows_before);
    }

    #[test]
    fn test_sort_modal_apply_commits_column_and_direction() {
        let mut app = app();
        press(&mut app, KeyCode::Down);

        press(&mut app, KeyCode::Char('l'));
        press(&mut app, KeyCode::Down); // Avg Time
        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Up); // Ascending
        assert_eq!(
            app.sort_modal.unwrap().candidate(),
            SortSpec::new(SortColumn::AvgTime, SortDirection::Ascending)
        );
        // sort is untouched until Enter
        assert_eq!(app.sort, SortSpec::default());

        press(&mut app, KeyCode::Enter);
        assert!(app.sort_modal.is_none());
        assert_eq!(
            app.sort,
            SortSpec::new(SortColumn::AvgTime, SortDirection::Ascending)
        );
        assert_eq!(row_types(&app), vec!["DELETE", "SELECT", "UPDATE"]);
        assert_eq!(app.table.cursor, 0);

        press(&mut app, KeyCode::Char('l'));
        press(&mut app, KeyCode::Right);
        press(&mut app, KeyCode::Down); // Descending
        press(&mut app, KeyCode::Enter);
        assert_eq!(row_types(&app), vec!["UPDATE", "SELECT", "DELETE"]);
        assert_eq!(app.table.rows[0][0], "1");
    }

    #[test]
    fn test_sort_modal_cursor_bounds() {
        let mut app = app();
        press(&mut app, KeyCode::Char('l'));
        press(&mut app, KeyCode::Up);
        assert_eq!(app.sort_modal.unwrap().column_cursor, 0);
        for _ in 0..10 {
            press(&mut app, KeyCode::Char('j'));
        }
        assert_eq!(app.sort_modal.unwrap().column_cursor, 6);

        press(&mut app, KeyCode::Right);
        assert_eq!(app.sort_modal.unwrap().axis, SortAxis::Order);
        for _ in 0..3 {
            press(&mut app, KeyCode::Down);
        }
        assert_eq!(app.sort_modal.unwrap().order_cursor, 1);
        press(&mut app, KeyCode::Left);
        assert_eq!(app.sort_modal.unwrap().axis, SortAxis::Columns);
    }

    #[test]
    fn test_global_keys_run_while_modal_open() {
        let mut app = app();
        press(&mut app, KeyCode::Char('l'));

        press(&mut app, KeyCode::Char('h'));
        assert_eq!(app.highlight, HighlightMode::Off);

        let effects = press(&mut app, KeyCode::Char('s'));
        assert!(matches!(
            effects.as_slice(),
            [Effect::WriteFile { contents, .. }] if contents == "DELETE FROM sessions WHERE expires < 100"
        ));

        // Tab switches the panel and the modal axis together
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.focus, Focus::Preview);
        assert_eq!(app.sort_modal.unwrap().axis, SortAxis::Order);

        press(&mut app, KeyCode::Char('z'));
        assert!(app.zoomed);
        assert!(app.sort_modal.is_some());

        assert_eq!(press(&mut app, KeyCode::Char('q')), vec![Effect::Quit]);
    }

    #[test]
    fn test_modal_keeps_candidates_when_reopened() {
        let mut app = app();
        press(&mut app, KeyCode::Char('l'));
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Char('l'));
        assert_eq!(app.sort_modal.unwrap().column_cursor, 1);
    }

    #[test]
    fn test_modal_navigation_does_not_move_table() {
        let mut app = app();
        press(&mut app, KeyCode::Char('l'));
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::End);
        assert_eq!(app.table.cursor, 0);
        assert_eq!(app.sort_modal.unwrap().column_cursor, 1);
    }

    #[test]
    fn test_enter_in_modal_selects_then_applies() {
        let mut app = app();
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Char('l'));
        press(&mut app, KeyCode::Enter);

        assert!(app.sort_modal.is_none());
        let group = app.preview.group.unwrap();
        assert_eq!(app.groups[group].query_type(), "SELECT");
        assert_eq!(app.table.cursor, 0);
    }

    #[test]
    fn test_preview_follows_group_across_resort() {
        let mut app = app();
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.preview.group, Some(0));

        press(&mut app, KeyCode::Char('l'));
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Enter);
        app.update(Event::Resize(100, 30));

        let group = app.preview.group.unwrap();
        assert_eq!(app.groups[group].query_type(), "SELECT");
        assert_eq!(app.preview.header.as_ref().unwrap().query_type, "SELECT");
    }
}
