//! Colors and styles for the dashboard.
//!
//! A `Theme` is a plain value handed to the renderer; nothing here is global.

use ratatui::style::{Color, Modifier, Style};
use slowlog_core::SqlToken;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    pub border_active: Color,
    pub border_inactive: Color,
    pub selected_fg: Color,
    pub selected_bg: Color,
    pub header_fg: Color,
    pub keyword: Color,
    pub string: Color,
    pub operator: Color,
    pub number: Color,
    pub comment: Color,
    pub success: Color,
    pub error: Color,
    pub hint_key: Color,
    pub muted: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            border_active: Color::Rgb(0x00, 0xaf, 0xff),
            border_inactive: Color::Rgb(0x44, 0x44, 0x44),
            selected_fg: Color::Rgb(0x1a, 0x1a, 0x1a),
            selected_bg: Color::Rgb(0x00, 0xaf, 0xff),
            header_fg: Color::Rgb(0x00, 0xaf, 0xff),
            keyword: Color::Indexed(4),
            string: Color::Indexed(3),
            operator: Color::Indexed(1),
            number: Color::Indexed(5),
            comment: Color::Indexed(8),
            success: Color::Rgb(0x00, 0xd7, 0x00),
            error: Color::Rgb(0xff, 0x5f, 0x5f),
            hint_key: Color::Rgb(0x00, 0xaf, 0xff),
            muted: Color::Rgb(0x80, 0x80, 0x80),
        }
    }
}

impl Theme {
    pub fn border(&self, active: bool) -> Style {
        let color = if active {
            self.border_active
        } else {
            self.border_inactive
        };
        Style::default().fg(color)
    }

    pub fn selected_row(&self) -> Style {
        Style::default()
            .fg(self.selected_fg)
            .bg(self.selected_bg)
            .add_modifier(Modifier::BOLD)
    }

    pub fn header(&self) -> Style {
        Style::default()
            .fg(self.header_fg)
            .add_modifier(Modifier::BOLD)
    }

    /// Style of one highlighted SQL fragment; untagged text is unstyled.
    pub fn token(&self, token: Option<SqlToken>) -> Style {
        match token {
            None => Style::default(),
            Some(SqlToken::Keyword) => Style::default().fg(self.keyword),
            Some(SqlToken::String) => Style::default().fg(self.string),
            Some(SqlToken::Operator) => Style::default().fg(self.operator),
            Some(SqlToken::Number) => Style::default().fg(self.number),
            Some(SqlToken::Comment) => Style::default()
                .fg(self.comment)
                .add_modifier(Modifier::ITALIC),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_border_follows_focus() {
        let theme = Theme::default();
        assert_eq!(theme.border(true).fg, Some(theme.border_active));
        assert_eq!(theme.border(false).fg, Some(theme.border_inactive));
    }

    #[test]
    fn test_comment_is_italic() {
        let style = Theme::default().token(Some(SqlToken::Comment));
        assert!(style.add_modifier.contains(Modifier::ITALIC));
        assert_eq!(Theme::default().token(None), Style::default());
    }
}
