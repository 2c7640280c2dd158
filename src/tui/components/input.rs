use crate::tui::{
    styles::Theme,
    utils::text::{display_width, tail_fitting},
    Frame,
};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    widgets::{Block, Borders, Paragraph},
};

/// Labelled single-line text box with an inline error underneath.
///
/// Occupies five rows: label, a bordered input box and the error line.
pub struct TextField<'a> {
    label: &'a str,
    placeholder: &'a str,
    value: &'a str,
    error: Option<&'a str>,
    focused: bool,
}

impl<'a> TextField<'a> {
    pub fn new(label: &'a str, placeholder: &'a str, value: &'a str) -> Self {
        Self {
            label,
            placeholder,
            value,
            error: None,
            focused: false,
        }
    }

    pub fn error(mut self, error: Option<&'a str>) -> Self {
        self.error = error;
        self
    }

    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Length(3), Constraint::Length(1)])
            .split(area);

        frame.render_widget(Paragraph::new(self.label).style(theme.heading_style()), chunks[0]);

        let border = match (self.error.is_some(), self.focused) {
            (true, _) => theme.error_style(),
            (false, true) => theme.focused_border_style(),
            (false, false) => theme.border_style(),
        };
        let block = Block::default().borders(Borders::ALL).border_style(border);
        let visible_width = block.inner(chunks[1]).width;

        let input = if self.value.is_empty() {
            Paragraph::new(self.placeholder).style(theme.placeholder_style())
        } else {
            Paragraph::new(tail_fitting(self.value, visible_width.saturating_sub(1))).style(theme.card_style())
        };
        frame.render_widget(input.block(block), chunks[1]);

        if let Some(error) = self.error {
            frame.render_widget(Paragraph::new(error).style(theme.error_style()), chunks[2]);
        }
    }

    /// Where the terminal cursor sits for a field rendered in `area`
    pub fn cursor_in(area: Rect, value: &str) -> (u16, u16) {
        let inner_width = area.width.saturating_sub(2);
        let typed = tail_fitting(value, inner_width.saturating_sub(1));
        (area.x + 1 + display_width(typed), area.y + 2)
    }
}
