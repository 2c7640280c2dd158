//! Confirmation dialog
//!
//! Purely presentational: whether it is shown and what it says is decided by the
//! booking form. Closed means nothing is drawn at all.

use crate::booking::DialogContent;
use crate::tui::{styles::Theme, utils::layout, Frame};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

const DIALOG_WIDTH: u16 = 44;
const DIALOG_HEIGHT: u16 = 9;
pub const CLOSE_LABEL: &str = "Close";

pub struct ConfirmationDialog<'a> {
    content: Option<&'a DialogContent>,
}

impl<'a> ConfirmationDialog<'a> {
    pub fn new(content: Option<&'a DialogContent>) -> Self {
        Self { content }
    }

    #[cfg(test)]
    pub fn is_open(&self) -> bool {
        self.content.is_some()
    }

    /// Draw the dialog centered in `area`
    pub fn render(&self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let Some(content) = self.content else {
            return;
        };

        let dialog_area = layout::centered_rect(DIALOG_WIDTH, DIALOG_HEIGHT, area);
        frame.render_widget(Clear, dialog_area);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(theme.focused_border_style())
            .style(theme.card_style());
        let inner = block.inner(dialog_area);
        frame.render_widget(block, dialog_area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1), // Title
                Constraint::Min(1),    // Message
                Constraint::Length(1), // Close button
            ])
            .split(inner);

        let title = Paragraph::new(content.title.as_str())
            .style(theme.heading_style())
            .alignment(Alignment::Center);
        frame.render_widget(title, chunks[0]);

        let message = Paragraph::new(content.message.as_str())
            .style(theme.dim_style())
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });
        frame.render_widget(message, chunks[1]);

        let button = Paragraph::new(Line::from(Span::styled(
            format!(" {} ", CLOSE_LABEL),
            theme.button_style(true, true),
        )))
        .alignment(Alignment::Center);
        frame.render_widget(button, chunks[2]);
    }
}
