/// Layout utilities for TUI components
pub mod layout {
    use ratatui::layout::{Constraint, Direction, Layout, Rect};

    /// Create a centered rectangle with given width and height, clamped to `area`
    pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
        let width = width.min(area.width);
        let height = height.min(area.height);

        let popup_layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length((area.height - height) / 2),
                Constraint::Length(height),
                Constraint::Min(0),
            ])
            .split(area);

        Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Length((area.width - width) / 2),
                Constraint::Length(width),
                Constraint::Min(0),
            ])
            .split(popup_layout[1])[1]
    }

    /// Horizontally center a column of at most `width` cells
    pub fn centered_column(width: u16, area: Rect) -> Rect {
        let width = width.min(area.width);
        Rect {
            x: area.x + (area.width - width) / 2,
            width,
            ..area
        }
    }
}

/// Text utilities for fitting input into fixed-width boxes
pub mod text {
    use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

    /// Display width of `text` in terminal cells
    pub fn display_width(text: &str) -> u16 {
        u16::try_from(text.width()).unwrap_or(u16::MAX)
    }

    /// The trailing part of `text` that fits in `max_width` cells, so the end
    /// of what the user is typing stays visible
    pub fn tail_fitting(text: &str, max_width: u16) -> &str {
        let max_width = max_width as usize;
        if text.width() <= max_width {
            return text;
        }

        let mut width = 0;
        let mut start = text.len();
        for (index, ch) in text.char_indices().rev() {
            let ch_width = UnicodeWidthChar::width(ch).unwrap_or(0);
            if width + ch_width > max_width {
                break;
            }
            width += ch_width;
            start = index;
        }
        &text[start..]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::layout::Rect;

    #[test]
    fn test_centered_rect_clamps() {
        let area = Rect::new(0, 0, 20, 10);
        let rect = layout::centered_rect(10, 4, area);
        assert_eq!(rect, Rect::new(5, 3, 10, 4));

        let rect = layout::centered_rect(50, 50, area);
        assert_eq!(rect, area);
    }

    #[test]
    fn test_tail_fitting() {
        assert_eq!(text::tail_fitting("Ikeja", 10), "Ikeja");
        assert_eq!(text::tail_fitting("Victoria Island", 6), "Island");
        assert_eq!(text::display_width("Yaba"), 4);
    }
}
