use ratatui::style::{Color, Modifier, Style};

/// Application theme configuration
#[derive(Debug, Clone)]
pub struct Theme {
    /// Brand colors
    pub primary: Color,
    pub primary_dark: Color,

    /// Text colors
    pub text: Color,
    pub text_dim: Color,
    pub text_bright: Color,

    /// Background colors
    pub background: Color,
    pub surface: Color,
    pub footer: Color,

    /// Border colors
    pub border: Color,
    pub border_focused: Color,

    /// Status colors
    pub success: Color,
    pub error: Color,

    pub placeholder: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self::light()
    }
}

impl Theme {
    /// Blue on light gray, the Ozzirap house style
    pub fn light() -> Self {
        Self {
            primary: Color::Rgb(59, 130, 246),       // Blue-500
            primary_dark: Color::Rgb(37, 99, 235),   // Blue-600

            text: Color::Rgb(31, 41, 55),            // Gray-800
            text_dim: Color::Rgb(75, 85, 99),        // Gray-600
            text_bright: Color::Rgb(255, 255, 255),  // White

            background: Color::Rgb(243, 244, 246),   // Gray-100
            surface: Color::Rgb(255, 255, 255),      // White
            footer: Color::Rgb(31, 41, 55),          // Gray-800

            border: Color::Rgb(209, 213, 219),       // Gray-300
            border_focused: Color::Rgb(59, 130, 246),

            success: Color::Rgb(22, 163, 74),        // Green-600
            error: Color::Rgb(220, 38, 38),          // Red-600

            placeholder: Color::Rgb(156, 163, 175),  // Gray-400
        }
    }

    /// Base style for normal elements
    pub fn base_style(&self) -> Style {
        Style::default().fg(self.text).bg(self.background)
    }

    /// Style for text content
    pub fn text_style(&self) -> Style {
        Style::default().fg(self.text)
    }

    pub fn dim_style(&self) -> Style {
        Style::default().fg(self.text_dim)
    }

    pub fn heading_style(&self) -> Style {
        Style::default().fg(self.text).add_modifier(Modifier::BOLD)
    }

    pub fn header_style(&self) -> Style {
        Style::default()
            .fg(self.text_bright)
            .bg(self.primary)
            .add_modifier(Modifier::BOLD)
    }

    pub fn footer_style(&self) -> Style {
        Style::default().fg(self.text_bright).bg(self.footer)
    }

    pub fn card_style(&self) -> Style {
        Style::default().fg(self.text).bg(self.surface)
    }

    /// Style for borders
    pub fn border_style(&self) -> Style {
        Style::default().fg(self.border)
    }

    /// Style for focused borders
    pub fn focused_border_style(&self) -> Style {
        Style::default()
            .fg(self.border_focused)
            .add_modifier(Modifier::BOLD)
    }

    pub fn button_style(&self, focused: bool, enabled: bool) -> Style {
        let bg = match (enabled, focused) {
            (false, _) => self.placeholder,
            (true, true) => self.primary_dark,
            (true, false) => self.primary,
        };
        Style::default()
            .fg(self.text_bright)
            .bg(bg)
            .add_modifier(Modifier::BOLD)
    }

    pub fn error_style(&self) -> Style {
        Style::default().fg(self.error)
    }

    pub fn success_style(&self) -> Style {
        Style::default().fg(self.success).add_modifier(Modifier::BOLD)
    }

    /// Style for help text
    pub fn help_style(&self) -> Style {
        Style::default()
            .fg(self.text)
            .bg(self.surface)
            .add_modifier(Modifier::BOLD)
    }

    /// Style for placeholder text
    pub fn placeholder_style(&self) -> Style {
        Style::default()
            .fg(self.placeholder)
            .add_modifier(Modifier::ITALIC)
    }
}
