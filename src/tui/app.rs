use crate::booking::{BookingSession, BookingState, FormEvent};
use crate::config::Config;
use crate::tui::{events::Event, keys::KeyMap, pages::booking::BookingPage, styles::Theme, utils::layout, Frame};
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use tracing::debug;

/// Main application state and controller
pub struct App {
    /// Whether the application should quit
    pub should_quit: bool,

    /// Show the key binding overlay
    pub show_help: bool,

    /// Key mappings for the application
    pub key_map: KeyMap,

    /// Current theme for styling
    pub theme: Theme,

    session: BookingSession,
    page: BookingPage,
}

impl App {
    /// Create a new application instance
    pub fn new(config: &Config) -> Self {
        let state = BookingState::new(config.form_settings());
        let session = BookingSession::new(state, config.backend(), config.banner_timeout());

        Self {
            should_quit: false,
            show_help: false,
            key_map: KeyMap::default(),
            theme: Theme::default(),
            session,
            page: BookingPage::new(),
        }
    }

    #[cfg(test)]
    pub fn state(&self) -> &BookingState {
        self.session.state()
    }

    /// Handle a terminal event, returning whether to exit
    pub fn handle_event(&mut self, event: Event) -> bool {
        match event {
            Event::Key(key_event) => {
                if self.key_map.should_quit(&key_event) {
                    self.should_quit = true;
                    return true;
                }

                if self.key_map.should_show_help(&key_event) {
                    self.show_help = !self.show_help;
                    return false;
                }

                if let Some(form_event) = self.page.handle_key(key_event, self.session.state(), &self.key_map) {
                    self.dispatch(form_event);
                }
            }

            Event::Resize(width, height) => {
                debug!(width, height, "Terminal resized");
            }

            Event::Tick => {
                self.page.tick(self.session.state());
            }
        }

        self.should_quit
    }

    pub fn dispatch(&mut self, event: FormEvent) {
        self.session.dispatch(event);
    }

    /// Wait for the outcome of background booking work
    pub async fn next_form_event(&mut self) -> Option<FormEvent> {
        self.session.next_event().await
    }

    /// Cancel anything still in flight
    pub fn shutdown(&mut self) {
        self.session.shutdown();
    }

    /// Render the application UI
    pub fn render(&mut self, frame: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(1),    // Main content
                Constraint::Length(1), // Status bar
            ])
            .split(frame.size());

        let state = self.session.state();
        self.page.render(frame, chunks[0], state, &self.theme);
        if let Some((x, y)) = self.page.cursor_position(chunks[0], state) {
            frame.set_cursor(x, y);
        }

        self.render_status_bar(frame, chunks[1]);

        if self.show_help {
            self.render_help_overlay(frame);
        }
    }

    /// Render the status bar
    fn render_status_bar(&self, frame: &mut Frame, area: Rect) {
        let status_text = if self.session.state().is_loading() {
            "Contacting the booking service...".to_string()
        } else {
            "Tab: next field | Enter: book | Ctrl+G: help | Ctrl+C: quit".to_string()
        };

        let status_paragraph = Paragraph::new(status_text).style(self.theme.footer_style());
        frame.render_widget(status_paragraph, area);
    }

    /// Render help overlay
    fn render_help_overlay(&self, frame: &mut Frame) {
        let help_text = self.key_map.help_text();
        let height = help_text.lines().count() as u16 + 2;
        let help_area = layout::centered_rect(44, height, frame.size());

        let help_block = Block::default()
            .borders(Borders::ALL)
            .title("Help")
            .style(self.theme.help_style());

        let help_paragraph = Paragraph::new(help_text)
            .block(help_block)
            .style(self.theme.text_style());

        frame.render_widget(Clear, help_area);
        frame.render_widget(help_paragraph, help_area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ForcedOutcome;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    fn press(app: &mut App, code: KeyCode) -> bool {
        app.handle_event(Event::Key(KeyEvent::new(code, KeyModifiers::NONE)))
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    fn test_config(outcome: ForcedOutcome) -> Config {
        Config {
            submit_delay_ms: 0,
            outcome: Some(outcome),
            ..Config::default()
        }
    }

    #[tokio::test]
    async fn test_failed_booking_through_the_app() {
        let mut app = App::new(&test_config(ForcedOutcome::Failure));
        type_text(&mut app, "Ikeja");
        press(&mut app, KeyCode::Tab);
        type_text(&mut app, "Yaba");
        press(&mut app, KeyCode::Enter);
        assert!(app.state().is_loading());

        let event = app.next_form_event().await.unwrap();
        app.dispatch(event);

        assert_eq!(app.state().dialog().unwrap().title, "Booking Unsuccessful");
        assert_eq!(app.state().draft().pickup, "Ikeja");

        press(&mut app, KeyCode::Enter);
        assert!(!app.state().is_dialog_open());
    }

    #[tokio::test]
    async fn test_quit_and_help_keys() {
        let mut app = App::new(&test_config(ForcedOutcome::Success));
        assert!(!app.handle_event(Event::Key(KeyEvent::new(KeyCode::Char('g'), KeyModifiers::CONTROL))));
        assert!(app.show_help);
        assert!(app.handle_event(Event::Key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL))));
        assert!(app.should_quit);
    }
}
