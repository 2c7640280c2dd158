use crate::booking::{Banner, BookingState, Field, FormEvent, OutcomeKind, RideSummary};
use crate::tui::{
    components::{dialog::ConfirmationDialog, input::TextField},
    keys::KeyMap,
    styles::Theme,
    utils::layout,
    Frame,
};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

pub const BRAND: &str = "Ozzirap Rideshare";
const FORM_WIDTH: u16 = 52;
const SPINNER: [&str; 4] = ["|", "/", "-", "\\"];

/// Which form control receives typing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormFocus {
    #[default]
    Pickup,
    Destination,
    RideType,
    Submit,
}

impl FormFocus {
    pub fn next(self) -> Self {
        match self {
            FormFocus::Pickup => FormFocus::Destination,
            FormFocus::Destination => FormFocus::RideType,
            FormFocus::RideType => FormFocus::Submit,
            FormFocus::Submit => FormFocus::Pickup,
        }
    }

    pub fn previous(self) -> Self {
        match self {
            FormFocus::Pickup => FormFocus::Submit,
            FormFocus::Destination => FormFocus::Pickup,
            FormFocus::RideType => FormFocus::Destination,
            FormFocus::Submit => FormFocus::RideType,
        }
    }

    /// The text field under focus, if any
    pub fn field(self) -> Option<Field> {
        match self {
            FormFocus::Pickup => Some(Field::Pickup),
            FormFocus::Destination => Some(Field::Destination),
            FormFocus::RideType | FormFocus::Submit => None,
        }
    }
}

/// The booking screen: header, form, summary and footer
#[derive(Debug, Default)]
pub struct BookingPage {
    focus: FormFocus,
    spinner_frame: usize,
}

impl BookingPage {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub fn focus(&self) -> FormFocus {
        self.focus
    }

    /// Advance the busy indicator
    pub fn tick(&mut self, state: &BookingState) {
        if state.is_loading() {
            self.spinner_frame = (self.spinner_frame + 1) % SPINNER.len();
        } else {
            self.spinner_frame = 0;
        }
    }

    /// Translate a key press into a form event
    pub fn handle_key(&mut self, key: KeyEvent, state: &BookingState, keys: &KeyMap) -> Option<FormEvent> {
        // The dialog is modal
        if state.is_dialog_open() {
            if keys.dismiss.matches(&key) {
                self.focus = FormFocus::Pickup;
                return Some(FormEvent::DismissDialog);
            }
            return None;
        }

        if keys.next_field.matches(&key) {
            self.focus = self.focus.next();
            return None;
        }
        if keys.previous_field.matches(&key) {
            self.focus = self.focus.previous();
            return None;
        }

        if let Some(field) = self.focus.field() {
            if let Some(event) = edit_text(field, key, state) {
                return Some(event);
            }
        }

        if self.focus == FormFocus::RideType {
            let rides = state.settings().rides;
            let current = state.draft().ride_type;
            if keys.next_ride.matches(&key) {
                return Some(FormEvent::SelectRide(rides.next(current)));
            }
            if keys.previous_ride.matches(&key) {
                return Some(FormEvent::SelectRide(rides.previous(current)));
            }
        }

        if keys.submit.matches(&key) && state.can_submit() {
            return Some(FormEvent::Submit);
        }

        None
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, state: &BookingState, theme: &Theme) {
        frame.render_widget(Block::default().style(theme.base_style()), area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1), // Header
                Constraint::Length(5), // Welcome
                Constraint::Min(0),    // Form
                Constraint::Length(1), // Footer
            ])
            .split(area);

        self.render_header(frame, chunks[0], theme);
        self.render_intro(frame, chunks[1], theme);
        self.render_form(frame, layout::centered_column(FORM_WIDTH, chunks[2]), state, theme);
        self.render_footer(frame, chunks[3], theme);

        ConfirmationDialog::new(state.dialog()).render(frame, area, theme);
    }

    fn render_header(&self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let nav = " Home  About  Contact ";
        let brand = format!(" {}", BRAND);
        let gap = (area.width as usize).saturating_sub(brand.len() + nav.len());
        let header = Paragraph::new(format!("{}{}{}", brand, " ".repeat(gap), nav)).style(theme.header_style());
        frame.render_widget(header, area);
    }

    fn render_intro(&self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let lines = vec![
            Line::from(Span::styled(format!("Welcome to {}!", BRAND), theme.heading_style())),
            Line::from(Span::styled(
                "Your reliable rideshare solution. Book a ride quickly and conveniently.",
                theme.dim_style(),
            )),
            Line::from(""),
            Line::from(Span::styled("Book a Ride", theme.heading_style())),
            Line::from(Span::styled("Enter your details below to book a ride.", theme.dim_style())),
        ];
        frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), area);
    }

    fn render_form(&self, frame: &mut Frame, area: Rect, state: &BookingState, theme: &Theme) {
        let banner_height = if state.banner().is_some() { 3 } else { 0 };
        let summary_height = if state.summary().is_some() { 5 } else { 0 };

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(banner_height),
                Constraint::Length(5), // Pickup
                Constraint::Length(5), // Destination
                Constraint::Length(4), // Ride type
                Constraint::Length(1), // Button
                Constraint::Length(1),
                Constraint::Length(summary_height),
                Constraint::Min(0),
            ])
            .split(area);

        if let Some(banner) = state.banner() {
            render_banner(frame, rows[0], banner, theme);
        }

        let editing = !state.is_dialog_open();
        let pickup = TextField::new("Pickup Location", "Enter pickup location", &state.draft().pickup)
            .error(state.errors().pickup.as_deref())
            .focused(editing && self.focus == FormFocus::Pickup);
        pickup.render(frame, rows[1], theme);

        let destination = TextField::new("Destination", "Enter destination", &state.draft().destination)
            .error(state.errors().destination.as_deref())
            .focused(editing && self.focus == FormFocus::Destination);
        destination.render(frame, rows[2], theme);

        self.render_ride_selector(frame, rows[3], state, theme);
        self.render_button(frame, rows[4], state, theme);

        if let Some(summary) = state.summary() {
            render_summary(frame, rows[6], &summary, theme);
        }
    }

    fn render_ride_selector(&self, frame: &mut Frame, area: Rect, state: &BookingState, theme: &Theme) {
        let focused = self.focus == FormFocus::RideType && !state.is_dialog_open();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Length(3)])
            .split(area);

        frame.render_widget(Paragraph::new("Ride Type").style(theme.heading_style()), chunks[0]);

        let current = state.draft().ride_type;
        let spans: Vec<Span> = state
            .settings()
            .rides
            .options()
            .iter()
            .flat_map(|ride| {
                let style = if *ride == current {
                    theme.button_style(focused, true)
                } else {
                    theme.dim_style()
                };
                [Span::styled(format!(" {} ", ride.label()), style), Span::raw("  ")]
            })
            .collect();

        let border = if focused {
            theme.focused_border_style()
        } else {
            theme.border_style()
        };
        let selector = Paragraph::new(Line::from(spans))
            .block(Block::default().borders(Borders::ALL).border_style(border))
            .style(theme.card_style());
        frame.render_widget(selector, chunks[1]);
    }

    fn render_button(&self, frame: &mut Frame, area: Rect, state: &BookingState, theme: &Theme) {
        let label = if state.is_loading() {
            format!(" {} {} ", state.submit_label(), SPINNER[self.spinner_frame])
        } else {
            format!(" {} ", state.submit_label())
        };
        let focused = self.focus == FormFocus::Submit && !state.is_dialog_open();
        let button = Paragraph::new(label)
            .style(theme.button_style(focused, state.can_submit()))
            .alignment(Alignment::Center);
        frame.render_widget(button, area);
    }

    fn render_footer(&self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let footer = Paragraph::new(format!("© 2025 {}. All rights reserved.", BRAND))
            .style(theme.footer_style())
            .alignment(Alignment::Center);
        frame.render_widget(footer, area);
    }

    /// Terminal cursor position for the focused text field
    pub fn cursor_position(&self, area: Rect, state: &BookingState) -> Option<(u16, u16)> {
        let field = self.focus.field()?;
        if state.is_dialog_open() {
            return None;
        }
        // Mirrors the layout in `render`
        let form_top = area.y + 1 + 5 + if state.banner().is_some() { 3 } else { 0 };
        let column = layout::centered_column(FORM_WIDTH, area);
        let (row, value) = match field {
            Field::Pickup => (form_top, &state.draft().pickup),
            Field::Destination => (form_top + 5, &state.draft().destination),
        };
        Some(TextField::cursor_in(Rect::new(column.x, row, column.width, 5), value))
    }
}

/// Append a typed character or delete the last one
fn edit_text(field: Field, key: KeyEvent, state: &BookingState) -> Option<FormEvent> {
    let current = match field {
        Field::Pickup => &state.draft().pickup,
        Field::Destination => &state.draft().destination,
    };

    match key.code {
        KeyCode::Char(c) if !key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) => {
            let mut value = current.clone();
            value.push(c);
            Some(FormEvent::Edit(field, value))
        }
        KeyCode::Backspace => {
            let mut value = current.clone();
            value.pop()?;
            Some(FormEvent::Edit(field, value))
        }
        _ => None,
    }
}

fn render_banner(frame: &mut Frame, area: Rect, banner: &Banner, theme: &Theme) {
    let style = match banner.kind {
        OutcomeKind::Success => theme.success_style(),
        OutcomeKind::Failure => theme.error_style(),
    };
    let text = vec![
        Line::from(Span::styled(banner.title.as_str(), style)),
        Line::from(Span::styled(banner.message.as_str(), theme.text_style())),
    ];
    let paragraph = Paragraph::new(text)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::LEFT).border_style(style));
    frame.render_widget(paragraph, area);
}

fn render_summary(frame: &mut Frame, area: Rect, summary: &RideSummary, theme: &Theme) {
    let row = |label: &'static str, value: &str| {
        Line::from(vec![
            Span::styled(format!("{:<13}", label), theme.heading_style()),
            Span::styled(value.to_string(), theme.text_style()),
        ])
    };
    let lines = vec![
        row("Pickup:", &summary.pickup),
        row("Destination:", &summary.destination),
        row("Ride Type:", summary.ride_type.label()),
    ];
    let block = Block::default()
        .borders(Borders::ALL)
        .title("Ride Summary")
        .border_style(theme.border_style());
    frame.render_widget(Paragraph::new(lines).block(block).style(theme.card_style()), area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::booking::backend::BookingReceipt;
    use crate::booking::machine::Command;
    use crate::booking::RideType;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    /// Feed key presses through the page and the state machine
    fn type_keys(page: &mut BookingPage, mut state: BookingState, codes: &[KeyCode]) -> (BookingState, Vec<Command>) {
        let keys = KeyMap::default();
        let mut commands = Vec::new();
        for code in codes {
            if let Some(event) = page.handle_key(key(*code), &state, &keys) {
                let (next, mut emitted) = state.apply(event);
                state = next;
                commands.append(&mut emitted);
            }
        }
        (state, commands)
    }

    fn chars(text: &str) -> Vec<KeyCode> {
        text.chars().map(KeyCode::Char).collect()
    }

    fn screen_text(terminal: &Terminal<TestBackend>) -> String {
        let buffer = terminal.backend().buffer();
        let mut text = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                text.push_str(buffer.get(x, y).symbol());
            }
            text.push('\n');
        }
        text
    }

    #[test]
    fn test_typing_and_submitting() {
        let mut page = BookingPage::new();
        let mut codes = chars("Ikejx");
        codes.push(KeyCode::Backspace);
        codes.push(KeyCode::Char('a'));
        codes.push(KeyCode::Tab);
        codes.extend(chars("Yaba"));
        codes.push(KeyCode::Tab);
        codes.push(KeyCode::Right);
        codes.push(KeyCode::Enter);

        let (state, commands) = type_keys(&mut page, BookingState::default(), &codes);
        assert_eq!(state.draft().pickup, "Ikeja");
        assert_eq!(state.draft().destination, "Yaba");
        assert_eq!(state.draft().ride_type, RideType::Group);
        assert!(state.is_loading());
        assert_eq!(commands.len(), 1);
    }

    #[test]
    fn test_space_types_in_text_fields() {
        let mut page = BookingPage::new();
        let (state, _) = type_keys(&mut page, BookingState::default(), &chars("Victoria Island"));
        assert_eq!(state.draft().pickup, "Victoria Island");
        assert_eq!(state.draft().ride_type, RideType::Single);
    }

    #[test]
    fn test_focus_cycles() {
        let mut page = BookingPage::new();
        let keys = KeyMap::default();
        let state = BookingState::default();
        for expected in [FormFocus::Destination, FormFocus::RideType, FormFocus::Submit, FormFocus::Pickup] {
            assert!(page.handle_key(key(KeyCode::Tab), &state, &keys).is_none());
            assert_eq!(page.focus(), expected);
        }
        page.handle_key(key(KeyCode::Up), &state, &keys);
        assert_eq!(page.focus(), FormFocus::Submit);
    }

    #[test]
    fn test_enter_ignored_while_loading() {
        let mut page = BookingPage::new();
        let mut codes = chars("Ikeja");
        codes.push(KeyCode::Tab);
        codes.extend(chars("Yaba"));
        codes.push(KeyCode::Enter);
        let (state, _) = type_keys(&mut page, BookingState::default(), &codes);
        assert!(state.is_loading());

        let keys = KeyMap::default();
        assert!(page.handle_key(key(KeyCode::Enter), &state, &keys).is_none());
    }

    #[test]
    fn test_dialog_is_modal() {
        let mut page = BookingPage::new();
        let mut codes = chars("Ikeja");
        codes.push(KeyCode::Tab);
        codes.extend(chars("Yaba"));
        codes.push(KeyCode::Enter);
        let (state, commands) = type_keys(&mut page, BookingState::default(), &codes);
        let Command::Book(request) = &commands[0] else {
            panic!("expected a booking");
        };
        let (state, _) = state.apply(FormEvent::Resolved {
            ticket: request.ticket,
            outcome: Ok(BookingReceipt::for_request(request)),
        });
        assert!(state.is_dialog_open());

        let keys = KeyMap::default();
        assert!(page.handle_key(key(KeyCode::Char('x')), &state, &keys).is_none());
        assert_eq!(
            page.handle_key(key(KeyCode::Esc), &state, &keys),
            Some(FormEvent::DismissDialog)
        );
        assert_eq!(page.focus(), FormFocus::Pickup);
    }

    #[test]
    fn test_render_shows_errors_summary_and_busy_label() {
        let state = BookingState::default();
        let (state, _) = state.apply(FormEvent::Edit(Field::Pickup, "Lagos".to_string()));
        let (state, _) = state.apply(FormEvent::Edit(Field::Destination, "Lagos".to_string()));

        let page = BookingPage::new();
        let mut terminal = Terminal::new(TestBackend::new(80, 40)).unwrap();
        terminal
            .draw(|frame| page.render(frame, frame.size(), &state, &Theme::default()))
            .unwrap();
        let text = screen_text(&terminal);
        assert!(text.contains("Ozzirap Rideshare"));
        assert!(text.contains("Pickup and Destination cannot be the same."));
        assert!(text.contains("Ride Summary"));
        assert!(text.contains("Book Ride"));

        let (state, _) = state.apply(FormEvent::Edit(Field::Destination, "Yaba".to_string()));
        let (state, _) = state.apply(FormEvent::Submit);
        terminal
            .draw(|frame| page.render(frame, frame.size(), &state, &Theme::default()))
            .unwrap();
        assert!(screen_text(&terminal).contains("Booking..."));
    }
}
