use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Key binding configuration
#[derive(Debug, Clone)]
pub struct KeyBinding {
    pub keys: Vec<(KeyCode, KeyModifiers)>,
    pub label: &'static str,
    pub description: &'static str,
}

impl KeyBinding {
    pub fn new(key: KeyCode, modifiers: KeyModifiers, label: &'static str, description: &'static str) -> Self {
        Self {
            keys: vec![(key, modifiers)],
            label,
            description,
        }
    }

    /// Also trigger on another key
    pub fn or(mut self, key: KeyCode, modifiers: KeyModifiers) -> Self {
        self.keys.push((key, modifiers));
        self
    }

    pub fn matches(&self, event: &KeyEvent) -> bool {
        self.keys
            .iter()
            .any(|(code, modifiers)| *code == event.code && *modifiers == event.modifiers)
    }
}

/// Application key mappings
#[derive(Debug, Clone)]
pub struct KeyMap {
    /// Quit application
    pub quit: KeyBinding,

    /// Show help
    pub help: KeyBinding,

    pub next_field: KeyBinding,
    pub previous_field: KeyBinding,

    /// Submit the form
    pub submit: KeyBinding,

    pub next_ride: KeyBinding,
    pub previous_ride: KeyBinding,

    /// Close the confirmation dialog
    pub dismiss: KeyBinding,
}

impl Default for KeyMap {
    fn default() -> Self {
        Self {
            quit: KeyBinding::new(KeyCode::Char('c'), KeyModifiers::CONTROL, "Ctrl+C", "Quit application"),
            help: KeyBinding::new(KeyCode::Char('g'), KeyModifiers::CONTROL, "Ctrl+G", "Show/hide help"),
            next_field: KeyBinding::new(KeyCode::Tab, KeyModifiers::NONE, "Tab", "Next field")
                .or(KeyCode::Down, KeyModifiers::NONE),
            previous_field: KeyBinding::new(KeyCode::BackTab, KeyModifiers::SHIFT, "Shift+Tab", "Previous field")
                .or(KeyCode::BackTab, KeyModifiers::NONE)
                .or(KeyCode::Up, KeyModifiers::NONE),
            submit: KeyBinding::new(KeyCode::Enter, KeyModifiers::NONE, "Enter", "Book ride"),
            next_ride: KeyBinding::new(KeyCode::Right, KeyModifiers::NONE, "Right", "Next ride type")
                .or(KeyCode::Char(' '), KeyModifiers::NONE),
            previous_ride: KeyBinding::new(KeyCode::Left, KeyModifiers::NONE, "Left", "Previous ride type"),
            dismiss: KeyBinding::new(KeyCode::Esc, KeyModifiers::NONE, "Esc", "Close dialog")
                .or(KeyCode::Enter, KeyModifiers::NONE),
        }
    }
}

impl KeyMap {
    /// Check if the event should quit the application
    pub fn should_quit(&self, event: &KeyEvent) -> bool {
        self.quit.matches(event)
    }

    /// Check if the event should show help
    pub fn should_show_help(&self, event: &KeyEvent) -> bool {
        self.help.matches(event)
    }

    /// Get help text for all key bindings
    pub fn help_text(&self) -> String {
        [
            &self.next_field,
            &self.previous_field,
            &self.next_ride,
            &self.previous_ride,
            &self.submit,
            &self.dismiss,
            &self.help,
            &self.quit,
        ]
        .iter()
        .map(|binding| format!("{:<10} {}", binding.label, binding.description))
        .collect::<Vec<_>>()
        .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bindings_match_alternatives() {
        let keys = KeyMap::default();
        assert!(keys.next_field.matches(&KeyEvent::new(KeyCode::Tab, KeyModifiers::NONE)));
        assert!(keys.next_field.matches(&KeyEvent::new(KeyCode::Down, KeyModifiers::NONE)));
        assert!(keys.previous_field.matches(&KeyEvent::new(KeyCode::BackTab, KeyModifiers::SHIFT)));
        assert!(keys.should_quit(&KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)));
        assert!(!keys.should_quit(&KeyEvent::new(KeyCode::Char('c'), KeyModifiers::NONE)));
    }

    #[test]
    fn test_help_lists_every_binding() {
        let help = KeyMap::default().help_text();
        assert_eq!(help.lines().count(), 8);
        assert!(help.contains("Book ride"));
    }
}
