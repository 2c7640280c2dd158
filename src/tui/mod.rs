//! Terminal User Interface module using ratatui

mod app;
mod components;
mod events;
mod keys;
mod pages;
mod styles;
mod utils;

pub use app::App;
pub use events::EventHandler;

use crate::config::Config;
use anyhow::Result;
use crossterm::execute;
use crossterm::terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use std::io;
use std::sync::atomic::{AtomicBool, Ordering};

/// Set while the form owns the terminal
static TERMINAL_ACTIVE: AtomicBool = AtomicBool::new(false);

pub type Backend = CrosstermBackend<io::Stdout>;
pub type Frame<'a> = ratatui::Frame<'a>;

/// Initialize the terminal for TUI mode
pub fn init_terminal() -> Result<Terminal<Backend>> {
    enable_raw_mode()?;
    TERMINAL_ACTIVE.store(true, Ordering::SeqCst);
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

/// Restore the terminal to normal mode
pub fn restore_terminal(terminal: &mut Terminal<Backend>) -> Result<()> {
    TERMINAL_ACTIVE.store(false, Ordering::SeqCst);
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

/// Best-effort restore when no terminal handle is at hand, e.g. from a panic hook.
/// Does nothing unless `init_terminal` took over the terminal.
pub fn reset_terminal() {
    if !TERMINAL_ACTIVE.swap(false, Ordering::SeqCst) {
        return;
    }
    let _ = disable_raw_mode();
    let _ = execute!(io::stdout(), LeaveAlternateScreen);
}

/// Main TUI entry point
pub async fn run(config: &Config) -> Result<()> {
    let mut terminal = init_terminal()?;
    let mut app = App::new(config);
    let mut event_handler = EventHandler::default();

    let result = run_app(&mut terminal, &mut app, &mut event_handler).await;

    // Nothing may resolve into a form that is gone
    app.shutdown();
    restore_terminal(&mut terminal)?;
    result
}

/// Main application loop
async fn run_app(terminal: &mut Terminal<Backend>, app: &mut App, event_handler: &mut EventHandler) -> Result<()> {
    loop {
        terminal.draw(|frame| app.render(frame))?;

        tokio::select! {
            event = event_handler.next() => match event {
                Some(event) => {
                    if app.handle_event(event) {
                        break; // Exit requested
                    }
                }
                None => break,
            },
            Some(form_event) = app.next_form_event() => {
                app.dispatch(form_event);
            }
        }
    }
    Ok(())
}
