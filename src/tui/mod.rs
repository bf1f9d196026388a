//! TUI module - interactive scanner dashboard
//!
//! Scans run on worker threads and report back over a channel; the main
//! loop drains it every frame.

#![cfg(feature = "tui")]

mod types;
mod state;
mod utils;
mod render;
mod input;

pub use types::*;
pub use state::*;
pub use utils::centered_rect;

use std::io;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use crate::error::Result;

/// Run the TUI
pub fn run() -> Result<()> {
    // Load config before touching the terminal so errors print normally
    let mut app = App::new()?;

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = event_loop(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn event_loop(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> Result<()> {
    loop {
        app.poll_workers();
        terminal.draw(|f| render::ui(f, app))?;

        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    input::handle_key_event(app, key.code, key.modifiers)?;
                }
            }
        }

        if app.should_quit {
            return Ok(());
        }
    }
}
