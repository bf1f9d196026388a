//! TUI input handling - keyboard event handlers

use crossterm::event::{KeyCode, KeyModifiers};

use crate::error::Result;
use crate::model::ScanMode;

use super::state::*;
use super::types::*;

/// Main key event dispatcher
pub fn handle_key_event(app: &mut App, key: KeyCode, modifiers: KeyModifiers) -> Result<()> {
    match app.mode {
        Mode::Normal => handle_normal_input(app, key, modifiers),
        Mode::Help => {
            app.mode = Mode::Normal;
            Ok(())
        }
    }
}

fn handle_normal_input(app: &mut App, key: KeyCode, modifiers: KeyModifiers) -> Result<()> {
    let ctrl = modifiers.contains(KeyModifiers::CONTROL);

    match key {
        KeyCode::Esc => app.should_quit = true,
        KeyCode::Char('c') if ctrl => app.should_quit = true,
        KeyCode::Char('s') if ctrl => app.start_scan(ScanMode::Schema),
        KeyCode::Char('d') if ctrl => app.start_scan(ScanMode::DataLayer),
        KeyCode::Enter => app.start_scan(ScanMode::DataLayer),
        KeyCode::Char('y') if ctrl => app.copy_selected(),
        KeyCode::Char('u') if ctrl => app.input.clear(),
        KeyCode::F(1) => app.mode = Mode::Help,
        // URLs contain '?', so it only opens help before anything is typed
        KeyCode::Char('?') if app.input.is_empty() => app.mode = Mode::Help,
        KeyCode::Char(c) if !ctrl => {
            app.input.push(c);
            app.status_message = None;
        }
        KeyCode::Backspace => {
            app.input.pop();
        }
        KeyCode::Up => app.select_previous(),
        KeyCode::Down => app.select_next(),
        KeyCode::PageUp => {
            let max = app.session.logs().len().saturating_sub(1);
            app.log_scroll = (app.log_scroll + 5).min(max);
        }
        KeyCode::PageDown => app.log_scroll = app.log_scroll.saturating_sub(5),
        _ => {}
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    fn press(app: &mut App, key: KeyCode) {
        handle_key_event(app, key, KeyModifiers::NONE).unwrap();
    }

    #[test]
    fn test_typing_edits_input() {
        let mut app = App::with_config(Config::default());
        for c in "exa?mple".chars() {
            press(&mut app, KeyCode::Char(c));
        }
        press(&mut app, KeyCode::Backspace);
        assert_eq!(app.input, "exa?mpl");
        assert_eq!(app.mode, Mode::Normal);

        handle_key_event(&mut app, KeyCode::Char('u'), KeyModifiers::CONTROL).unwrap();
        assert!(app.input.is_empty());
    }

    #[test]
    fn test_help_opens_and_any_key_closes() {
        let mut app = App::with_config(Config::default());
        press(&mut app, KeyCode::Char('?'));
        assert_eq!(app.mode, Mode::Help);
        press(&mut app, KeyCode::Char('x'));
        assert_eq!(app.mode, Mode::Normal);
        assert!(app.input.is_empty());
    }

    #[test]
    fn test_escape_quits() {
        let mut app = App::with_config(Config::default());
        press(&mut app, KeyCode::Esc);
        assert!(app.should_quit);
    }

    #[test]
    fn test_log_scroll_is_bounded() {
        let mut app = App::with_config(Config::default());
        press(&mut app, KeyCode::PageUp);
        assert_eq!(app.log_scroll, 0);
        press(&mut app, KeyCode::PageDown);
        assert_eq!(app.log_scroll, 0);
    }
}
