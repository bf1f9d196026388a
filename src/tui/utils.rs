//! TUI utility functions - layout and text helpers

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Create a centered rect for modals
pub fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

/// Cut a string to `max` characters, marking the cut with an ellipsis
pub fn truncate_chars(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let kept: String = s.chars().take(max.saturating_sub(1)).collect();
    format!("{}…", kept)
}

/// Cursor column after `text` in a bordered input box, kept inside the box
pub fn input_cursor_x(area: Rect, text: &str) -> u16 {
    let max_x = area.x.saturating_add(area.width.saturating_sub(2));
    let typed = u16::try_from(text.chars().count()).unwrap_or(u16::MAX);
    area.x.saturating_add(1).saturating_add(typed).min(max_x)
}

/// Spaces between a left and a right aligned span in a bordered bar
pub fn gap_width(width: u16, left: &str, right: &str) -> usize {
    (width as usize).saturating_sub(left.chars().count() + right.chars().count() + 4)
}

/// First line to show so that `selected` stays inside a window of `height` lines
pub fn scroll_for(selected: usize, current: usize, height: usize) -> usize {
    if height == 0 {
        return selected;
    }
    if selected < current {
        selected
    } else if selected >= current + height {
        selected + 1 - height
    } else {
        current
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_centered_rect_fits_inside() {
        let outer = Rect::new(0, 0, 100, 40);
        let inner = centered_rect(50, 50, outer);
        assert_eq!(inner.width, 50);
        assert_eq!(inner.height, 20);
        assert_eq!(inner.x, 25);
    }

    #[test]
    fn test_truncate_chars() {
        assert_eq!(truncate_chars("short", 10), "short");
        assert_eq!(truncate_chars("https://example.com/long", 8), "https:/…");
        assert_eq!(truncate_chars("ééééé", 3), "éé…");
    }

    #[test]
    fn test_input_cursor_x_stays_in_box() {
        let area = Rect::new(2, 5, 40, 3);
        assert_eq!(input_cursor_x(area, ""), 3);
        assert_eq!(input_cursor_x(area, "example.com"), 14);
        assert_eq!(input_cursor_x(area, &"a".repeat(70_000)), 40);

        let edge = Rect::new(u16::MAX - 10, 0, 10, 3);
        assert_eq!(input_cursor_x(edge, &"a".repeat(100)), u16::MAX - 2);
    }

    #[test]
    fn test_gap_width() {
        assert_eq!(gap_width(40, "Ready", "<Esc> quit"), 21);
        assert_eq!(gap_width(10, &"x".repeat(70_000), "hint"), 0);
    }

    #[test]
    fn test_scroll_for() {
        assert_eq!(scroll_for(0, 0, 5), 0);
        assert_eq!(scroll_for(7, 0, 5), 3);
        assert_eq!(scroll_for(2, 4, 5), 2);
        assert_eq!(scroll_for(5, 3, 5), 3);
    }
}
