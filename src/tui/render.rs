//! TUI rendering - all UI drawing functions

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::model::Severity;
use crate::present::{method_status, result_view, ResultView};
use crate::session::{Banner, Snapshot};

use super::state::*;
use super::types::*;
use super::utils::{centered_rect, gap_width, input_cursor_x, scroll_for, truncate_chars};

/// Main UI entry point - called from the main loop
pub fn ui(f: &mut Frame, app: &mut App) {
    let snapshot = app.session.snapshot();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title
            Constraint::Length(3), // URL input
            Constraint::Length(1), // Progress / banner
            Constraint::Min(10),   // Main content
            Constraint::Length(3), // Status bar
        ])
        .split(f.area());

    let version = env!("CARGO_PKG_VERSION");
    let title = Paragraph::new(format!(" schemascope v{} - DataLayer & Schema.org Extractor", version))
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(title, chunks[0]);

    render_input(f, app, chunks[1]);
    render_activity(f, &snapshot, chunks[2]);

    let main_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(chunks[3]);

    let right_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(8), Constraint::Min(5)])
        .split(main_chunks[1]);

    render_results(f, app, &snapshot, main_chunks[0]);
    render_methods(f, &snapshot, right_chunks[0]);
    render_log(f, app, right_chunks[1]);
    render_status_bar(f, app, &snapshot, chunks[4]);

    if app.mode == Mode::Help {
        render_help(f);
    }
}

fn render_input(f: &mut Frame, app: &App, area: Rect) {
    let line = if app.input.is_empty() {
        Line::from(Span::styled("https://example.com", Style::default().fg(Color::DarkGray)))
    } else {
        Line::from(app.input.as_str())
    };
    let input = Paragraph::new(line).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .title(" Website URL "),
    );
    f.render_widget(input, area);

    if app.mode == Mode::Normal {
        f.set_cursor_position((input_cursor_x(area, &app.input), area.y.saturating_add(1)));
    }
}

/// Progress text while a run is in flight, otherwise the banner
fn render_activity(f: &mut Frame, snapshot: &Snapshot, area: Rect) {
    let line = if let Some(mode) = snapshot.running {
        let text = snapshot.progress.as_deref().unwrap_or("Starting...");
        Line::from(vec![
            Span::styled(format!(" ⟳ {} ", mode.label()), Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)),
            Span::styled(text.to_string(), Style::default().fg(Color::Yellow)),
        ])
    } else {
        match &snapshot.banner {
            Some(Banner::Success(msg)) => Line::from(Span::styled(
                format!(" ✓ {}", msg),
                Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
            )),
            Some(Banner::Error(msg)) => Line::from(Span::styled(
                format!(" ✗ {}", msg),
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            )),
            None => Line::from(""),
        }
    };
    f.render_widget(Paragraph::new(line), area);
}

fn render_results(f: &mut Frame, app: &mut App, snapshot: &Snapshot, area: Rect) {
    let title = match (snapshot.mode(), &snapshot.current_url) {
        (Some(mode), Some(url)) => format!(" {} results: {} ", mode.label(), truncate_chars(url, 40)),
        _ => " Results ".to_string(),
    };
    let block = Block::default().borders(Borders::ALL).title(title);

    let mut lines: Vec<Line> = Vec::new();
    let mut selected_line = 0;

    match result_view(snapshot.results.as_ref()) {
        ResultView::Hidden => {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled("  No scan yet", Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD))));
            lines.push(Line::from(""));
            lines.push(Line::from(vec![
                Span::raw("  Type a URL, then "),
                Span::styled("Ctrl+S", Style::default().fg(Color::Cyan)),
                Span::raw(" for Schema.org or "),
                Span::styled("Enter", Style::default().fg(Color::Cyan)),
                Span::raw(" for DataLayer"),
            ]));
        }
        ResultView::Empty { title, hint } => {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(format!("  {}", title), Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD))));
            lines.push(Line::from(Span::styled(format!("  {}", hint), Style::default().fg(Color::DarkGray))));
        }
        ResultView::Items(items) => {
            for (i, item) in items.iter().enumerate() {
                let selected = i == app.selected_item;
                if selected {
                    selected_line = lines.len();
                }
                let marker = if selected { "▶ " } else { "  " };
                let mut header = vec![
                    Span::styled(marker, Style::default().fg(Color::Cyan)),
                    Span::styled(item.label.clone(), Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
                ];
                if let Some(badge) = &item.badge {
                    header.push(Span::styled(format!(" [{}]", badge), Style::default().fg(Color::DarkGray)));
                }
                if app.recently_copied(i) {
                    header.push(Span::styled(" ✓ copied", Style::default().fg(Color::Green)));
                }
                lines.push(Line::from(header));

                for tree_line in &item.tree {
                    lines.push(Line::from(format!("{}{}", "  ".repeat(tree_line.depth + 1), tree_line.text)));
                }
                if let Some(context) = &item.context {
                    lines.push(Line::from(Span::styled(
                        format!("    Context: {}", context),
                        Style::default().fg(Color::DarkGray),
                    )));
                }
                lines.push(Line::from(""));
            }
        }
    }

    let height = area.height.saturating_sub(2) as usize;
    app.results_scroll = scroll_for(selected_line, app.results_scroll, height);

    let results = Paragraph::new(lines)
        .block(block)
        .scroll((u16::try_from(app.results_scroll).unwrap_or(u16::MAX), 0));
    f.render_widget(results, area);
}

fn render_methods(f: &mut Frame, snapshot: &Snapshot, area: Rect) {
    let lines: Vec<Line> = if snapshot.methods.is_empty() {
        vec![Line::from(Span::styled(" -", Style::default().fg(Color::DarkGray)))]
    } else {
        snapshot
            .methods
            .iter()
            .map(|method| {
                let color = if method.found { Color::Green } else { Color::Red };
                let mut spans = vec![
                    Span::raw(format!(" {:<20} ", method.name)),
                    Span::styled(method_status(method), Style::default().fg(color)),
                ];
                if let Some(details) = &method.details {
                    spans.push(Span::styled(format!("  {}", details), Style::default().fg(Color::DarkGray)));
                }
                Line::from(spans)
            })
            .collect()
    };

    let methods = Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title(" Extraction Methods "));
    f.render_widget(methods, area);
}

fn render_log(f: &mut Frame, app: &App, area: Rect) {
    let logs = app.session.logs();
    let height = area.height.saturating_sub(2) as usize;
    let end = logs.len().saturating_sub(app.log_scroll);
    let start = end.saturating_sub(height);

    let lines: Vec<Line> = logs[start..end]
        .iter()
        .map(|entry| {
            let color = match entry.severity {
                Severity::Success => Color::Green,
                Severity::Error => Color::Red,
                Severity::Info => Color::Gray,
            };
            Line::from(vec![
                Span::styled(format!("[{}] ", entry.timestamp), Style::default().fg(Color::Blue)),
                Span::styled(entry.message.clone(), Style::default().fg(color)),
            ])
        })
        .collect();

    let log = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title(format!(" Log ({}) ", logs.len())))
        .wrap(Wrap { trim: false });
    f.render_widget(log, area);
}

fn render_status_bar(f: &mut Frame, app: &App, snapshot: &Snapshot, area: Rect) {
    let status = if let Some(msg) = &app.status_message {
        msg.clone()
    } else if snapshot.is_running() {
        "Scanning...".to_string()
    } else {
        match app.item_count() {
            0 => "Ready".to_string(),
            n => format!("Item {} of {}", app.selected_item + 1, n),
        }
    };
    let help_hint = "<Ctrl+S> schema  <Enter> datalayer  <Ctrl+Y> copy  <?> help  <Esc> quit";

    let status_line = Line::from(vec![
        Span::styled(format!(" {} ", status), Style::default().fg(Color::Cyan)),
        Span::raw(" ".repeat(gap_width(area.width, &status, help_hint))),
        Span::styled(help_hint, Style::default().fg(Color::DarkGray)),
        Span::raw(" "),
    ]);

    let status_bar = Paragraph::new(status_line).block(Block::default().borders(Borders::ALL));
    f.render_widget(status_bar, area);
}

fn render_help(f: &mut Frame) {
    let area = centered_rect(55, 60, f.area());
    f.render_widget(Clear, area);

    let key = |k: &'static str, what: &'static str| {
        Line::from(vec![Span::styled(k, Style::default().fg(Color::Yellow)), Span::raw(what)])
    };

    let help_text = vec![
        Line::from(""),
        Line::from(Span::styled(" Scanning", Style::default().add_modifier(Modifier::BOLD))),
        key(" Ctrl+S       ", "Scan for Schema.org markup"),
        key(" Enter/Ctrl+D ", "Simulated DataLayer scan"),
        Line::from(""),
        Line::from(Span::styled(" Results", Style::default().add_modifier(Modifier::BOLD))),
        key(" Up/Down      ", "Select item"),
        key(" Ctrl+Y       ", "Copy selected item as JSON"),
        key(" PgUp/PgDn    ", "Scroll the log"),
        Line::from(""),
        Line::from(Span::styled(" Global", Style::default().add_modifier(Modifier::BOLD))),
        key(" ? / F1       ", "Help (? only with an empty URL)"),
        key(" Ctrl+U       ", "Clear the URL"),
        key(" Esc          ", "Quit"),
        Line::from(""),
        Line::from(Span::styled(" Press any key to close ", Style::default().fg(Color::DarkGray))),
    ];

    let help = Paragraph::new(help_text)
        .block(Block::default().borders(Borders::ALL).title(" Help "))
        .style(Style::default().bg(Color::Black));
    f.render_widget(help, area);
}
