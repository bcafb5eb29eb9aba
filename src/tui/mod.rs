//! Terminal User Interface module
//!
//! Handles all TUI rendering and layout using Ratatui.

mod terminal;
mod theme;
pub mod widgets;

pub use terminal::{Tui, MIN_HEIGHT, MIN_WIDTH};
pub use theme::Theme;

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::app::{App, AppMode};
use crate::scan::{RunStatus, ScanKind};
use widgets::{ResultPanel, TextInput};

/// Safely truncate a string at a character boundary
fn safe_truncate(s: &str, max_len: usize) -> String {
    if s.len() <= max_len {
        return s.to_string();
    }
    let mut end = max_len.min(s.len());
    while end > 0 && !s.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &s[..end])
}

/// Main UI rendering
pub fn render(frame: &mut Frame, app: &App) {
    let theme = Theme::by_name(&app.config.tui.theme);

    let area = frame.area();
    if area.width < MIN_WIDTH || area.height < MIN_HEIGHT {
        render_size_warning(frame, area, &theme);
        return;
    }

    // Main layout: header, domain bar, body, status bar
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // Header
            Constraint::Length(3), // Domain bar
            Constraint::Min(10),   // Cards + detail
            Constraint::Length(1), // Status bar
        ])
        .split(area);

    render_header(frame, chunks[0], app, &theme);
    render_domain_bar(frame, chunks[1], app, &theme);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(45), // Cards
            Constraint::Percentage(55), // Detail
        ])
        .split(chunks[2]);

    render_cards(frame, columns[0], app, &theme);
    render_detail(frame, columns[1], app, &theme);

    render_status_bar(frame, chunks[3], app, &theme);

    if app.state.read().mode == AppMode::Help {
        render_help_dialog(frame, &theme);
    }
}

fn render_size_warning(frame: &mut Frame, area: Rect, _theme: &Theme) {
    let msg = format!(
        "Terminal too small: {}x{}\nMinimum required: {}x{}",
        area.width, area.height, MIN_WIDTH, MIN_HEIGHT
    );
    let warning = Paragraph::new(msg)
        .style(Style::default().fg(Color::Red))
        .block(Block::default().borders(Borders::ALL).title(" Warning "));
    frame.render_widget(warning, area);
}

fn render_header(frame: &mut Frame, area: Rect, app: &App, theme: &Theme) {
    let header = Line::from(vec![
        Span::styled(
            " Scandeck ",
            Style::default().fg(theme.accent).add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("v{} ", env!("CARGO_PKG_VERSION")),
            Style::default().fg(theme.muted),
        ),
        Span::styled("│ ", Style::default().fg(theme.border)),
        Span::styled(
            format!("backend: {}", app.config.backend.base_url),
            Style::default().fg(theme.muted),
        ),
    ]);

    let paragraph = Paragraph::new(header)
        .block(Block::default().borders(Borders::BOTTOM).border_style(Style::default().fg(theme.border)));
    frame.render_widget(paragraph, area);
}

fn render_domain_bar(frame: &mut Frame, area: Rect, app: &App, theme: &Theme) {
    let mut state = app.state.write();

    let is_editing = state.mode == AppMode::EditDomain;
    let title = if is_editing {
        " Target Domain [EDITING] "
    } else {
        " Target Domain ('e' to edit) "
    };

    let input = TextInput::new()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme.border))
                .title(title),
        )
        .style(Style::default().fg(theme.fg))
        .focus_style(Style::default().fg(theme.accent))
        .placeholder_style(Style::default().fg(theme.muted));

    frame.render_stateful_widget(input, area, &mut state.domain);
}

fn render_cards(frame: &mut Frame, area: Rect, app: &App, theme: &Theme) {
    let state = app.state.read();

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.border))
        .title(" Scans ");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let mut lines: Vec<Line> = Vec::new();
    for kind in ScanKind::all() {
        let selected = state.selected == *kind;
        let marker = if selected { "▸ " } else { "  " };
        let title_style = if selected {
            Style::default().fg(theme.accent).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(theme.fg)
        };

        lines.push(Line::from(vec![
            Span::styled(marker, Style::default().fg(theme.accent)),
            Span::styled(format!("{} {}", kind.glyph(), kind.title()), title_style),
        ]));
        lines.push(Line::from(Span::styled(
            format!("    {}", safe_truncate(kind.description(), inner.width.saturating_sub(6) as usize)),
            Style::default().fg(theme.muted),
        )));
        lines.push(card_status_line(&state, *kind, theme));
    }

    frame.render_widget(Paragraph::new(lines), inner);
}

fn card_status_line(state: &crate::app::AppState, kind: ScanKind, theme: &Theme) -> Line<'static> {
    match state.board.result(kind) {
        Some(result) => {
            let color = theme.run_status_color(result.status);
            let tag = match result.status {
                RunStatus::Pending => "… ",
                RunStatus::Success => "✓ ",
                RunStatus::Error => "✗ ",
            };
            let mut text = format!("    {}{}", tag, result.message);
            if result.status == RunStatus::Success {
                if let Some(summary) = result.payload.as_ref().and_then(|p| p.summary()) {
                    text.push_str(&format!(" ({})", summary));
                }
            }
            Line::from(Span::styled(text, Style::default().fg(color)))
        }
        None => Line::from(Span::styled(
            "    idle".to_string(),
            Style::default().fg(theme.muted),
        )),
    }
}

fn render_detail(frame: &mut Frame, area: Rect, app: &App, theme: &Theme) {
    let state = app.state.read();

    ResultPanel::new(state.selected, theme)
        .result(state.selected_result())
        .scroll(state.detail_scroll)
        .max_display_size(app.config.tui.max_display_size)
        .render(frame, area);
}

fn render_status_bar(frame: &mut Frame, area: Rect, app: &App, theme: &Theme) {
    let state = app.state.read();

    let hints = match state.mode {
        AppMode::EditDomain => "Enter/Esc:done".to_string(),
        _ => {
            let run_hint = if state.board.can_run(state.selected, &state.domain.value) {
                "Enter:run"
            } else if state.board.is_in_flight(state.selected) {
                "x:cancel"
            } else {
                "Enter:run (needs domain)"
            };
            format!("{}  e:edit domain  j/k:select  ?:help  q:quit", run_hint)
        }
    };

    let mut spans = vec![Span::styled(format!(" {}", hints), Style::default().fg(theme.muted))];
    if let Some(message) = &state.status_message {
        spans.push(Span::styled("  │  ", Style::default().fg(theme.border)));
        spans.push(Span::styled(message.clone(), Style::default().fg(theme.info)));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_help_dialog(frame: &mut Frame, theme: &Theme) {
    let area = centered_rect(60, 60, frame.area());
    frame.render_widget(Clear, area);

    let lines = vec![
        Line::from(Span::styled(
            "How to use",
            Style::default().fg(theme.accent).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from("1. Start the scan backend; it listens on localhost:5000 by default."),
        Line::from("2. Press 'e' and type the target domain."),
        Line::from("3. Select a scan with j/k or the arrow keys."),
        Line::from("4. Press Enter to run it; results render below each card."),
        Line::from("5. Independent scans can run at the same time; 'x' cancels one."),
        Line::from(""),
        Line::from(Span::styled("Keys", Style::default().fg(theme.accent).add_modifier(Modifier::BOLD))),
        Line::from("  e, i, /     edit target domain"),
        Line::from("  j/k, ↑/↓    select card"),
        Line::from("  Enter, r    run the selected scan"),
        Line::from("  x           cancel the selected scan"),
        Line::from("  PgUp/PgDn   scroll the result dump"),
        Line::from("  q, Ctrl-C   quit"),
        Line::from(""),
        Line::from(Span::styled("Press any key to close", Style::default().fg(theme.muted))),
    ];

    let dialog = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.accent))
            .title(" Help "),
    );
    frame.render_widget(dialog, area);
}

/// Helper to build a centered rect using percentages of the available area
fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_safe_truncate_respects_char_boundaries() {
        assert_eq!(safe_truncate("hello", 10), "hello");
        assert_eq!(safe_truncate("hello world", 5), "hello...");
        // Multi-byte: must not split the glyph
        let s = "héllo";
        let truncated = safe_truncate(s, 2);
        assert!(truncated.ends_with("..."));
    }

    #[test]
    fn test_centered_rect_fits_inside_area() {
        let area = Rect::new(0, 0, 100, 50);
        let rect = centered_rect(60, 60, area);
        assert!(rect.width <= area.width);
        assert!(rect.height <= area.height);
    }
}
