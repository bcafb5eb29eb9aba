//! Result detail panel widget

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::scan::{RunState, ScanKind};
use crate::tui::Theme;

/// Detail panel for the selected card's latest result
pub struct ResultPanel<'a> {
    /// Kind of the selected card
    kind: ScanKind,

    /// The result to display
    result: Option<&'a RunState>,

    /// Theme
    theme: &'a Theme,

    /// Scroll offset for the payload dump
    scroll: u16,

    /// Display cap for the payload dump, in bytes
    max_display_size: usize,
}

impl<'a> ResultPanel<'a> {
    pub fn new(kind: ScanKind, theme: &'a Theme) -> Self {
        Self {
            kind,
            result: None,
            theme,
            scroll: 0,
            max_display_size: usize::MAX,
        }
    }

    pub fn result(mut self, result: Option<&'a RunState>) -> Self {
        self.result = result;
        self
    }

    pub fn scroll(mut self, scroll: u16) -> Self {
        self.scroll = scroll;
        self
    }

    pub fn max_display_size(mut self, max: usize) -> Self {
        self.max_display_size = max;
        self
    }

    pub fn render(self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.theme.border))
            .title(format!(" {} ", self.kind.title()));

        let inner = block.inner(area);
        frame.render_widget(block, area);

        let Some(result) = self.result else {
            let placeholder = Paragraph::new("No result yet. Press Enter to run this scan.")
                .style(Style::default().fg(self.theme.muted));
            frame.render_widget(placeholder, inner);
            return;
        };

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2), // Status + summary
                Constraint::Min(1),    // Payload dump
            ])
            .split(inner);

        self.render_status(frame, chunks[0], result);
        self.render_payload(frame, chunks[1], result);
    }

    fn render_status(&self, frame: &mut Frame, area: Rect, result: &RunState) {
        let status_color = self.theme.run_status_color(result.status);

        let mut status_spans = vec![Span::styled(
            result.message.clone(),
            Style::default().fg(status_color).add_modifier(Modifier::BOLD),
        )];
        if let Some(duration_ms) = result.duration_ms {
            status_spans.push(Span::styled(
                format!(" • {}ms", duration_ms),
                Style::default().fg(self.theme.muted),
            ));
        }

        let summary_line = result
            .payload
            .as_ref()
            .and_then(|p| p.summary())
            .map(|summary| {
                Line::from(Span::styled(summary, Style::default().fg(self.theme.accent_secondary)))
            })
            .unwrap_or_else(|| Line::from(""));

        let lines = vec![Line::from(status_spans), summary_line];
        frame.render_widget(Paragraph::new(lines), area);
    }

    fn render_payload(&self, frame: &mut Frame, area: Rect, result: &RunState) {
        let Some(payload) = result.payload.as_ref() else {
            return;
        };

        let mut dump = payload.pretty();
        if dump.len() > self.max_display_size {
            let mut end = self.max_display_size;
            while end > 0 && !dump.is_char_boundary(end) {
                end -= 1;
            }
            dump.truncate(end);
            dump.push_str("\n... (truncated)");
        }

        let paragraph = Paragraph::new(dump)
            .style(Style::default().fg(self.theme.fg))
            .scroll((self.scroll, 0));
        frame.render_widget(paragraph, area);
    }
}
