// Controls bar widget: position toggles, limit, grouping, exclusions.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use nfldash_core::stats::Position;
use nfldash_core::summary::query::SummaryQuery;

use super::{position_color, short_label};
use crate::tui::ViewState;

/// Render the controls bar into the given area.
///
/// Layout: [position toggles] | limit | grouping | excluded | status message
pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let mut spans = position_spans(&state.query);

    let sep = || Span::styled(" | ", Style::default().fg(Color::Gray));
    spans.push(sep());
    spans.push(Span::styled(
        format!("Limit {}", state.query.limit),
        Style::default().fg(Color::White),
    ));
    spans.push(sep());
    spans.push(Span::styled(
        format!("Grouping: {}", state.query.grouping.label()),
        Style::default().fg(Color::White),
    ));
    spans.push(sep());
    spans.push(Span::styled(
        format!("Excluded: {}", state.query.excluded.len()),
        Style::default().fg(Color::White),
    ));

    if let Some(ref message) = state.status_message {
        spans.push(sep());
        spans.push(Span::styled(
            message.clone(),
            Style::default().fg(Color::Yellow),
        ));
    }

    let paragraph = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::Black));
    frame.render_widget(paragraph, area);
}

/// One `[n:POS]` span per position, active ones highlighted in the
/// position's color. With no positions selected every toggle shows active.
pub fn position_spans(query: &SummaryQuery) -> Vec<Span<'static>> {
    let active_positions = query.active_positions();
    let mut spans = vec![Span::raw(" ")];
    for (i, pos) in Position::ALL.iter().enumerate() {
        let active = active_positions.contains(pos);
        let style = if active {
            Style::default()
                .fg(Color::Black)
                .bg(position_color(*pos))
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        spans.push(Span::styled(format!("[{}:{}]", i + 1, short_label(*pos)), style));
        spans.push(Span::raw(" "));
    }
    spans
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
