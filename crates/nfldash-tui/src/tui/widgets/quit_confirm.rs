// Modal shown over the dashboard while `ViewState::confirm_quit` is set.

use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use ratatui::Frame;

const DIALOG_WIDTH: u16 = 34;
const DIALOG_HEIGHT: u16 = 4;

pub fn render(frame: &mut Frame, area: Rect) {
    let dialog = dialog_area(area);
    frame.render_widget(Clear, dialog);

    let key = |k: &'static str, color: Color| {
        Span::styled(k, Style::default().fg(color).add_modifier(Modifier::BOLD))
    };
    let lines = vec![
        Line::from("Leave the dashboard?"),
        Line::from(vec![
            key("y", Color::Green),
            Span::raw(" quit  "),
            key("n", Color::Red),
            Span::raw("/"),
            key("Esc", Color::Red),
            Span::raw(" stay"),
        ]),
    ];

    let paragraph = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Yellow)),
        )
        .style(Style::default().bg(Color::Black));
    frame.render_widget(paragraph, dialog);
}

/// Dialog rectangle centered in `area`, shrunk to fit small terminals.
fn dialog_area(area: Rect) -> Rect {
    let width = DIALOG_WIDTH.min(area.width);
    let height = DIALOG_HEIGHT.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dialog_is_centered() {
        let rect = dialog_area(Rect::new(0, 0, 100, 40));
        assert_eq!(rect, Rect::new(33, 18, DIALOG_WIDTH, DIALOG_HEIGHT));
    }

    #[test]
    fn dialog_respects_offset_area() {
        let rect = dialog_area(Rect::new(10, 5, 54, 14));
        assert_eq!(rect, Rect::new(20, 10, DIALOG_WIDTH, DIALOG_HEIGHT));
    }

    #[test]
    fn dialog_clamps_to_tiny_area() {
        let rect = dialog_area(Rect::new(0, 0, 12, 2));
        assert_eq!(rect, Rect::new(0, 0, 12, 2));
    }

    #[test]
    fn render_shows_prompt() {
        let backend = ratatui::backend::TestBackend::new(60, 12);
        let mut terminal = ratatui::Terminal::new(backend).unwrap();
        terminal.draw(|frame| render(frame, frame.area())).unwrap();

        let buffer = terminal.backend().buffer();
        let text: String = (0..buffer.area.height)
            .flat_map(|y| (0..buffer.area.width).map(move |x| (x, y)))
            .map(|pos| buffer[pos].symbol().to_string())
            .collect();
        assert!(text.contains("Leave the dashboard?"));
    }
}
