// By-position chart: weekly average per player, one column per position,
// players spread horizontally within their column.

use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::symbols::Marker;
use ratatui::text::Span;
use ratatui::widgets::{Axis, Block, Borders, Chart, Dataset, GraphType};
use ratatui::Frame;

use nfldash_core::stats::Position;
use nfldash_core::summary::query::position_points;
use nfldash_core::summary::SeasonSummary;

use super::variance_chart::axis_labels;
use super::{padded_bounds, position_color, short_label};
use crate::tui::ViewState;

/// Column centers sit at integer x; half a column of margin on either end.
const X_BOUNDS: [f64; 2] = [-0.5, Position::ALL.len() as f64 - 0.5];

/// X-axis labels, one per half-column step so each position name lands
/// under its column center.
pub fn position_labels() -> Vec<Span<'static>> {
    let mut labels = vec![Span::raw("")];
    for pos in Position::ALL {
        labels.push(Span::styled(
            short_label(pos),
            Style::default().fg(position_color(pos)),
        ));
        labels.push(Span::raw(""));
    }
    labels
}

pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let refs: Vec<&SeasonSummary> = state.visible.iter().collect();
    let series = position_points(&refs, state.jitter);

    let y_bounds = padded_bounds(refs.iter().map(|r| r.week_avg));

    let datasets: Vec<Dataset> = series
        .iter()
        .map(|(pos, points)| {
            Dataset::default()
                .name(short_label(*pos))
                .marker(Marker::Dot)
                .graph_type(GraphType::Scatter)
                .style(Style::default().fg(position_color(*pos)))
                .data(points)
        })
        .collect();

    let chart = Chart::new(datasets)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Weekly avg by position "),
        )
        .x_axis(
            Axis::default()
                .style(Style::default().fg(Color::Gray))
                .bounds(X_BOUNDS)
                .labels(position_labels()),
        )
        .y_axis(
            Axis::default()
                .title("Avg")
                .style(Style::default().fg(Color::Gray))
                .bounds(y_bounds)
                .labels(axis_labels(y_bounds)),
        )
        .hidden_legend_constraints((
            ratatui::layout::Constraint::Length(0),
            ratatui::layout::Constraint::Length(0),
        ));

    frame.render_widget(chart, area);
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::tests::sample_state;

    #[test]
    fn labels_alternate_blank_and_position() {
        let labels = position_labels();
        assert_eq!(labels.len(), 2 * Position::ALL.len() + 1);
        let text: Vec<String> = labels.iter().map(|s| s.content.to_string()).collect();
        assert_eq!(text[0], "");
        assert_eq!(text[1], "QB");
        assert_eq!(text[11], "DEF");
        assert_eq!(text[12], "");
    }

    #[test]
    fn points_stay_inside_x_bounds() {
        let state = sample_state();
        let refs: Vec<&SeasonSummary> = state.visible.iter().collect();
        for (_, points) in position_points(&refs, state.jitter) {
            for (x, _) in points {
                assert!(x > X_BOUNDS[0] && x < X_BOUNDS[1], "x out of range: {x}");
            }
        }
    }

    #[test]
    fn render_does_not_panic() {
        let backend = ratatui::backend::TestBackend::new(60, 20);
        let mut terminal = ratatui::Terminal::new(backend).unwrap();
        let state = sample_state();
        terminal
            .draw(|frame| render(frame, frame.area(), &state))
            .unwrap();
    }

    #[test]
    fn render_single_position_does_not_panic() {
        let backend = ratatui::backend::TestBackend::new(60, 20);
        let mut terminal = ratatui::Terminal::new(backend).unwrap();
        let mut state = sample_state();
        state.query.positions.insert(Position::K);
        state.refresh();
        terminal
            .draw(|frame| render(frame, frame.area(), &state))
            .unwrap();
    }
}
