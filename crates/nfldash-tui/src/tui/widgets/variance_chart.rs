// Volatility chart: weekly spread (x) against weekly average (y), one
// scatter series per position.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::symbols::Marker;
use ratatui::text::Span;
use ratatui::widgets::{Axis, Block, Borders, Chart, Dataset, GraphType};
use ratatui::Frame;

use nfldash_core::stats::Position;
use nfldash_core::summary::query::variance_points;
use nfldash_core::summary::SeasonSummary;

use super::{padded_bounds, position_color, short_label};
use crate::tui::ViewState;

/// Scatter series for the visible rows, grouped by position in display order.
pub fn series(rows: &[SeasonSummary]) -> Vec<(Position, Vec<(f64, f64)>)> {
    Position::ALL
        .iter()
        .filter_map(|pos| {
            let members: Vec<&SeasonSummary> = rows.iter().filter(|r| r.position == *pos).collect();
            if members.is_empty() {
                None
            } else {
                Some((*pos, variance_points(&members)))
            }
        })
        .collect()
}

pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let series = series(&state.visible);

    let x_bounds = padded_bounds(series.iter().flat_map(|(_, pts)| pts.iter().map(|p| p.0)));
    let y_bounds = padded_bounds(series.iter().flat_map(|(_, pts)| pts.iter().map(|p| p.1)));

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
                .title(" Volatility: weekly avg vs std "),
        )
        .x_axis(
            Axis::default()
                .title("Std")
                .style(Style::default().fg(Color::Gray))
                .bounds(x_bounds)
                .labels(axis_labels(x_bounds)),
        )
        .y_axis(
            Axis::default()
                .title("Avg")
                .style(Style::default().fg(Color::Gray))
                .bounds(y_bounds)
                .labels(axis_labels(y_bounds)),
        );

    frame.render_widget(chart, area);
}

/// Low, middle and high tick labels for a numeric axis.
pub fn axis_labels(bounds: [f64; 2]) -> Vec<Span<'static>> {
    let mid = (bounds[0] + bounds[1]) / 2.0;
    vec![
        Span::styled(
            format!("{:.1}", bounds[0]),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::raw(format!("{:.1}", mid)),
        Span::styled(
            format!("{:.1}", bounds[1]),
            Style::default().add_modifier(Modifier::BOLD),
        ),
    ]
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
