// Dashboard widgets and the chart helpers they share.

pub mod controls;
pub mod position_chart;
pub mod quit_confirm;
pub mod summary_table;
pub mod variance_chart;

use nfldash_core::stats::Position;
use ratatui::style::Color;

/// Series color for a position, shared by both charts and the table.
pub fn position_color(position: Position) -> Color {
    match position {
        Position::QB => Color::Red,
        Position::RB => Color::Green,
        Position::WR => Color::Cyan,
        Position::TE => Color::Yellow,
        Position::K => Color::Magenta,
        Position::Defense => Color::Blue,
    }
}

/// Compact axis/legend label.
pub fn short_label(position: Position) -> &'static str {
    match position {
        Position::Defense => "DEF",
        other => other.display_str(),
    }
}

/// Axis bounds covering `values` with 10% headroom on each side. Always
/// includes zero and never collapses to a zero-width range.
pub fn padded_bounds(values: impl IntoIterator<Item = f64>) -> [f64; 2] {
    let (lo, hi) = values
        .into_iter()
        .filter(|v| v.is_finite())
        .fold((0.0_f64, 0.0_f64), |(lo, hi), v| (lo.min(v), hi.max(v)));
    let span = hi - lo;
    if span <= 0.0 {
        return [lo, lo + 1.0];
    }
    let pad = span * 0.1;
    [if lo < 0.0 { lo - pad } else { lo }, hi + pad]
}
