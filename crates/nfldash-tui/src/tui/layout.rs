// Screen layout: panel arrangement and sizing.
//
// Divides the terminal area into fixed zones for the scoring dashboard:
//
// +--------------------------------------------------+
// | Controls Bar (1 row)                              |
// +-------------------------+------------------------+
// | Summary Table (45%)      | Volatility Chart (50%) |
// |                          +------------------------+
// |                          | Position Chart (50%)   |
// +-------------------------+------------------------+
// | Help Bar (1 row)                                  |
// +--------------------------------------------------+

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Resolved screen areas for each dashboard zone.
#[derive(Debug, Clone)]
pub struct AppLayout {
    /// Top row: active positions, limit, grouping, exclusions.
    pub controls: Rect,
    /// Left side: ranked season summaries.
    pub table: Rect,
    /// Right top: weekly average against weekly spread.
    pub variance_chart: Rect,
    /// Right bottom: weekly average by position.
    pub position_chart: Rect,
    /// Bottom row: keyboard shortcut hints.
    pub help_bar: Rect,
}

/// Build the dashboard layout from the available terminal area.
pub fn build_layout(area: Rect) -> AppLayout {
    // Vertical: controls(1) | middle(fill) | help(1)
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // controls bar
            Constraint::Min(10),   // table + charts
            Constraint::Length(1), // help bar
        ])
        .split(area);

    let controls = vertical[0];
    let middle = vertical[1];
    let help_bar = vertical[2];

    // Horizontal: table (45%) | charts (55%)
    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
        .split(middle);

    let table = horizontal[0];

    let charts = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(horizontal[1]);

    AppLayout {
        controls,
        table,
        variance_chart: charts[0],
        position_chart: charts[1],
        help_bar,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
