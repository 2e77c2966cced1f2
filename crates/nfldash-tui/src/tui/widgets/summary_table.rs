// Season summary table: ranked rows selected by the active query.
//
// Columns: rank, player, team, position, season total, weekly average,
// weekly spread. Values are shown rounded to one decimal.

use ratatui::layout::{Constraint, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders, Cell, Row, Table, TableState};
use ratatui::Frame;

use nfldash_core::summary::{round1, SeasonSummary};

use super::{position_color, short_label};
use crate::tui::ViewState;

/// Render the summary table into the given area.
pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let header = Row::new(vec![
        Cell::from("#"),
        Cell::from("Player"),
        Cell::from("Team"),
        Cell::from("Pos"),
        Cell::from("Total"),
        Cell::from("Avg"),
        Cell::from("Std"),
    ])
    .style(
        Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD),
    );

    let rows: Vec<Row> = state
        .visible
        .iter()
        .enumerate()
        .map(|(i, r)| {
            let cells = row_cells(i + 1, r);
            Row::new(vec![
                Cell::from(cells[0].clone()),
                Cell::from(cells[1].clone()),
                Cell::from(cells[2].clone()),
                Cell::from(cells[3].clone()).style(Style::default().fg(row_color(r))),
                Cell::from(cells[4].clone()),
                Cell::from(cells[5].clone()),
                Cell::from(cells[6].clone()),
            ])
        })
        .collect();

    let widths = [
        Constraint::Length(4),
        Constraint::Min(14),
        Constraint::Length(5),
        Constraint::Length(4),
        Constraint::Length(7),
        Constraint::Length(6),
        Constraint::Length(6),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(build_title(state)),
        )
        .row_highlight_style(Style::default().bg(Color::DarkGray))
        .highlight_symbol(">> ");

    let mut table_state = TableState::default();
    if !state.visible.is_empty() {
        table_state.select(Some(state.highlight));
    }
    frame.render_stateful_widget(table, area, &mut table_state);
}

/// Display text for one table row, rank first.
pub fn row_cells(rank: usize, row: &SeasonSummary) -> [String; 7] {
    [
        rank.to_string(),
        row.player.clone(),
        row.team.clone(),
        match row.position.fantasy() {
            Some(pos) => short_label(pos).to_string(),
            None => row.position.to_string(),
        },
        format!("{:.1}", round1(row.season_total)),
        format!("{:.1}", round1(row.week_avg)),
        format!("{:.1}", round1(row.week_std)),
    ]
}

fn row_color(row: &SeasonSummary) -> Color {
    row.position.fantasy().map_or(Color::Gray, position_color)
}

fn build_title(state: &ViewState) -> Line<'static> {
    Line::from(format!(
        " Season Summary ({} of {}) ",
        state.visible.len(),
        state.summary.rows.len()
    ))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
