// TUI dashboard: layout, input handling, and widget rendering.
//
// The TUI owns a `ViewState` holding the loaded summary table and the active
// query. Every control change re-runs the query over the full table; the
// frame is redrawn at ~30 fps from whatever `ViewState` currently holds.

pub mod input;
pub mod layout;
pub mod widgets;

use std::path::{Path, PathBuf};
use std::time::Duration;

use crossterm::event::{Event, EventStream};
use futures_util::StreamExt;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;
use tracing::{info, warn};

use nfldash_core::output::read_summary;
use nfldash_core::summary::query::{select, SummaryQuery};
use nfldash_core::summary::{SeasonSummary, SummaryTable};

use layout::{build_layout, AppLayout};

/// Commands the input handler hands back to the event loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserCommand {
    /// Re-read the summary file from disk.
    Reload,
    Quit,
}

// ---------------------------------------------------------------------------
// ViewState
// ---------------------------------------------------------------------------

/// TUI-local state: the full summary table plus the current query and the
/// rows it selected.
pub struct ViewState {
    /// Every summary row loaded from disk.
    pub summary: SummaryTable,
    /// Active filter/limit/grouping controls.
    pub query: SummaryQuery,
    /// Rows selected by `query`, ranked by season total.
    pub visible: Vec<SeasonSummary>,
    /// Index into `visible` of the highlighted row.
    pub highlight: usize,
    /// Horizontal spread for the by-position chart.
    pub jitter: f64,
    /// Whether the quit confirmation dialog is open.
    pub confirm_quit: bool,
    /// One-line message shown in the controls bar (e.g. a reload error).
    pub status_message: Option<String>,
}

impl Default for ViewState {
    fn default() -> Self {
        ViewState {
            summary: SummaryTable::default(),
            query: SummaryQuery::default(),
            visible: Vec::new(),
            highlight: 0,
            jitter: 0.6,
            confirm_quit: false,
            status_message: None,
        }
    }
}

impl ViewState {
    pub fn new(summary: SummaryTable, query: SummaryQuery, jitter: f64) -> Self {
        let mut state = ViewState {
            summary,
            query,
            jitter,
            ..ViewState::default()
        };
        state.refresh();
        state
    }

    /// Recompute the visible rows from the full table and clamp the
    /// highlight to the new row count.
    pub fn refresh(&mut self) {
        self.visible = select(&self.summary.rows, &self.query)
            .into_iter()
            .cloned()
            .collect();
        self.highlight = self.highlight.min(self.visible.len().saturating_sub(1));
    }

    /// Swap in a freshly loaded table, keeping the current controls.
    pub fn replace_summary(&mut self, summary: SummaryTable) {
        self.summary = summary;
        self.refresh();
    }

    pub fn highlighted(&self) -> Option<&SeasonSummary> {
        self.visible.get(self.highlight)
    }
}

// ---------------------------------------------------------------------------
// Render frame
// ---------------------------------------------------------------------------

/// Render the complete dashboard frame.
pub fn render_frame(frame: &mut Frame, state: &ViewState) {
    let layout = build_layout(frame.area());

    widgets::controls::render(frame, layout.controls, state);
    widgets::summary_table::render(frame, layout.table, state);
    widgets::variance_chart::render(frame, layout.variance_chart, state);
    widgets::position_chart::render(frame, layout.position_chart, state);
    render_help_bar(frame, &layout);

    if state.confirm_quit {
        widgets::quit_confirm::render(frame, frame.area());
    }
}

fn render_help_bar(frame: &mut Frame, layout: &AppLayout) {
    let text = " 1-6:Position | a:All | +/-:Limit | g:Grouping | x:Exclude | u:Clear | \
                j/k:Move | r:Reload | q:Quit";
    let paragraph = Paragraph::new(Line::from(vec![Span::styled(
        text,
        Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::DIM),
    )]))
    .style(Style::default().bg(Color::DarkGray));
    frame.render_widget(paragraph, layout.help_bar);
}

/// Re-read the summary file, reporting failures in the controls bar rather
/// than tearing down the dashboard.
fn reload(view_state: &mut ViewState, summary_path: &Path) {
    match read_summary(summary_path) {
        Ok(summary) => {
            info!("Reloaded {} summary rows", summary.rows.len());
            view_state.status_message = Some(format!("reloaded {} rows", summary.rows.len()));
            view_state.replace_summary(summary);
        }
        Err(e) => {
            warn!("Reload failed: {}", e);
            view_state.status_message = Some(format!("reload failed: {e}"));
        }
    }
}

// ---------------------------------------------------------------------------
// Main TUI loop
// ---------------------------------------------------------------------------

/// Run the TUI event loop.
///
/// This is the main entry point for the terminal UI. It:
/// 1. Initializes the terminal (enters raw mode, enables alternate screen).
/// 2. Installs a panic hook to restore the terminal on crash.
/// 3. Runs an async select loop: keyboard input and render ticks.
/// 4. Restores the terminal on clean exit.
pub async fn run(mut view_state: ViewState, summary_path: PathBuf) -> anyhow::Result<()> {
    // 1. Initialize terminal
    let mut terminal = ratatui::init();

    // 2. Set panic hook to restore terminal on crash.
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = ratatui::restore();
        original_hook(panic_info);
    }));

    // 3. Create crossterm EventStream for async keyboard input
    let mut event_stream = EventStream::new();

    // 4. Create render interval (~30fps)
    let mut render_tick = tokio::time::interval(Duration::from_millis(33));
    render_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    info!("Dashboard started with {} rows", view_state.summary.rows.len());

    // 5. Main loop
    let result = loop {
        tokio::select! {
            // Keyboard input
            maybe_event = event_stream.next() => {
                match maybe_event {
                    Some(Ok(Event::Key(key_event))) => {
                        match input::handle_key(key_event, &mut view_state) {
                            Some(UserCommand::Quit) => {
                                info!("Quit command received, shutting down");
                                break Ok(());
                            }
                            Some(UserCommand::Reload) => reload(&mut view_state, &summary_path),
                            None => {}
                        }
                    }
                    Some(Ok(_)) => {
                        // Mouse and resize events: the next tick redraws
                    }
                    Some(Err(e)) => {
                        break Err(anyhow::Error::new(e).context("terminal input error"));
                    }
                    None => break Ok(()),
                }
            }

            // Render tick
            _ = render_tick.tick() => {
                if let Err(e) = terminal.draw(|frame| render_frame(frame, &view_state)) {
                    break Err(anyhow::Error::new(e).context("failed to draw frame"));
                }
            }
        }
    };

    // 6. Restore terminal
    ratatui::restore();

    result
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use nfldash_core::stats::Position;
    use nfldash_core::summary::query::Grouping;
    use nfldash_core::summary::WeekKey;

    pub(crate) fn summary_row(player: &str, position: Position, total: f64) -> SeasonSummary {
        SeasonSummary {
            player: player.to_string(),
            team: "TST".to_string(),
            position: position.into(),
            season_total: total,
            week_avg: total / 2.0,
            week_std: total / 5.0,
            weekly: vec![total / 2.0, total / 2.0],
        }
    }

    pub(crate) fn sample_table() -> SummaryTable {
        SummaryTable {
            week_keys: vec![WeekKey::new(2017, 1), WeekKey::new(2017, 2)],
            rows: vec![
                summary_row("K.Hunt", Position::RB, 61.5),
                summary_row("T.Brady", Position::QB, 46.6),
                summary_row("A.Smith", Position::QB, 45.9),
                summary_row("T.Kelce", Position::TE, 30.2),
                summary_row("H.Butker", Position::K, 8.0),
                summary_row("DEFENSE", Position::Defense, 7.5),
            ],
        }
    }

    pub(crate) fn sample_state() -> ViewState {
        ViewState::new(sample_table(), SummaryQuery::default(), 0.6)
    }

    #[test]
    fn view_state_default_is_sensible() {
        let state = ViewState::default();
        assert!(state.summary.rows.is_empty());
        assert!(state.visible.is_empty());
        assert_eq!(state.highlight, 0);
        assert!(!state.confirm_quit);
        assert!(state.status_message.is_none());
        assert!(state.highlighted().is_none());
    }

    #[test]
    fn new_runs_initial_query() {
        let state = sample_state();
        assert_eq!(state.visible.len(), 6);
        assert_eq!(state.highlighted().map(|r| r.player.as_str()), Some("K.Hunt"));
    }

    #[test]
    fn refresh_applies_query_changes() {
        let mut state = sample_state();
        state.query.positions.insert(Position::QB);
        state.refresh();
        let names: Vec<&str> = state.visible.iter().map(|r| r.player.as_str()).collect();
        assert_eq!(names, vec!["T.Brady", "A.Smith"]);
    }

    #[test]
    fn refresh_clamps_highlight() {
        let mut state = sample_state();
        state.highlight = 5;
        state.query.limit = 2;
        state.refresh();
        assert_eq!(state.visible.len(), 2);
        assert_eq!(state.highlight, 1);
    }

    #[test]
    fn refresh_with_no_rows_resets_highlight() {
        let mut state = sample_state();
        state.highlight = 3;
        state.query.positions.insert(Position::WR);
        state.refresh();
        assert!(state.visible.is_empty());
        assert_eq!(state.highlight, 0);
    }

    #[test]
    fn replace_summary_keeps_controls() {
        let mut state = sample_state();
        state.query.grouping = Grouping::PerPosition;
        // Two slots per position, so both QBs fit.
        state.query.limit = 12;
        let mut table = sample_table();
        table.rows.truncate(3);
        state.replace_summary(table);
        assert_eq!(state.query.grouping, Grouping::PerPosition);
        assert_eq!(state.query.limit, 12);
        let names: Vec<&str> = state.visible.iter().map(|r| r.player.as_str()).collect();
        assert_eq!(names, vec!["K.Hunt", "T.Brady", "A.Smith"]);
    }

    #[test]
    fn per_position_quota_limits_each_position() {
        let mut state = sample_state();
        state.query.grouping = Grouping::PerPosition;
        state.query.limit = 6;
        let mut table = sample_table();
        table.rows.truncate(3);
        state.replace_summary(table);
        // One slot per position: the RB and the better QB.
        let names: Vec<&str> = state.visible.iter().map(|r| r.player.as_str()).collect();
        assert_eq!(names, vec!["K.Hunt", "T.Brady"]);
    }

    #[test]
    fn reload_failure_sets_status_message() {
        let mut state = sample_state();
        let missing = std::env::temp_dir().join("nfldash_tui_missing_summary.csv");
        let _ = std::fs::remove_file(&missing);
        reload(&mut state, &missing);
        assert!(state
            .status_message
            .as_deref()
            .is_some_and(|m| m.starts_with("reload failed")));
        // Table left untouched.
        assert_eq!(state.summary.rows.len(), 6);
    }

    #[test]
    fn render_frame_does_not_panic_with_defaults() {
        let backend = ratatui::backend::TestBackend::new(160, 50);
        let mut terminal = ratatui::Terminal::new(backend).unwrap();
        let state = ViewState::default();
        terminal
            .draw(|frame| render_frame(frame, &state))
            .unwrap();
    }

    #[test]
    fn render_frame_does_not_panic_with_rows_and_dialog() {
        let backend = ratatui::backend::TestBackend::new(160, 50);
        let mut terminal = ratatui::Terminal::new(backend).unwrap();
        let mut state = sample_state();
        state.confirm_quit = true;
        terminal
            .draw(|frame| render_frame(frame, &state))
            .unwrap();
    }

    #[test]
    fn render_frame_small_terminal() {
        let backend = ratatui::backend::TestBackend::new(30, 12);
        let mut terminal = ratatui::Terminal::new(backend).unwrap();
        let state = sample_state();
        terminal
            .draw(|frame| render_frame(frame, &state))
            .unwrap();
    }
}
