// Keyboard input handling and command dispatch.
//
// Translates crossterm key events into local ViewState mutations (position
// toggles, limit, grouping, exclusions, highlight movement) or into
// UserCommand values handed back to the event loop (reload, quit).

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use nfldash_core::stats::Position;

use super::{UserCommand, ViewState};

/// Amount `+`/`-` change the row limit by.
pub const LIMIT_STEP: usize = 5;

/// Rows moved by PageUp/PageDown.
const PAGE_SIZE: usize = 10;

/// Handle a keyboard event.
///
/// Returns `Some(UserCommand)` when the event loop must act (reload, quit).
/// Returns `None` when the key press was handled locally by mutating
/// `ViewState`. Any change to the query re-runs it before returning.
pub fn handle_key(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    // Only process key press events. On Windows, crossterm emits both
    // Press and Release events for each physical keypress.
    if key_event.kind != KeyEventKind::Press {
        return None;
    }

    // Ctrl+C always quits immediately regardless of mode
    if key_event.modifiers.contains(KeyModifiers::CONTROL)
        && key_event.code == KeyCode::Char('c')
    {
        return Some(UserCommand::Quit);
    }

    if view_state.confirm_quit {
        return handle_confirm_quit(key_event, view_state);
    }

    match key_event.code {
        // Position toggles, in display order
        KeyCode::Char(c @ '1'..='6') => {
            let idx = (c as u8 - b'1') as usize;
            toggle_position(view_state, Position::ALL[idx]);
            None
        }
        KeyCode::Char('a') => {
            view_state.query.positions.clear();
            view_state.refresh();
            None
        }

        // Row limit
        KeyCode::Char('+') | KeyCode::Char('=') => {
            view_state.query.limit = view_state.query.limit.saturating_add(LIMIT_STEP);
            view_state.refresh();
            None
        }
        KeyCode::Char('-') => {
            view_state.query.limit = view_state.query.limit.saturating_sub(LIMIT_STEP).max(1);
            view_state.refresh();
            None
        }

        KeyCode::Char('g') => {
            view_state.query.grouping = view_state.query.grouping.toggled();
            view_state.refresh();
            None
        }

        // Exclusions
        KeyCode::Char('x') => {
            if let Some(player) = view_state.highlighted().map(|r| r.player.clone()) {
                view_state.status_message = Some(format!("excluded {player}"));
                view_state.query.excluded.insert(player);
                view_state.refresh();
            }
            None
        }
        KeyCode::Char('u') => {
            view_state.query.excluded.clear();
            view_state.status_message = None;
            view_state.refresh();
            None
        }

        // Highlight movement
        KeyCode::Up | KeyCode::Char('k') => {
            move_up(view_state, 1);
            None
        }
        KeyCode::Down | KeyCode::Char('j') => {
            move_down(view_state, 1);
            None
        }
        KeyCode::PageUp => {
            move_up(view_state, PAGE_SIZE);
            None
        }
        KeyCode::PageDown => {
            move_down(view_state, PAGE_SIZE);
            None
        }
        KeyCode::Home => {
            view_state.highlight = 0;
            None
        }

        KeyCode::Char('r') => Some(UserCommand::Reload),

        // Quit: enter confirmation mode instead of quitting immediately
        KeyCode::Char('q') => {
            view_state.confirm_quit = true;
            None
        }

        _ => None,
    }
}

/// Handle key events while in quit confirmation mode.
///
/// - `y` or `q` confirms quit
/// - `n` or `Esc` cancels
/// - All other keys are blocked
fn handle_confirm_quit(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    match key_event.code {
        KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Char('q') | KeyCode::Char('Q') => {
            Some(UserCommand::Quit)
        }
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
            view_state.confirm_quit = false;
            None
        }
        _ => None,
    }
}

/// Toggle one position in the filter. An empty filter means every position,
/// so toggling from it selects just that one; removing the last selected
/// position goes back to all.
fn toggle_position(view_state: &mut ViewState, position: Position) {
    let positions = &mut view_state.query.positions;
    if !positions.remove(&position) {
        positions.insert(position);
    }
    view_state.refresh();
}

fn move_up(view_state: &mut ViewState, rows: usize) {
    view_state.highlight = view_state.highlight.saturating_sub(rows);
}

fn move_down(view_state: &mut ViewState, rows: usize) {
    let last = view_state.visible.len().saturating_sub(1);
    view_state.highlight = view_state.highlight.saturating_add(rows).min(last);
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
