// Keyboard input handling and command dispatch.
//
// Translates crossterm key events into UserCommand messages sent to the
// app orchestrator, or into local ViewState mutations (date picking,
// matchup selection, folding, scrolling).

use chrono::NaiveDate;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use super::widgets::report::{max_scroll, section_starts};
use super::{ViewState, DATE_FORMAT};
use crate::protocol::UserCommand;

/// Lines moved per PageUp/PageDown.
const PAGE_LINES: usize = 10;

/// "DD/MM/YYYY" is ten characters.
const MAX_ENTRY_LEN: usize = 10;

/// Handle a keyboard event.
///
/// Returns `Some(UserCommand)` when the key press should be forwarded to the
/// app orchestrator (GenerateReport, Quit). Returns `None` when the key press
/// was handled locally by mutating `ViewState`.
pub fn handle_key(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    // Only process key press events. On Windows, crossterm emits both
    // Press and Release events for each physical keypress.
    if key_event.kind != KeyEventKind::Press {
        return None;
    }

    // Ctrl+C always quits regardless of mode
    if key_event.modifiers.contains(KeyModifiers::CONTROL) && key_event.code == KeyCode::Char('c') {
        return Some(UserCommand::Quit);
    }

    if view_state.date_entry.is_some() {
        handle_date_entry(key_event, view_state);
        return None;
    }

    match key_event.code {
        KeyCode::Char('q') => Some(UserCommand::Quit),
        KeyCode::Char('g') | KeyCode::Enter => Some(UserCommand::GenerateReport {
            date: view_state.date,
        }),
        KeyCode::Left | KeyCode::Char('h') => {
            if let Some(date) = view_state.date.pred_opt() {
                view_state.date = date;
            }
            None
        }
        KeyCode::Right | KeyCode::Char('l') => {
            if let Some(date) = view_state.date.succ_opt() {
                view_state.date = date;
            }
            None
        }
        KeyCode::Char('t') => {
            view_state.date = view_state.today;
            None
        }
        KeyCode::Char('d') => {
            view_state.date_entry = Some(String::new());
            view_state.entry_error = None;
            None
        }
        KeyCode::Up | KeyCode::Char('k') => {
            let index = view_state.selected.saturating_sub(1);
            select(view_state, index);
            None
        }
        KeyCode::Down | KeyCode::Char('j') => {
            let index = view_state.selected + 1;
            select(view_state, index);
            None
        }
        KeyCode::Char(' ') => {
            let index = view_state.selected;
            if index < view_state.matchups.len() && !view_state.collapsed.remove(&index) {
                view_state.collapsed.insert(index);
            }
            None
        }
        KeyCode::PageDown => {
            let offset = view_state.scroll_offset + PAGE_LINES;
            view_state.scroll_offset = offset.min(max_scroll(view_state));
            None
        }
        KeyCode::PageUp => {
            view_state.scroll_offset = view_state.scroll_offset.saturating_sub(PAGE_LINES);
            None
        }
        KeyCode::Home => {
            view_state.scroll_offset = 0;
            None
        }
        _ => None,
    }
}

/// Keys while typing a date: digits and '/' edit, Enter applies, Esc cancels.
fn handle_date_entry(key_event: KeyEvent, view_state: &mut ViewState) {
    let Some(entry) = view_state.date_entry.as_mut() else {
        return;
    };

    match key_event.code {
        KeyCode::Char(c) if (c.is_ascii_digit() || c == '/') && entry.len() < MAX_ENTRY_LEN => {
            entry.push(c);
        }
        KeyCode::Backspace => {
            entry.pop();
        }
        KeyCode::Esc => {
            view_state.date_entry = None;
            view_state.entry_error = None;
        }
        KeyCode::Enter => match parse_entry(entry) {
            Some(date) => {
                view_state.date = date;
                view_state.date_entry = None;
                view_state.entry_error = None;
            }
            None => {
                view_state.entry_error = Some(format!("Invalid date '{entry}', expected DD/MM/YYYY"));
            }
        },
        _ => {}
    }
}

/// Parse a typed DD/MM/YYYY date.
pub fn parse_entry(text: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(text.trim(), DATE_FORMAT).ok()
}

/// Move the highlight to `index` (clamped) and scroll its section into view.
fn select(view_state: &mut ViewState, index: usize) {
    if view_state.matchups.is_empty() {
        return;
    }
    view_state.selected = index.min(view_state.matchups.len() - 1);
    if let Some(start) = section_starts(view_state).get(view_state.selected) {
        view_state.scroll_offset = *start;
    }
}
