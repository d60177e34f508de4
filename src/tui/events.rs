use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};

use crate::model::FileTimeline;

use super::input::{apply_search_filter, ensure_selection_in_filtered, move_selection};
use super::state::{sort_timelines, SortMode, TuiState};

/// Handle a keyboard event, mutating TUI state and returning `true` if the loop should exit.
pub fn handle_key_event(key_event: KeyEvent, state: &mut TuiState, timelines: &mut [FileTimeline]) -> bool {
    if key_event.kind != KeyEventKind::Press {
        return false;
    }

    if state.search_mode {
        handle_search_input(key_event.code, state, timelines);
        return false;
    }

    match key_event.code {
        KeyCode::Char('q') => return true,
        KeyCode::Esc => {
            if state.show_help {
                state.show_help = false;
            } else {
                return true;
            }
        }
        KeyCode::Char('h') | KeyCode::F(1) => state.show_help = !state.show_help,
        KeyCode::Char('/') => {
            state.search_mode = true;
            state.search_query.clear();
        }
        KeyCode::Char('s') => toggle_sort(state, timelines),
        KeyCode::Up | KeyCode::Char('k') => move_selection(state, -1),
        KeyCode::Down | KeyCode::Char('j') => move_selection(state, 1),
        KeyCode::PageUp => move_selection(state, -10),
        KeyCode::PageDown => move_selection(state, 10),
        KeyCode::Home | KeyCode::Char('g') => move_selection(state, isize::MIN),
        KeyCode::End | KeyCode::Char('G') => move_selection(state, isize::MAX),
        _ => {}
    }
    false
}

fn handle_search_input(code: KeyCode, state: &mut TuiState, timelines: &[FileTimeline]) {
    match code {
        KeyCode::Esc => {
            state.search_mode = false;
            state.search_query.clear();
            state.filtered_indices = (0..timelines.len()).collect();
            ensure_selection_in_filtered(state);
        }
        KeyCode::Enter => {
            state.search_mode = false;
            apply_search_filter(timelines, state);
        }
        KeyCode::Backspace => {
            state.search_query.pop();
            apply_search_filter(timelines, state);
        }
        KeyCode::Char(c) => {
            state.search_query.push(c);
            apply_search_filter(timelines, state);
        }
        _ => {}
    }
}

fn toggle_sort(state: &mut TuiState, timelines: &mut [FileTimeline]) {
    let selected_path = timelines.get(state.selected).map(|t| t.path.clone());
    state.sort = match state.sort {
        SortMode::Changes => SortMode::Path,
        SortMode::Path => SortMode::Changes,
    };
    sort_timelines(timelines, state.sort);

    apply_search_filter(timelines, state);
    if let Some(path) = selected_path {
        if let Some(idx) = timelines.iter().position(|t| t.path == path) {
            state.selected = idx;
        }
    }
    ensure_selection_in_filtered(state);
}
