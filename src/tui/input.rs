use super::TuiState;
use crate::model::FileTimeline;

pub fn apply_search_filter(timelines: &[FileTimeline], state: &mut TuiState) {
    if state.search_query.is_empty() {
        state.filtered_indices = (0..timelines.len()).collect();
    } else {
        let query = state.search_query.to_lowercase();
        state.filtered_indices = timelines
            .iter()
            .enumerate()
            .filter(|(_, t)| t.path.to_lowercase().contains(&query))
            .map(|(i, _)| i)
            .collect();
    }

    ensure_selection_in_filtered(state);
}

pub fn ensure_selection_in_filtered(state: &mut TuiState) {
    if state.filtered_indices.is_empty() {
        return;
    }

    if !state.filtered_indices.contains(&state.selected) {
        state.selected = state.filtered_indices[0];
    }
}

/// Move the selection `delta` rows within the filtered list, clamped at both ends.
pub fn move_selection(state: &mut TuiState, delta: isize) {
    if state.filtered_indices.is_empty() {
        return;
    }
    let pos = state
        .filtered_indices
        .iter()
        .position(|&i| i == state.selected)
        .unwrap_or(0);
    let last = state.filtered_indices.len() - 1;
    let next = pos.saturating_add_signed(delta).min(last);
    state.selected = state.filtered_indices[next];
}
