use crate::model::FileTimeline;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum SortMode {
    #[default]
    Changes,
    Path,
}

pub struct TuiState {
    pub selected: usize,
    pub show_help: bool,
    pub search_query: String,
    pub search_mode: bool,
    pub filtered_indices: Vec<usize>,
    pub sort: SortMode,
}

impl TuiState {
    pub fn new(timelines: &[FileTimeline]) -> Self {
        Self {
            filtered_indices: (0..timelines.len()).collect(),
            ..Self::default()
        }
    }

    pub fn selected_timeline<'a>(&self, timelines: &'a [FileTimeline]) -> Option<&'a FileTimeline> {
        if self.filtered_indices.contains(&self.selected) {
            timelines.get(self.selected)
        } else {
            None
        }
    }
}

impl Default for TuiState {
    fn default() -> Self {
        Self {
            selected: 0,
            show_help: false,
            search_query: String::new(),
            search_mode: false,
            filtered_indices: Vec::new(),
            sort: SortMode::default(),
        }
    }
}

/// Reorder timelines in place according to `mode`.
pub fn sort_timelines(timelines: &mut [FileTimeline], mode: SortMode) {
    match mode {
        SortMode::Changes => timelines.sort_by(|a, b| {
            b.total_changes()
                .cmp(&a.total_changes())
                .then_with(|| a.path.cmp(&b.path))
        }),
        SortMode::Path => timelines.sort_by(|a, b| a.path.cmp(&b.path)),
    }
}
